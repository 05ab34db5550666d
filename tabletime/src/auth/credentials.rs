//! Configured admin credentials.

use super::models::{AuthRequest, AuthResponse};
use subtle::ConstantTimeEq;

/// Default admin username when none is configured
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Default admin password when none is configured
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Admin username/password pair checked by `authenticate`.
///
/// The check is stateless: nothing is remembered about a successful attempt.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Compare both fields in constant time
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }

    /// Check a login attempt and build the reply for the requester
    pub fn authenticate(&self, request: &AuthRequest) -> AuthResponse {
        if self.verify(&request.username, &request.password) {
            AuthResponse::granted()
        } else {
            AuthResponse::denied()
        }
    }
}
