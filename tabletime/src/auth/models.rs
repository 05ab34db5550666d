//! Authentication wire models.

use serde::{Deserialize, Serialize};

/// Admin login attempt sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Outcome of an admin login attempt, sent only to the requester
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn granted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            success: false,
            message: Some("Invalid username or password".to_string()),
        }
    }
}
