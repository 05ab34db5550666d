//! Advisory admin authentication.
//!
//! Clients use the result to unlock administrative controls (reset, history
//! edits). The server issues no session and enforces nothing with it.
//!
//! ## Example
//!
//! ```
//! use tabletime::auth::{AdminCredentials, AuthRequest};
//!
//! let creds = AdminCredentials::new("admin", "1234");
//! let reply = creds.authenticate(&AuthRequest {
//!     username: "admin".to_string(),
//!     password: "1234".to_string(),
//! });
//! assert!(reply.success);
//! ```

pub mod credentials;
pub mod models;

pub use credentials::{AdminCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
pub use models::{AuthRequest, AuthResponse};
