//! Credential authentication and session tokens

pub mod authorize;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use authorize::{Authorizer, RejectReason};
pub use jwt::{create_token, validate_token, Claims};
pub use middleware::{extract_claims, require_auth};
pub use models::{Credentials, SessionUser, User};
pub use password::{BcryptVerifier, PasswordVerifier};
