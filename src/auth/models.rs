//! Authentication models

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a freshly issued verification code stays valid
const VERIFY_CODE_TTL_HOURS: i64 = 1;

/// An identity claim for a single sign-in attempt.
///
/// Constructed per attempt and discarded once the authorization predicate
/// returns. Password and verification code are both optional; a missing proof
/// skips its check entirely (see [`crate::auth::Authorizer`]).
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: Option<String>,
    pub verify_code: Option<String>,
}

// Keep the password out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("verify_code", &self.verify_code)
            .finish()
    }
}

/// A stored user account.
///
/// Mutated only by the registration, verification, and preference flows; the
/// authorization predicate reads it and hands it back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expires_at: DateTime<Utc>,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new unverified account. New accounts accept messages by default.
    pub fn new(username: String, email: String, password_hash: String, verify_code: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            verify_code,
            verify_code_expires_at: now + Duration::hours(VERIFY_CODE_TTL_HOURS),
            is_verified: false,
            is_accepting_messages: true,
            created_at: now,
        }
    }

    /// Project the public session shape out of the full record
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            username: self.username.clone(),
            is_verified: self.is_verified,
            is_accepting_messages: self.is_accepting_messages,
        }
    }
}

/// The subset of a user record surfaced to clients for the lifetime of a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
}

/// Sign-in request body. Field names are fixed wire contract:
/// identifier / password / verifyCode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub identifier: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub verify_code: Option<String>,
}

impl SignInRequest {
    pub fn into_credentials(self) -> Credentials {
        Credentials {
            identifier: self.identifier,
            password: self.password,
            verify_code: self.verify_code,
        }
    }
}

/// Sign-in response with token and session shape
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account verification request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub username: String,
    pub verify_code: String,
}

/// Message-acceptance preference toggle
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesRequest {
    pub accept_messages: bool,
}

/// A fresh 6-digit verification code
pub fn generate_verify_code() -> String {
    use rand::RngExt;
    rand::rng().random_range(100_000..1_000_000).to_string()
}

/// Check a username for registration: 2-20 chars, alphanumeric or underscore
pub fn is_valid_username(username: &str) -> bool {
    (2..=20).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check an email address for registration
pub fn is_valid_email(email: &str) -> bool {
    // Compile-time constant pattern, panicking indicates a bug in the codebase
    let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("Invalid regex pattern - this is a bug in the codebase");
    re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            "123456".to_string(),
        );
        assert!(!user.is_verified);
        assert!(user.is_accepting_messages);
        assert!(user.verify_code_expires_at > user.created_at);
    }

    #[test]
    fn test_session_user_projection() {
        let mut user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            "123456".to_string(),
        );
        user.is_verified = true;

        let session = user.session_user();
        assert_eq!(session.id, user.id);
        assert_eq!(session.username, "alice");
        assert!(session.is_verified);
        assert!(session.is_accepting_messages);
    }

    #[test]
    fn test_session_user_camel_case_wire_shape() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
            "123456".to_string(),
        );
        let json = serde_json::to_value(user.session_user()).unwrap();

        assert!(json.get("isVerified").is_some());
        assert!(json.get("isAcceptingMessages").is_some());
        assert!(json.get("is_verified").is_none());
    }

    #[test]
    fn test_sign_in_request_wire_fields() {
        let req: SignInRequest = serde_json::from_str(
            r#"{"identifier": "alice", "password": "secret", "verifyCode": "123456"}"#,
        )
        .unwrap();
        assert_eq!(req.identifier, "alice");
        assert_eq!(req.password.as_deref(), Some("secret"));
        assert_eq!(req.verify_code.as_deref(), Some("123456"));
    }

    #[test]
    fn test_sign_in_request_proofs_optional() {
        let req: SignInRequest = serde_json::from_str(r#"{"identifier": "alice"}"#).unwrap();
        assert!(req.password.is_none());
        assert!(req.verify_code.is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            identifier: "alice".to_string(),
            password: Some("hunter2".to_string()),
            verify_code: None,
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("alice_42"));
        assert!(!is_valid_username("a"));
        assert!(!is_valid_username("a name with spaces"));
        assert!(!is_valid_username("way_too_long_username_for_us"));
    }

    #[test]
    fn test_generate_verify_code_is_six_digits() {
        for _ in 0..20 {
            let code = generate_verify_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice@example com"));
    }
}
