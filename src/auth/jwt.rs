//! Session token handling

use crate::auth::models::{SessionUser, User};
use crate::config::AuthConfig;
use crate::error::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session token claims: the public session shape plus standard timestamps
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims from a user record
    pub fn from_user(user: &User, ttl_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            is_verified: user.is_verified,
            is_accepting_messages: user.is_accepting_messages,
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// The session shape surfaced to clients
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.sub.clone(),
            username: self.username.clone(),
            is_verified: self.is_verified,
            is_accepting_messages: self.is_accepting_messages,
        }
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

/// Create a signed session token for a user
pub fn create_token(user: &User, auth: &AuthConfig) -> Result<String> {
    let claims = Claims::from_user(user, auth.token_ttl_secs);
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )?)
}

/// Validate and decode a session token
pub fn validate_token(token: &str, auth: &AuthConfig) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let mut user = User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "hash".to_string(),
            "123456".to_string(),
        );
        user.is_verified = true;
        user
    }

    #[test]
    fn test_create_and_validate_token() {
        let auth = AuthConfig::default();
        let user = test_user();
        let token = create_token(&user, &auth).expect("Failed to create token");
        let claims = validate_token(&token, &auth).expect("Failed to validate token");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "testuser");
        assert!(claims.is_verified);
        assert!(claims.is_accepting_messages);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_invalid_token() {
        let auth = AuthConfig::default();
        let result = validate_token("invalid.token.here", &auth);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let auth = AuthConfig::default();
        let user = test_user();
        let token = create_token(&user, &auth).expect("Failed to create token");

        let other = AuthConfig {
            secret: "a-different-secret".to_string(),
            ..AuthConfig::default()
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn test_claims_session_user_round_trip() {
        let auth = AuthConfig::default();
        let user = test_user();
        let token = create_token(&user, &auth).expect("Failed to create token");
        let claims = validate_token(&token, &auth).expect("Failed to validate token");

        assert_eq!(claims.session_user(), user.session_user());
    }
}
