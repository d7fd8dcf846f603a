//! The authorization predicate
//!
//! Validates an identifier/password/verification-code claim against the user
//! store and either returns the matching account or a rejection reason. The
//! checks run sequentially and short-circuit on the first failure.

use std::fmt;
use std::sync::Arc;

use crate::auth::models::{Credentials, User};
use crate::auth::password::PasswordVerifier;
use crate::error::{Error, Result};
use crate::store::UserStore;

/// Why a sign-in attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoSuchUser,
    NotVerified,
    BadPassword,
    BadCode,
}

impl RejectReason {
    /// Stable machine-readable code for logs and clients
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NoSuchUser => "no-such-user",
            RejectReason::NotVerified => "not-verified",
            RejectReason::BadPassword => "bad-password",
            RejectReason::BadCode => "bad-code",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RejectReason::NoSuchUser => "No user found with this identifier.",
            RejectReason::NotVerified => "Please verify your account before signing in.",
            RejectReason::BadPassword => "Incorrect password.",
            RejectReason::BadCode => "Invalid verification code.",
        };
        write!(f, "{}", message)
    }
}

/// Runs the sign-in checks against a user store and a password verifier
pub struct Authorizer {
    store: Arc<dyn UserStore>,
    verifier: Arc<dyn PasswordVerifier>,
}

impl Authorizer {
    pub fn new(store: Arc<dyn UserStore>, verifier: Arc<dyn PasswordVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Validate an identity claim.
    ///
    /// Returns the stored user record unchanged on success. Checks run in
    /// order: identifier resolution, account verification, password,
    /// verification code; the first failing check wins.
    ///
    /// A missing or empty password skips the password check entirely, and the
    /// same holds for the verification code. This mirrors the sign-in flow the
    /// service replaced and is almost certainly not what you want for new
    /// callers, so both skips are logged at warn level.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<User> {
        let user = self
            .store
            .find_by_identifier(&credentials.identifier)
            .await?
            .ok_or_else(|| reject(&credentials.identifier, RejectReason::NoSuchUser))?;

        if !user.is_verified {
            return Err(reject(&credentials.identifier, RejectReason::NotVerified));
        }

        match credentials.password.as_deref() {
            Some(password) if !password.is_empty() => {
                if !self.verifier.verify(password, &user.password_hash)? {
                    return Err(reject(&credentials.identifier, RejectReason::BadPassword));
                }
            }
            _ => {
                tracing::warn!(
                    identifier = %credentials.identifier,
                    "sign-in attempt without a password; password check skipped"
                );
            }
        }

        match credentials.verify_code.as_deref() {
            Some(code) if !code.is_empty() => {
                if user.verify_code != code {
                    return Err(reject(&credentials.identifier, RejectReason::BadCode));
                }
            }
            _ => {
                tracing::warn!(
                    identifier = %credentials.identifier,
                    "sign-in attempt without a verification code; code check skipped"
                );
            }
        }

        Ok(user)
    }
}

fn reject(identifier: &str, reason: RejectReason) -> Error {
    tracing::debug!(identifier = %identifier, reason = reason.code(), "sign-in rejected");
    Error::Rejected(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_codes() {
        assert_eq!(RejectReason::NoSuchUser.code(), "no-such-user");
        assert_eq!(RejectReason::NotVerified.code(), "not-verified");
        assert_eq!(RejectReason::BadPassword.code(), "bad-password");
        assert_eq!(RejectReason::BadCode.code(), "bad-code");
    }

    #[test]
    fn test_reject_reason_messages() {
        assert_eq!(
            RejectReason::NoSuchUser.to_string(),
            "No user found with this identifier."
        );
        assert_eq!(RejectReason::BadPassword.to_string(), "Incorrect password.");
    }
}
