//! Password hashing and verification

use crate::error::Result;
use bcrypt::DEFAULT_COST;

/// One-way password hashing collaborator
pub trait PasswordVerifier: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, password: &str) -> Result<String>;

    /// Compare a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// bcrypt-backed implementation
pub struct BcryptVerifier {
    cost: u32,
}

impl BcryptVerifier {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Use a non-default cost. Tests and benchmarks drop to the minimum cost
    /// to keep hashing out of the hot path.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordVerifier for BcryptVerifier {
    fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, hash)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let verifier = BcryptVerifier::with_cost(4);
        let hash = verifier.hash("hunter2").expect("Failed to hash");

        assert!(verifier.verify("hunter2", &hash).unwrap());
        assert!(!verifier.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let verifier = BcryptVerifier::with_cost(4);
        let a = verifier.hash("hunter2").unwrap();
        let b = verifier.hash("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let verifier = BcryptVerifier::with_cost(4);
        assert!(verifier.verify("hunter2", "not-a-bcrypt-hash").is_err());
    }
}
