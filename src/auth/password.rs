//! Credential Verifier
//!
//! bcrypt password hashing with a configurable cost factor.

/// Errors raised while hashing a password
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Check `candidate` against a stored hash.
    ///
    /// Returns false for a wrong password and for a stored value that is not a
    /// bcrypt hash; never errors.
    pub fn verify(&self, secret: &str, candidate: &str) -> bool {
        bcrypt::verify(candidate, secret).unwrap_or(false)
    }

    /// Verify `candidate` when there is no stored hash to check it against.
    ///
    /// Always false, but does one bcrypt round at the configured cost so the
    /// caller takes as long as a real [`verify`](Self::verify).
    pub fn verify_missing(&self, candidate: &str) -> bool {
        let _ = bcrypt::hash(candidate, self.cost);
        false
    }
}
