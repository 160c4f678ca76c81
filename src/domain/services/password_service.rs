use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, PasswordVerification},
};

/// Service for hashing and verifying passwords
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError>;

    /// Verify a plain text password against a hashed password
    ///
    /// A hash that cannot be read at all is an error, not a `NoMatch`.
    fn verify(
        &self,
        plain_password: &str,
        hashed_password: &HashedPassword,
    ) -> Result<PasswordVerification, DomainError>;
}
