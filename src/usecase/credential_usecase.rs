use tracing::debug;

use crate::domain::{
    error::DomainError,
    models::{
        credential::{HashedPassword, VerificationOutcome},
        password_policy::{PasswordPolicy, PolicyViolation},
    },
    services::password_service::PasswordHasher,
};

/// Entry point for hashing, validating and verifying passwords
///
/// Validation trims the password; hashing and verification see it exactly as
/// given. A password with surrounding whitespace therefore validates as its
/// trimmed form but only verifies against a hash of the untrimmed form.
pub struct CredentialUsecase<P: PasswordHasher> {
    policy: PasswordPolicy,
    password_hasher: P,
}

impl<P: PasswordHasher> CredentialUsecase<P> {
    pub fn new(policy: PasswordPolicy, password_hasher: P) -> Self {
        Self {
            policy,
            password_hasher,
        }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Hash a password without checking it against the policy
    pub fn hash(&self, password: &str) -> Result<HashedPassword, DomainError> {
        self.password_hasher.hash(password)
    }

    pub fn validate(&self, password: &str) -> Result<bool, DomainError> {
        let valid = self.policy.validate(password)?;
        if !valid {
            debug!("password rejected by policy");
        }
        Ok(valid)
    }

    pub fn violations(&self, password: &str) -> Result<Vec<PolicyViolation>, DomainError> {
        self.policy.violations(password)
    }

    /// Verify a password against a stored hash
    ///
    /// Nothing is persisted here. When a rehash is recommended the caller
    /// hashes the password again and stores the new value itself.
    pub fn verify(
        &self,
        stored_hash: &HashedPassword,
        password: &str,
    ) -> Result<VerificationOutcome, DomainError> {
        let outcome: VerificationOutcome = self.password_hasher.verify(password, stored_hash)?.into();
        if outcome.rehash_recommended() {
            debug!("stored hash uses outdated parameters, rehash recommended");
        }
        Ok(outcome)
    }
}
