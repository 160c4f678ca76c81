use argon2::{
    Algorithm, Argon2, Params, PasswordHash as Argon2Hash, Version,
    password_hash::{
        Error as Argon2HashError, PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString,
    },
};
use rand_core::{OsRng, TryRngCore};
use tracing::error;

use crate::domain::{
    error::{DomainError, HasherError},
    models::credential::{HashedPassword, PasswordVerification},
    services::password_service::PasswordHasher,
};

const SALT_LEN: usize = 16;

/// Stored hashes may cost at most this multiple of the current settings
pub const DEFAULT_MAX_COST_FACTOR: u32 = 4;

/// Cost parameters for newly produced hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher
///
/// Any stored hash that still verifies but was made with another Argon2
/// variant, an older version, or lower costs than the current settings is
/// reported as `MatchLegacy`. Stored hashes whose costs exceed the current
/// settings by more than the cost factor are refused before any work is done.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
    params: Params,
    max_cost_factor: u32,
}

impl Argon2PasswordHasher {
    pub fn with_settings(settings: Argon2Settings) -> Result<Self, HasherError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| HasherError::Hash(format!("invalid Argon2 parameters: {e}")))?;
        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            params,
            max_cost_factor: DEFAULT_MAX_COST_FACTOR,
        }
    }

    pub fn with_max_cost_factor(mut self, factor: u32) -> Self {
        self.max_cost_factor = factor.max(1);
        self
    }

    fn check_cost(&self, hash: &Argon2Hash<'_>) -> Result<(), HasherError> {
        let stored =
            Params::try_from(hash).map_err(|e| HasherError::MalformedHash(e.to_string()))?;
        let limit = |current: u32| current.saturating_mul(self.max_cost_factor);
        if stored.m_cost() > limit(self.params.m_cost())
            || stored.t_cost() > limit(self.params.t_cost())
            || stored.p_cost() > limit(self.params.p_cost())
        {
            return Err(HasherError::MalformedHash(format!(
                "cost m={},t={},p={} exceeds the allowed maximum",
                stored.m_cost(),
                stored.t_cost(),
                stored.p_cost()
            )));
        }
        Ok(())
    }

    fn is_outdated(&self, hash: &Argon2Hash<'_>) -> bool {
        if !matches!(Algorithm::try_from(hash.algorithm), Ok(Algorithm::Argon2id)) {
            return true;
        }
        if hash.version != Some(Version::V0x13 as u32) {
            return true;
        }
        match Params::try_from(hash) {
            Ok(stored) => {
                stored.m_cost() < self.params.m_cost()
                    || stored.t_cost() < self.params.t_cost()
                    || stored.p_cost() < self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.try_fill_bytes(&mut salt).map_err(|e| {
            error!(error = %e, "failed to gather salt from the OS");
            HasherError::Hash(format!("salt generation failed: {e}"))
        })?;
        let salt = SaltString::encode_b64(&salt).map_err(|e| HasherError::Hash(e.to_string()))?;

        let hash = self
            .argon2
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "Argon2 hashing failed");
                HasherError::Hash(e.to_string())
            })?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(
        &self,
        plain_password: &str,
        hashed_password: &HashedPassword,
    ) -> Result<PasswordVerification, DomainError> {
        let parsed_hash = Argon2Hash::new(hashed_password.as_str())
            .map_err(|e| HasherError::MalformedHash(e.to_string()))?;
        self.check_cost(&parsed_hash)?;

        match self.argon2.verify_password(plain_password.as_bytes(), &parsed_hash) {
            Ok(()) if self.is_outdated(&parsed_hash) => Ok(PasswordVerification::MatchLegacy),
            Ok(()) => Ok(PasswordVerification::Match),
            Err(Argon2HashError::Password) => Ok(PasswordVerification::NoMatch),
            Err(e) => Err(HasherError::MalformedHash(e.to_string()).into()),
        }
    }
}
