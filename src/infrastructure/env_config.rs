use std::{net::SocketAddr, str::FromStr};

use thiserror::Error;

use crate::{
    domain::models::password_policy::PasswordPolicy,
    infrastructure::argon2_password_hasher::{Argon2Settings, DEFAULT_MAX_COST_FACTOR},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub policy: PasswordPolicy,
    pub argon2: Argon2Settings,
    /// Ceiling for the costs of stored hashes, as a multiple of `argon2`
    pub argon2_max_cost_factor: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment (and `.env`, if loaded)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let policy_defaults = PasswordPolicy::default();
        let argon2_defaults = Argon2Settings::default();

        let policy = PasswordPolicy {
            required_length: parse_or(&lookup, "PASSWORD_REQUIRED_LENGTH", policy_defaults.required_length)?,
            required_unique_chars: parse_or(
                &lookup,
                "PASSWORD_REQUIRED_UNIQUE_CHARS",
                policy_defaults.required_unique_chars,
            )?,
            require_digit: parse_or(&lookup, "PASSWORD_REQUIRE_DIGIT", policy_defaults.require_digit)?,
            require_lowercase: parse_or(
                &lookup,
                "PASSWORD_REQUIRE_LOWERCASE",
                policy_defaults.require_lowercase,
            )?,
            require_uppercase: parse_or(
                &lookup,
                "PASSWORD_REQUIRE_UPPERCASE",
                policy_defaults.require_uppercase,
            )?,
            require_non_alphanumeric: parse_or(
                &lookup,
                "PASSWORD_REQUIRE_NON_ALPHANUMERIC",
                policy_defaults.require_non_alphanumeric,
            )?,
        };

        let argon2 = Argon2Settings {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", argon2_defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", argon2_defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", argon2_defaults.parallelism)?,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            policy,
            argon2,
            argon2_max_cost_factor: parse_or(
                &lookup,
                "ARGON2_MAX_COST_FACTOR",
                DEFAULT_MAX_COST_FACTOR,
            )?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
