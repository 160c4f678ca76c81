use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{name} is null.")]
    InvalidArgument { name: &'static str },

    #[error("{name} is empty or consists only of white-space characters.")]
    InvalidFormat { name: &'static str },

    #[error("Hasher error: {0}")]
    Hasher(#[from] HasherError),
}

impl DomainError {
    /// Name of the parameter that caused the error, if any
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { name } | Self::InvalidFormat { name } => Some(*name),
            Self::Hasher(HasherError::MalformedHash(_)) => Some("password_hash"),
            Self::Hasher(HasherError::Hash(_)) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum HasherError {
    #[error("Hashing failed: {0}")]
    Hash(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

/// Resolve an optional input, failing with `InvalidArgument` naming the parameter
pub fn required<T>(value: Option<T>, name: &'static str) -> Result<T, DomainError> {
    value.ok_or(DomainError::InvalidArgument { name })
}
