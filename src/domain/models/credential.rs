/// Value object representing a hashed password
///
/// The token format belongs to the hasher that produced it; nothing outside
/// the hasher looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Result of comparing a plain password against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerification {
    NoMatch,
    /// Matches and was produced with the current algorithm and parameters
    Match,
    /// Matches but was produced with a weaker algorithm or weaker parameters
    MatchLegacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationOutcome {
    matches: bool,
    rehash_recommended: bool,
}

impl VerificationOutcome {
    pub fn matches(&self) -> bool {
        self.matches
    }

    /// Never true for a non-matching password
    pub fn rehash_recommended(&self) -> bool {
        self.rehash_recommended
    }
}

impl From<PasswordVerification> for VerificationOutcome {
    fn from(verification: PasswordVerification) -> Self {
        let (matches, rehash_recommended) = match verification {
            PasswordVerification::NoMatch => (false, false),
            PasswordVerification::Match => (true, false),
            PasswordVerification::MatchLegacy => (true, true),
        };
        Self {
            matches,
            rehash_recommended,
        }
    }
}
