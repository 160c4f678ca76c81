use std::collections::HashSet;

use thiserror::Error;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::domain::error::DomainError;

/// Complexity requirements a password has to meet
///
/// Fixed for the lifetime of the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub required_length: usize,
    pub required_unique_chars: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    /// At least one character that is neither a letter nor a digit
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            required_length: 6,
            required_unique_chars: 1,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

/// A single rule the password failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Password is too short")]
    TooShort,
    #[error("Password must contain a digit")]
    MissingDigit,
    #[error("Password must contain a lowercase letter")]
    MissingLowercase,
    #[error("Password must contain a non-alphanumeric character")]
    MissingNonAlphanumeric,
    #[error("Password must contain an uppercase letter")]
    MissingUppercase,
    #[error("Password has too few unique characters")]
    TooFewUniqueChars,
}

impl PolicyViolation {
    /// Every rule, in evaluation order
    const ALL: [PolicyViolation; 6] = [
        Self::TooShort,
        Self::MissingDigit,
        Self::MissingLowercase,
        Self::MissingNonAlphanumeric,
        Self::MissingUppercase,
        Self::TooFewUniqueChars,
    ];
}

impl PasswordPolicy {
    /// Check a password against every requirement, stopping at the first failure.
    ///
    /// Surrounding whitespace is trimmed before any rule is applied and does not
    /// count towards length or complexity. Blank input is an error, not a
    /// failed validation.
    pub fn validate(&self, password: &str) -> Result<bool, DomainError> {
        let password = trimmed(password)?;
        Ok(self.enabled_rules().all(|rule| self.passes(rule, password)))
    }

    /// Like [`validate`](Self::validate), but reports every failing rule in
    /// evaluation order.
    pub fn violations(&self, password: &str) -> Result<Vec<PolicyViolation>, DomainError> {
        let password = trimmed(password)?;
        Ok(self
            .enabled_rules()
            .filter(|rule| !self.passes(*rule, password))
            .collect())
    }

    fn enabled_rules(&self) -> impl Iterator<Item = PolicyViolation> + '_ {
        PolicyViolation::ALL.into_iter().filter(|rule| match rule {
            PolicyViolation::TooShort | PolicyViolation::TooFewUniqueChars => true,
            PolicyViolation::MissingDigit => self.require_digit,
            PolicyViolation::MissingLowercase => self.require_lowercase,
            PolicyViolation::MissingNonAlphanumeric => self.require_non_alphanumeric,
            PolicyViolation::MissingUppercase => self.require_uppercase,
        })
    }

    fn passes(&self, rule: PolicyViolation, password: &str) -> bool {
        match rule {
            PolicyViolation::TooShort => password.chars().count() >= self.required_length,
            PolicyViolation::MissingDigit => password.chars().any(is_decimal_digit),
            PolicyViolation::MissingLowercase => password
                .chars()
                .any(|c| get_general_category(c) == GeneralCategory::LowercaseLetter),
            PolicyViolation::MissingNonAlphanumeric => {
                password.chars().any(|c| !is_letter(c) && !is_decimal_digit(c))
            }
            PolicyViolation::MissingUppercase => password
                .chars()
                .any(|c| get_general_category(c) == GeneralCategory::UppercaseLetter),
            PolicyViolation::TooFewUniqueChars => {
                password.chars().collect::<HashSet<_>>().len() >= self.required_unique_chars
            }
        }
    }
}

/// General category Nd; superscripts, fractions and roman numerals are not digits
fn is_decimal_digit(c: char) -> bool {
    get_general_category(c) == GeneralCategory::DecimalNumber
}

/// Any of the L* general categories
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn trimmed(password: &str) -> Result<&str, DomainError> {
    let password = password.trim();
    if password.is_empty() {
        return Err(DomainError::InvalidFormat { name: "password" });
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn policy(
        required_length: usize,
        required_unique_chars: usize,
        require_digit: bool,
        require_lowercase: bool,
        require_non_alphanumeric: bool,
        require_uppercase: bool,
    ) -> PasswordPolicy {
        PasswordPolicy {
            required_length,
            required_unique_chars,
            require_digit,
            require_lowercase,
            require_uppercase,
            require_non_alphanumeric,
        }
    }

    fn strict() -> PasswordPolicy {
        policy(8, 6, true, true, true, true)
    }

    #[rstest]
    #[case(0, 0, false, false, false, false, "a", true)]
    #[case(8, 6, false, false, false, false, "abcdefg", false)]
    #[case(8, 6, false, false, false, false, "aaaaaaaa", false)]
    #[case(8, 6, false, false, false, false, "abcdefgh", true)]
    #[case(8, 6, false, false, false, true, "password", false)]
    #[case(8, 6, false, false, false, true, "PASSWORD", true)]
    #[case(8, 6, false, false, true, false, "password", false)]
    #[case(8, 6, false, false, true, false, "p@ssword", true)]
    #[case(8, 6, false, false, true, true, "PASSWORD", false)]
    #[case(8, 6, false, false, true, true, "!@£$%^&*", false)]
    #[case(8, 6, false, false, true, true, "P@SSWORD", true)]
    #[case(8, 6, false, true, false, false, "PASSWORD", false)]
    #[case(8, 6, false, true, false, false, "password", true)]
    #[case(8, 6, false, true, false, true, "PASSWORD", false)]
    #[case(8, 6, false, true, false, true, "password", false)]
    #[case(8, 6, false, true, false, true, "Password", true)]
    #[case(8, 6, false, true, true, false, "password", false)]
    #[case(8, 6, false, true, true, false, "!@£$%^&*", false)]
    #[case(8, 6, false, true, true, false, "p@ssword", true)]
    #[case(8, 6, false, true, true, true, "PASSWORD", false)]
    #[case(8, 6, false, true, true, true, "!@£$%^&*", false)]
    #[case(8, 6, false, true, true, true, "password", false)]
    #[case(8, 6, false, true, true, true, "P@ssword", true)]
    #[case(8, 6, true, false, false, false, "password", false)]
    #[case(8, 6, true, false, false, false, "12345678", true)]
    #[case(8, 6, true, false, false, true, "PASSWORD", false)]
    #[case(8, 6, true, false, false, true, "12345678", false)]
    #[case(8, 6, true, false, false, true, "PASSW0RD", true)]
    #[case(8, 6, true, false, true, false, "12345678", false)]
    #[case(8, 6, true, false, true, false, "!@£$%^&*", false)]
    #[case(8, 6, true, false, true, false, "1234!@£$", true)]
    #[case(8, 6, true, false, true, true, "12345678", false)]
    #[case(8, 6, true, false, true, true, "!@£$%^&*", false)]
    #[case(8, 6, true, false, true, true, "PASSWORD", false)]
    #[case(8, 6, true, false, true, true, "P@SSW0RD", true)]
    #[case(8, 6, true, true, false, false, "12345678", false)]
    #[case(8, 6, true, true, false, false, "password", false)]
    #[case(8, 6, true, true, false, false, "passw0rd", true)]
    #[case(8, 6, true, true, false, true, "12345678", false)]
    #[case(8, 6, true, true, false, true, "PASSWORD", false)]
    #[case(8, 6, true, true, false, true, "password", false)]
    #[case(8, 6, true, true, false, true, "Passw0rd", true)]
    #[case(8, 6, true, true, true, false, "12345678", false)]
    #[case(8, 6, true, true, true, false, "password", false)]
    #[case(8, 6, true, true, true, false, "!@£$%^&*", false)]
    #[case(8, 6, true, true, true, false, "p@ssw0rd", true)]
    #[case(8, 6, true, true, true, true, "12345678", false)]
    #[case(8, 6, true, true, true, true, "PASSWORD", false)]
    #[case(8, 6, true, true, true, true, "!@£$%^&*", false)]
    #[case(8, 6, true, true, true, true, "password", false)]
    #[case(8, 6, true, true, true, true, "P@ssw0rd", true)]
    #[allow(clippy::too_many_arguments)]
    fn validate_against_policy(
        #[case] required_length: usize,
        #[case] required_unique_chars: usize,
        #[case] require_digit: bool,
        #[case] require_lowercase: bool,
        #[case] require_non_alphanumeric: bool,
        #[case] require_uppercase: bool,
        #[case] password: &str,
        #[case] expected: bool,
    ) {
        let policy = policy(
            required_length,
            required_unique_chars,
            require_digit,
            require_lowercase,
            require_non_alphanumeric,
            require_uppercase,
        );
        assert_eq!(policy.validate(password).unwrap(), expected);
        assert_eq!(policy.violations(password).unwrap().is_empty(), expected);
    }

    // character classes follow the general category, not the wider Unicode properties
    #[rstest]
    #[case(policy(8, 6, true, false, false, false), "password²", false)]
    #[case(policy(8, 6, true, false, false, false), "passwordⅧ", false)]
    #[case(policy(8, 6, true, false, false, false), "password½", false)]
    #[case(policy(8, 6, true, false, false, false), "password٣", true)]
    #[case(policy(8, 6, false, false, true, false), "Password²", true)]
    #[case(policy(8, 6, false, false, true, false), "Passwordß", false)]
    #[case(policy(8, 6, false, true, false, false), "PASSªWORD", false)]
    #[case(policy(8, 6, false, true, false, false), "PASSWORDß", true)]
    #[case(policy(8, 6, false, false, false, true), "passwordǅ", false)]
    #[case(policy(8, 6, false, false, false, true), "passwordÄ", true)]
    fn unicode_character_classes(
        #[case] policy: PasswordPolicy,
        #[case] password: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.validate(password).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("\t\r\n")]
    #[case("\u{a0}\u{2003}\u{3000}")]
    fn blank_password_is_invalid_format(#[case] password: &str) {
        for policy in [strict(), policy(0, 0, false, false, false, false)] {
            let err = policy.validate(password).unwrap_err();
            assert!(matches!(err, DomainError::InvalidFormat { name: "password" }));
            assert_eq!(
                err.to_string(),
                "password is empty or consists only of white-space characters."
            );
        }
    }

    #[test]
    fn every_whitespace_char_is_rejected() {
        let policy = PasswordPolicy::default();
        for c in (0..=0x10FFFF_u32)
            .filter_map(char::from_u32)
            .filter(|c| c.is_whitespace())
        {
            let err = policy.validate(&c.to_string()).unwrap_err();
            assert_eq!(err.parameter(), Some("password"), "char {:?}", c);
        }
    }

    #[test]
    fn surrounding_whitespace_does_not_count() {
        let policy = policy(3, 0, false, false, true, false);
        // "ab" plus padding would be long enough and contain non-alphanumerics
        assert!(!policy.validate("  ab  ").unwrap());
        assert!(policy.validate("  a b  ").unwrap());
    }

    #[test]
    fn violations_lists_every_failing_rule_in_order() {
        assert_eq!(
            strict().violations("password").unwrap(),
            vec![
                PolicyViolation::MissingDigit,
                PolicyViolation::MissingNonAlphanumeric,
                PolicyViolation::MissingUppercase,
            ]
        );
        assert_eq!(
            strict().violations("aA1!").unwrap(),
            vec![PolicyViolation::TooShort, PolicyViolation::TooFewUniqueChars]
        );
        assert!(strict().violations("P@ssw0rd").unwrap().is_empty());
    }

    #[test]
    fn disabled_rules_are_not_reported() {
        let policy = policy(1, 1, false, false, false, false);
        assert!(policy.violations("password").unwrap().is_empty());
    }

    #[test]
    fn validate_is_deterministic() {
        let policy = strict();
        for password in ["P@ssw0rd", "password", "  x  "] {
            assert_eq!(policy.validate(password).unwrap(), policy.validate(password).unwrap());
        }
    }

    #[rstest]
    #[case("P@ssw0rd")]
    #[case("abcdefgh")]
    #[case("aaaa")]
    #[case("Ünïcödé-Pässwörd-1")]
    fn stricter_counts_never_turn_failure_into_success(#[case] password: &str) {
        for length in 0..24 {
            for unique in 0..24 {
                let base = policy(length, unique, false, false, false, false);
                if base.validate(password).unwrap() {
                    continue;
                }
                let longer = policy(length + 1, unique, false, false, false, false);
                let more_unique = policy(length, unique + 1, false, false, false, false);
                assert!(!longer.validate(password).unwrap());
                assert!(!more_unique.validate(password).unwrap());
            }
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let policy = policy(4, 0, false, false, false, false);
        assert!(!policy.validate("äöü").unwrap());
        assert!(policy.validate("äöüß").unwrap());
    }
}
