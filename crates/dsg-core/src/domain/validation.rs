//! Centralized input validation.
//!
//! All checks the collector runs against user input live here as pure
//! predicates, so every prompt shares one definition of "valid".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// A single password strength rule.
///
/// Variants are declared in the order they are checked; validation stops at
/// the first one violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRule {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    ContainsWhitespace,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        Self::TooShort,
        Self::MissingUppercase,
        Self::MissingLowercase,
        Self::MissingDigit,
        Self::ContainsWhitespace,
    ];

    /// Whether `candidate` violates this rule.
    pub fn is_violated_by(self, candidate: &str) -> bool {
        match self {
            Self::TooShort => candidate.chars().count() < MIN_PASSWORD_LEN,
            Self::MissingUppercase => !candidate.chars().any(|c| c.is_ascii_uppercase()),
            Self::MissingLowercase => !candidate.chars().any(|c| c.is_ascii_lowercase()),
            Self::MissingDigit => !candidate.chars().any(|c| c.is_ascii_digit()),
            Self::ContainsWhitespace => candidate.chars().any(char::is_whitespace),
        }
    }

    /// Remediation line shown under the prompt.
    pub const fn remedy(self) -> &'static str {
        match self {
            Self::TooShort => "The password must be at least 8 characters long.",
            Self::MissingUppercase => {
                "The password must contain at least one uppercase latin letter."
            }
            Self::MissingLowercase => {
                "The password must contain at least one lowercase latin letter."
            }
            Self::MissingDigit => "The password must contain at least one digit.",
            Self::ContainsWhitespace => "The password must not contain spaces.",
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TooShort => "too short",
            Self::MissingUppercase => "no uppercase letter",
            Self::MissingLowercase => "no lowercase letter",
            Self::MissingDigit => "no digit",
            Self::ContainsWhitespace => "contains whitespace",
        };
        f.write_str(label)
    }
}

pub struct DomainValidator;

impl DomainValidator {
    /// Check `candidate` against every [`PasswordRule`], in order.
    pub fn validate_password(candidate: &str) -> Result<(), PasswordRule> {
        match PasswordRule::ALL
            .into_iter()
            .find(|rule| rule.is_violated_by(candidate))
        {
            Some(rule) => Err(rule),
            None => Ok(()),
        }
    }

    pub fn is_valid_email(candidate: &str) -> bool {
        EMAIL_PATTERN.is_match(candidate)
    }

    /// The name ends up as a Python package created by `django-admin
    /// startproject`, so it has to be a plain identifier.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason| DomainError::InvalidProjectName {
            name: name.into(),
            reason,
        };

        let mut chars = name.chars();
        match chars.next() {
            None => return Err(invalid("name cannot be empty")),
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(invalid("name must start with a latin letter or '_'"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(
                "name may only contain latin letters, digits and '_'",
            ));
        }
        Ok(())
    }
}
