// ============================================================================
// domain/error.rs - VALIDATION AND INVARIANT ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::validation::PasswordRule;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the collector keeps the last one around for its message)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (recoverable at the prompt)
    // ========================================================================
    #[error("Password rejected: {0}")]
    WeakPassword(PasswordRule),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid email address '{email}'")]
    InvalidEmail { email: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: &'static str },

    // ========================================================================
    // Archive layout violations (fatal)
    // ========================================================================
    #[error("Archive member '{member}' is missing")]
    MissingArchiveMember { member: String },

    #[error("Archive contains no files under '{prefix}'")]
    EmptyArchiveSubtree { prefix: String },

    #[error("Unsafe path in archive: {path}")]
    UnsafeArchivePath { path: String },

    // ========================================================================
    // Generated artifacts
    // ========================================================================
    #[error("Malformed environment file: {reason}")]
    MalformedEnvFile { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WeakPassword(rule) => vec![rule.remedy().into()],
            Self::PasswordMismatch => vec!["Type the same password twice".into()],
            Self::InvalidEmail { .. } => {
                vec!["Enter a valid email address, for example user@mymail.ru".into()]
            }
            Self::InvalidProjectName { .. } => vec![
                "Use latin letters, digits and underscores".into(),
                "Start with a letter or an underscore".into(),
                "Examples: core, shop, my_site".into(),
            ],
            Self::MissingArchiveMember { member } => vec![
                format!("The template archive must contain '{member}'"),
                "Re-download the generator; the bundled archive looks incomplete".into(),
            ],
            Self::EmptyArchiveSubtree { prefix } => vec![
                format!("The template archive must contain files under '{prefix}'"),
                "Re-download the generator; the bundled archive looks incomplete".into(),
            ],
            Self::UnsafeArchivePath { .. } => vec![
                "The template archive contains absolute or parent-relative paths".into(),
                "Only use the archive shipped with the generator".into(),
            ],
            Self::MalformedEnvFile { .. } => vec![
                "Open the .env file and check each line has the form KEY = value".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WeakPassword(_)
            | Self::PasswordMismatch
            | Self::InvalidEmail { .. }
            | Self::InvalidProjectName { .. } => ErrorCategory::Validation,
            Self::MissingArchiveMember { .. } | Self::EmptyArchiveSubtree { .. } => {
                ErrorCategory::NotFound
            }
            Self::UnsafeArchivePath { .. } | Self::MalformedEnvFile { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
