//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not input
//! validation. Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ScriptKind;
use crate::error::ErrorCategory;

/// Errors that occur while running the provisioning pipeline.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The template archive could not be opened or decoded.
    #[error("Template archive {path} is unavailable: {reason}")]
    ArchiveUnavailable { path: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The script could not be written or started.
    #[error("Could not launch the {kind} script: {reason}")]
    ScriptLaunchFailed { kind: ScriptKind, reason: String },

    /// The script ran but exited unsuccessfully.
    #[error("The {kind} script failed{}", exit_suffix(*.code))]
    ScriptFailed { kind: ScriptKind, code: Option<i32> },

    /// The user interrupted a running script.
    #[error("The {kind} script was cancelled")]
    Cancelled { kind: ScriptKind },

    /// The framework-generated settings carry no `SECRET_KEY` line.
    #[error("No SECRET_KEY found in {path}")]
    SecretKeyNotFound { path: PathBuf },

    /// Reading from the terminal failed.
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },

    /// The user pressed Ctrl+C while answering a prompt.
    #[error("Input was interrupted")]
    PromptInterrupted,

    /// An in-memory adapter's lock was poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by a signal)".to_owned(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ArchiveUnavailable { path, .. } => vec![
                format!("Expected the template archive at: {path}"),
                "Run the generator from its own directory".into(),
                "Or set workspace.archive in the configuration".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ScriptLaunchFailed { .. } => vec![
                "Check that a shell is available on PATH".into(),
                "Check that the destination directory is writable".into(),
            ],
            Self::ScriptFailed { kind, .. } => match kind {
                ScriptKind::Install => vec![
                    "Check the output above for the failing command".into(),
                    "Make sure Python 3 with the venv module is installed".into(),
                    "Check your network connection (pip downloads packages)".into(),
                ],
                ScriptKind::Start => vec![
                    "Check the output above for the failing command".into(),
                    "A superuser with this email may already exist".into(),
                ],
            },
            Self::Cancelled { .. } => vec![
                "The run was interrupted; the remaining steps were skipped".into(),
                "Remove the partially created project before running again".into(),
            ],
            Self::SecretKeyNotFound { path } => vec![
                format!("Open {} and check it was generated by django-admin", path.display()),
                "The install script may have failed before creating the project".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "Run the generator from an interactive terminal".into(),
            ],
            Self::PromptInterrupted => {
                vec!["The steps after the interrupted prompt were skipped".into()]
            }
            Self::LockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArchiveUnavailable { .. } | Self::SecretKeyNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::Cancelled { .. } | Self::PromptInterrupted => ErrorCategory::Cancelled,
            Self::FilesystemError { .. }
            | Self::ScriptLaunchFailed { .. }
            | Self::ScriptFailed { .. }
            | Self::PromptFailed { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
