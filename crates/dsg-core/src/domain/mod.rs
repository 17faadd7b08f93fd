//! Core domain layer for DSG.
//!
//! Pure provisioning logic: validation, the configuration record, and every
//! text artifact the pipeline produces (scripts, environment file, patched
//! sources). Nothing here touches the filesystem, a terminal, or a process;
//! I/O is reached through the ports in `crate::application`.

pub mod archive;
pub mod config;
pub mod env_file;
pub mod error;
pub mod message;
pub mod patch;
pub mod paths;
pub mod reminders;
pub mod script;
pub mod validation;

pub use archive::{ArchiveMember, Extraction, ExtractionPlan, SOURCE_PREFIX};
pub use config::{
    DEFAULT_PROJECT_NAME, DEFAULT_SUPERUSER_EMAIL, EmailAddress, MailSecurity, MailSettings,
    NotificationSettings, ProjectName, ProvisioningConfig, Secret, SuperuserPassword,
};
pub use env_file::{DATABASE_NAME, EnvFile, EnvValues, locate_secret_key};
pub use error::{DomainError, ErrorCategory};
pub use message::MessageLevel;
pub use patch::{PLACEHOLDER_TOKEN, PatchOutcome, replace_placeholder};
pub use paths::{RelativePath, WorkspaceLayout};
pub use reminders::ReminderList;
pub use script::{
    DEV_SERVER_URL, GeneratedScript, PYTHON_DEPENDENCIES, RenderContext, ScriptFlavor,
    ScriptKind, ScriptRenderer,
};
pub use validation::{DomainValidator, PasswordRule};
