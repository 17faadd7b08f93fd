//! Application layer for DSG.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (InputCollector, ProvisioningService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{InputCollector, ProvisionReport, ProvisioningService, Stage};

pub use ports::{Filesystem, Presenter, Prompter, RunOutcome, ScriptRunner, TemplateArchive};

pub use error::ApplicationError;
