//! DSG Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Django
//! Starter Generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             dsg-cli (CLI)               │
//! │   (Prompter, Presenter, orchestration)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (InputCollector, ProvisioningService)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, TemplateArchive, Runner)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      dsg-adapters (Infrastructure)      │
//! │ (LocalFilesystem, TarGzArchive, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (Validators, scripts, env file, plan)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dsg_core::prelude::*;
//!
//! let mut reminders = ReminderList::new();
//! let config = InputCollector::new(&prompter, &presenter).collect(&mut reminders)?;
//!
//! let service = ProvisioningService::new(filesystem, archive, runner, renderer, layout);
//! service.provision(&config, &presenter)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InputCollector, ProvisionReport, ProvisioningService, Stage,
        ports::{Filesystem, Presenter, Prompter, RunOutcome, ScriptRunner, TemplateArchive},
    };
    pub use crate::domain::{
        ArchiveMember, MessageLevel, ProjectName, ProvisioningConfig, ReminderList,
        ScriptFlavor, ScriptRenderer, WorkspaceLayout,
    };
    pub use crate::error::{DsgError, DsgResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
