//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `dsg-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateArchive`: Bundled source templates
//!   - `ScriptRunner`: Child process execution
//!   - `Prompter`, `Presenter`: The interactive console

pub mod output;

pub use output::{
    Filesystem, Presenter, Prompter, RunOutcome, ScriptRunner, TemplateArchive,
};

#[cfg(test)]
pub use output::MockPresenter;
