//! Infrastructure adapters for DSG.
//!
//! This crate implements the ports defined in `dsg_core::application::ports`.
//! It contains all filesystem, archive and process I/O.

pub mod archive;
pub mod filesystem;
pub mod process;

// Re-export commonly used adapters
pub use archive::{MemoryArchive, TarGzArchive};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{CancelToken, ShellScriptRunner};
