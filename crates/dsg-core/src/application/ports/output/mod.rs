//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `dsg-adapters` crate provides the filesystem, archive and process
//! implementations; the CLI provides the terminal ones.

use std::path::Path;

use crate::domain::{ArchiveMember, GeneratedScript, MessageLevel};
use crate::error::DsgResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `dsg_adapters::filesystem::LocalFilesystem` (production)
/// - `dsg_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> DsgResult<()>;

    /// Write content to a file, replacing whatever was there.
    fn write_file(&self, path: &Path, content: &[u8]) -> DsgResult<()>;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> DsgResult<String>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> DsgResult<()>;
}

/// Port for the bundled template archive.
///
/// Implemented by:
/// - `dsg_adapters::archive::TarGzArchive` (production)
/// - `dsg_adapters::archive::MemoryArchive` (testing)
pub trait TemplateArchive: Send + Sync {
    /// Human-readable location, used in error messages.
    fn location(&self) -> String;

    /// Read every file member. Directory entries are not returned.
    fn read_members(&self) -> DsgResult<Vec<ArchiveMember>>;
}

/// How a script run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child exited on its own. `code` is `None` when it was killed by a
    /// signal it did not receive from us.
    Exited { code: Option<i32> },
    /// The user interrupted the run and the child was killed.
    Cancelled,
}

impl RunOutcome {
    pub fn success(self) -> bool {
        matches!(self, Self::Exited { code: Some(0) })
    }
}

/// Port for running a generated script to completion.
///
/// The implementation owns the script file for the whole run and must remove
/// it before returning, whatever the outcome.
pub trait ScriptRunner: Send + Sync {
    fn run(&self, script: &GeneratedScript, workdir: &Path) -> DsgResult<RunOutcome>;
}

/// Port for reading answers from the user.
pub trait Prompter {
    /// Read one line of visible input. The trailing newline is not included.
    fn text(&self, prompt: &str) -> DsgResult<String>;

    /// Read one line without echo.
    fn secret(&self, prompt: &str) -> DsgResult<String>;

    /// Block until the user presses Enter.
    fn pause(&self, prompt: &str) -> DsgResult<()>;
}

/// Port for user-facing messages.
#[cfg_attr(test, mockall::automock)]
pub trait Presenter {
    /// A single status line.
    fn message(&self, level: MessageLevel, text: &str);

    /// A framed multi-line block.
    fn notice(&self, level: MessageLevel, text: &str);
}
