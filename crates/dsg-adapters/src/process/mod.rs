//! Child process execution for generated scripts.

mod cancel;
mod runner;

pub use cancel::{ArmGuard, CancelToken, INTERRUPTED_EXIT_CODE};
pub use runner::ShellScriptRunner;
