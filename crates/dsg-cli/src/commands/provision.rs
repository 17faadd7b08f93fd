//! The generator run: prompts, provisioning, closing notices.
//!
//! Responsibility: wire adapters into the core services and talk to the
//! user. No business logic lives here.

use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use dsg_adapters::{CancelToken, LocalFilesystem, ShellScriptRunner, TarGzArchive};
use dsg_core::{
    application::{
        ApplicationError, InputCollector, ProvisioningService,
        ports::{Filesystem, Presenter, Prompter},
    },
    domain::{MessageLevel, ReminderList, ScriptRenderer, WorkspaceLayout},
};

use crate::{
    config::{AppConfig, CleanupConfig},
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::DialoguerPrompter,
};

const START_DEPLOYMENT: &str = "Great!\nStarting the project deployment...";
const SUCCESS: &str = "The project has been created and configured.\nHappy coding!";
const FINISH_PROMPT: &str = "Press Enter to finish";

const REMOVE_ATTEMPTS: u32 = 5;
const REMOVE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Execute a full generator run.
///
/// 1. Check the template archive is there
/// 2. Collect the configuration interactively
/// 3. Run the provisioning pipeline
/// 4. Print the closing notices and wait for Enter
/// 5. Optionally remove the generator's own directory
#[instrument(skip_all)]
pub fn execute(config: AppConfig, output: OutputManager) -> CliResult<()> {
    output.banner()?;

    let archive = TarGzArchive::new(&config.workspace.archive);
    if !archive.path().is_file() {
        return Err(CliError::Core(
            ApplicationError::ArchiveUnavailable {
                path: archive.path().display().to_string(),
                reason: "file not found".into(),
            }
            .into(),
        ));
    }

    let token = CancelToken::new();
    token
        .install_interrupt_handler()
        .map_err(|e| CliError::Setup {
            message: "could not install the Ctrl+C handler".into(),
            source: Some(Box::new(e)),
        })?;

    let prompter = DialoguerPrompter::new(output.supports_color(), token.clone());
    let mut reminders = ReminderList::new();
    let provisioning = InputCollector::new(&prompter, &output).collect(&mut reminders)?;

    output.notice(MessageLevel::Info, START_DEPLOYMENT);

    let flavor = config.workspace.flavor();
    debug!(%flavor, root = %config.workspace.root.display(), "Building pipeline");
    let service = ProvisioningService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(archive),
        Box::new(ShellScriptRunner::new(token)),
        ScriptRenderer::new(flavor),
        WorkspaceLayout::new(&config.workspace.root),
    );
    let report = service.provision(&provisioning, &output)?;
    info!(
        project = %provisioning.project_name(),
        files = report.extracted_files,
        "Project provisioned"
    );

    output.notice(MessageLevel::Success, SUCCESS);
    if let Some(block) = reminders.render() {
        output.notice(MessageLevel::Warning, &block);
    }

    prompter.pause(FINISH_PROMPT)?;

    if config.cleanup.remove_tool_dir {
        remove_tool_dir(&config.cleanup, &config.workspace.root, &output);
    }
    Ok(())
}

/// Best-effort removal of the generator's directory.
///
/// Never removes a directory that contains the project root.
fn remove_tool_dir(cleanup: &CleanupConfig, project_root: &Path, output: &dyn Presenter) {
    let (tool_dir, project_root) = match (
        cleanup.tool_dir.canonicalize(),
        project_root.canonicalize(),
    ) {
        (Ok(tool), Ok(root)) => (tool, root),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Cannot resolve directories, skipping cleanup");
            return;
        }
    };

    if project_root.starts_with(&tool_dir) {
        output.message(
            MessageLevel::Warning,
            &format!(
                "Not removing {}: the project lives inside it",
                tool_dir.display()
            ),
        );
        return;
    }

    // Windows refuses to delete the working directory.
    if let Some(parent) = tool_dir.parent() {
        if let Err(e) = std::env::set_current_dir(parent) {
            debug!(error = %e, "Could not leave the tool directory");
        }
    }

    let removed = remove_with_retries(
        &LocalFilesystem::new(),
        &tool_dir,
        REMOVE_ATTEMPTS,
        REMOVE_RETRY_DELAY,
    );
    match removed {
        Ok(()) => info!(dir = %tool_dir.display(), "Tool directory removed"),
        Err(attempts) => output.message(
            MessageLevel::Warning,
            &format!(
                "Could not remove {} after {attempts} attempts; delete it manually",
                tool_dir.display()
            ),
        ),
    }
}

/// Returns the number of attempts made on failure.
fn remove_with_retries(
    fs: &dyn Filesystem,
    dir: &Path,
    attempts: u32,
    delay: Duration,
) -> Result<(), u32> {
    for attempt in 1..=attempts {
        match fs.remove_dir_all(dir) {
            Ok(()) => return Ok(()),
            Err(e) => {
                debug!(attempt, error = %e, "Removal failed");
                if attempt < attempts {
                    thread::sleep(delay);
                }
            }
        }
    }
    Err(attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_adapters::MemoryFilesystem;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Captured(RefCell<Vec<String>>);

    impl Presenter for Captured {
        fn message(&self, _level: MessageLevel, text: &str) {
            self.0.borrow_mut().push(text.to_owned());
        }

        fn notice(&self, level: MessageLevel, text: &str) {
            self.message(level, text);
        }
    }

    #[test]
    fn retries_stop_after_success() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("/tool/dsg", "bin");

        let result = remove_with_retries(&fs, Path::new("/tool"), 5, Duration::ZERO);

        assert_eq!(result, Ok(()));
        assert!(!fs.exists(Path::new("/tool/dsg")));
    }

    #[test]
    fn retries_report_attempt_count() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        let result = remove_with_retries(&LocalFilesystem::new(), &missing, 3, Duration::ZERO);

        assert_eq!(result, Err(3));
    }

    #[test]
    fn tool_dir_containing_project_is_kept() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        std::fs::create_dir(&project).unwrap();
        let cleanup = CleanupConfig {
            remove_tool_dir: true,
            tool_dir: PathBuf::from(dir.path()),
        };
        let presenter = Captured::default();

        remove_tool_dir(&cleanup, &project, &presenter);

        assert!(project.exists());
        assert!(presenter.0.borrow()[0].contains("project lives inside it"));
    }
}
