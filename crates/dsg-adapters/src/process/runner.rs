//! Runs a generated script as a child process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use dsg_core::{
    application::{
        ApplicationError,
        ports::{RunOutcome, ScriptRunner},
    },
    domain::{GeneratedScript, ScriptFlavor, ScriptKind},
    error::{DsgError, DsgResult},
};

use super::cancel::CancelToken;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Script file on disk, removed when dropped.
#[derive(Debug)]
struct TempScript {
    path: PathBuf,
}

impl TempScript {
    fn create(dir: &Path, script: &GeneratedScript) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(script.file_name());
        fs::write(&path, script.content())?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Script file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not remove script file"),
        }
    }
}

/// Runs scripts with `sh` or `cmd /C`, polling until exit or cancellation.
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    token: CancelToken,
    poll_interval: Duration,
}

impl ShellScriptRunner {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The file is named relative to `workdir`, which becomes the child's
    /// working directory.
    fn command(script: &GeneratedScript, workdir: &Path) -> Command {
        let mut command = match script.flavor() {
            ScriptFlavor::Posix => Command::new("sh"),
            ScriptFlavor::Batch => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C");
                cmd
            }
        };
        command.arg(script.file_name()).current_dir(workdir);
        for (key, value) in script.env() {
            command.env(key, value.expose());
        }
        command
    }

    fn wait(&self, child: &mut Child, kind: ScriptKind) -> DsgResult<RunOutcome> {
        loop {
            if self.token.is_cancelled() {
                terminate(child, kind)?;
                return Ok(RunOutcome::Cancelled);
            }

            let status = child.try_wait().map_err(|e| launch_error(kind, e))?;
            if let Some(status) = status {
                // The terminal delivers Ctrl+C to the child as well, so it
                // may exit before we see the flag.
                if self.token.is_cancelled() {
                    return Ok(RunOutcome::Cancelled);
                }
                return Ok(exited(status));
            }

            thread::sleep(self.poll_interval);
        }
    }
}

impl ScriptRunner for ShellScriptRunner {
    #[instrument(skip_all, fields(script = %script.file_name(), workdir = %workdir.display()))]
    fn run(&self, script: &GeneratedScript, workdir: &Path) -> DsgResult<RunOutcome> {
        let kind = script.kind();
        let file = TempScript::create(workdir, script).map_err(|e| launch_error(kind, e))?;
        debug!(path = %file.path().display(), "Script written");

        let _armed = self.token.arm();
        let mut child = Self::command(script, workdir)
            .spawn()
            .map_err(|e| launch_error(kind, e))?;
        debug!(pid = child.id(), "Script started");

        let outcome = self.wait(&mut child, kind)?;
        info!(?outcome, "Script finished");
        Ok(outcome)
    }
}

fn terminate(child: &mut Child, kind: ScriptKind) -> DsgResult<()> {
    warn!(pid = child.id(), "Killing script");
    match child.kill() {
        Ok(()) => {}
        // Already exited.
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
        Err(e) => return Err(launch_error(kind, e)),
    }
    child.wait().map_err(|e| launch_error(kind, e))?;
    Ok(())
}

fn exited(status: ExitStatus) -> RunOutcome {
    RunOutcome::Exited {
        code: status.code(),
    }
}

fn launch_error(kind: ScriptKind, e: io::Error) -> DsgError {
    ApplicationError::ScriptLaunchFailed {
        kind,
        reason: e.to_string(),
    }
    .into()
}
