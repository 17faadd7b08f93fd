//! Provisioning Service - the main application orchestrator.
//!
//! This service drives a collected configuration through the pipeline:
//! 1. Render and run the install script
//! 2. Read the generated SECRET_KEY
//! 3. Extract the template archive over the generated project
//! 4. Write the environment file
//! 5. Patch the project-name placeholder
//! 6. Render and run the start script
//!
//! Any failure aborts the remaining stages. Nothing is rolled back.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Presenter, RunOutcome, ScriptRunner, TemplateArchive},
    },
    domain::{
        EnvFile, ExtractionPlan, GeneratedScript, MessageLevel, ProvisioningConfig,
        ScriptRenderer, WorkspaceLayout, locate_secret_key, replace_placeholder,
    },
    error::DsgResult,
};

/// Pipeline stages owned by the service, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    RenderInstallScript,
    RunInstallScript,
    LocateSecretKey,
    ExtractArchive,
    WriteEnvFile,
    PatchTokens,
    RenderStartScript,
    RunStartScript,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Self::RenderInstallScript,
        Self::RunInstallScript,
        Self::LocateSecretKey,
        Self::ExtractArchive,
        Self::WriteEnvFile,
        Self::PatchTokens,
        Self::RenderStartScript,
        Self::RunStartScript,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RenderInstallScript => "render install script",
            Self::RunInstallScript => "run install script",
            Self::LocateSecretKey => "locate secret key",
            Self::ExtractArchive => "extract archive",
            Self::WriteEnvFile => "write environment file",
            Self::PatchTokens => "patch placeholders",
            Self::RenderStartScript => "render start script",
            Self::RunStartScript => "run start script",
        })
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub completed: Vec<Stage>,
    pub extracted_files: usize,
    /// Placeholder replacements per patched file.
    pub patched_files: Vec<(PathBuf, usize)>,
    pub env_file: PathBuf,
}

/// Runs the provisioning pipeline against injected adapters.
pub struct ProvisioningService {
    filesystem: Box<dyn Filesystem>,
    archive: Box<dyn TemplateArchive>,
    runner: Box<dyn ScriptRunner>,
    renderer: ScriptRenderer,
    layout: WorkspaceLayout,
}

impl ProvisioningService {
    /// Create a new provisioning service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use dsg_core::application::ProvisioningService;
    /// use dsg_core::domain::{ScriptFlavor, ScriptRenderer, WorkspaceLayout};
    ///
    /// let service = ProvisioningService::new(
    ///     filesystem, // impl Filesystem
    ///     archive,    // impl TemplateArchive
    ///     runner,     // impl ScriptRunner
    ///     ScriptRenderer::new(ScriptFlavor::native()),
    ///     WorkspaceLayout::new(".."),
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        archive: Box<dyn TemplateArchive>,
        runner: Box<dyn ScriptRunner>,
        renderer: ScriptRenderer,
        layout: WorkspaceLayout,
    ) -> Self {
        Self {
            filesystem,
            archive,
            runner,
            renderer,
            layout,
        }
    }

    /// Provision a new project from a collected configuration.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            root = %self.layout.root().display(),
            flavor = %self.renderer.flavor()
        )
    )]
    pub fn provision(
        &self,
        config: &ProvisioningConfig,
        presenter: &dyn Presenter,
    ) -> DsgResult<ProvisionReport> {
        let project = config.project_name();
        let mut report = ProvisionReport::default();

        let install = self.renderer.install(config);
        report.completed.push(Stage::RenderInstallScript);

        presenter.message(
            MessageLevel::Info,
            "Creating the virtual environment and installing dependencies...",
        );
        self.run_script(&install)?;
        report.completed.push(Stage::RunInstallScript);

        let settings_path = self.layout.settings_file(project);
        let secret_key = self.read_secret_key(&settings_path)?;
        report.completed.push(Stage::LocateSecretKey);

        presenter.message(MessageLevel::Info, "Unpacking project sources...");
        report.extracted_files = self.extract(config)?;
        report.completed.push(Stage::ExtractArchive);

        report.env_file = self.layout.env_file();
        let env = EnvFile::render(config, &secret_key);
        self.write(&report.env_file, env.as_bytes())?;
        debug!(path = %report.env_file.display(), "Environment file written");
        report.completed.push(Stage::WriteEnvFile);

        report.patched_files = self.patch_placeholders(config)?;
        report.completed.push(Stage::PatchTokens);

        let start = self.renderer.start(config);
        report.completed.push(Stage::RenderStartScript);

        presenter.message(
            MessageLevel::Info,
            "Applying migrations, creating the superuser and starting the server...",
        );
        self.run_script(&start)?;
        report.completed.push(Stage::RunStartScript);

        info!(
            files = report.extracted_files,
            patched = report.patched_files.len(),
            "Provisioning completed successfully"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_script(&self, script: &GeneratedScript) -> DsgResult<()> {
        let kind = script.kind();
        info!(script = %script.file_name(), "Running script");

        match self.runner.run(script, self.layout.root())? {
            outcome if outcome.success() => Ok(()),
            RunOutcome::Cancelled => {
                warn!(%kind, "Script cancelled by user");
                Err(ApplicationError::Cancelled { kind }.into())
            }
            RunOutcome::Exited { code } => Err(ApplicationError::ScriptFailed { kind, code }.into()),
        }
    }

    fn read_secret_key(&self, settings_path: &Path) -> DsgResult<String> {
        let settings = self.filesystem.read_to_string(settings_path)?;
        locate_secret_key(&settings).ok_or_else(|| {
            ApplicationError::SecretKeyNotFound {
                path: settings_path.to_path_buf(),
            }
            .into()
        })
    }

    /// Every member is resolved before the first write.
    fn extract(&self, config: &ProvisioningConfig) -> DsgResult<usize> {
        let members = self.archive.read_members()?;
        debug!(
            archive = %self.archive.location(),
            members = members.len(),
            "Archive read"
        );

        let plan = ExtractionPlan::for_project(config.project_name());
        let extractions = plan.resolve(&members)?;

        for extraction in &extractions {
            let destination = self.layout.root().join(extraction.destination.as_path());
            debug!(member = extraction.member, to = %destination.display(), "Extracting");
            self.write(&destination, extraction.contents)?;
        }
        Ok(extractions.len())
    }

    fn patch_placeholders(&self, config: &ProvisioningConfig) -> DsgResult<Vec<(PathBuf, usize)>> {
        let project = config.project_name();
        let mut patched = Vec::new();

        for path in self.layout.placeholder_targets(project) {
            let text = self.filesystem.read_to_string(&path)?;
            let outcome = replace_placeholder(&text, project.as_str());
            if outcome.changed() {
                self.filesystem.write_file(&path, outcome.content.as_bytes())?;
            }
            debug!(path = %path.display(), replacements = outcome.replacements, "Patched");
            patched.push((path, outcome.replacements));
        }
        Ok(patched)
    }

    fn write(&self, path: &Path, content: &[u8]) -> DsgResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }
}
