//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.  It only governs the
//! tool itself: where the project goes, where the template archive is, how
//! scripts are run and whether the tool cleans up after itself.
//!
//! # Resolution order (highest priority first)
//!
//! 1. `DSG_*` environment variables (`__` separates sections,
//!    e.g. `DSG_WORKSPACE__ROOT`)
//! 2. Config file (`--config FILE`, else `config.toml` in the user config dir)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use dsg_core::domain::ScriptFlavor;

const ENV_PREFIX: &str = "DSG";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub workspace: WorkspaceConfig,
    pub cleanup: CleanupConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory the project is created in.
    pub root: PathBuf,
    /// Bundled template archive.
    pub archive: PathBuf,
    /// Script dialect; the host platform's when unset.
    pub script_flavor: Option<ScriptFlavor>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".."),
            archive: PathBuf::from("sources.tar.gz"),
            script_flavor: None,
        }
    }
}

impl WorkspaceConfig {
    pub fn flavor(&self) -> ScriptFlavor {
        self.script_flavor.unwrap_or_else(ScriptFlavor::native)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Delete the generator's own directory after the final Enter.
    pub remove_tool_dir: bool,
    pub tool_dir: PathBuf,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            remove_tool_dir: false,
            tool_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file.map(PathBuf::as_path), None)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `dsg.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "dsg")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("dsg.toml"))
    }

    /// `env` replaces the process environment when given.
    fn load_from(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        let settings = Config::builder()
            .add_source(
                Config::try_from(&Self::default()).context("Failed to encode defaults")?,
            )
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }
}
