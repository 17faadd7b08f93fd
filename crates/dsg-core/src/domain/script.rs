//! Install and start scripts for the generated project.
//!
//! Scripts are plain text rendered from fixed templates with `{{VARIABLE}}`
//! placeholders. Credentials are never rendered into the text; they travel
//! in the child process environment instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::config::{ProvisioningConfig, Secret};

/// Packages installed into the project's virtual environment.
pub const PYTHON_DEPENDENCIES: &[&str] = &[
    "Django",
    "python-dotenv",
    "telepot",
    "django-utils-six",
    "typus",
    "django-widget-tweaks",
];

/// Address the development server listens on.
pub const DEV_SERVER_URL: &str = "http://127.0.0.1:8000";

pub const SUPERUSER_EMAIL_VAR: &str = "DJANGO_SUPERUSER_EMAIL";
pub const SUPERUSER_PASSWORD_VAR: &str = "DJANGO_SUPERUSER_PASSWORD";

const POSIX_INSTALL: &str = r#"#!/bin/sh
set -e
python3 -m venv env
. env/bin/activate
python -m pip install --upgrade pip
pip install {{DEPENDENCIES}}
pip freeze > requirements.txt
mkdir -p src/static
cd src
django-admin startproject {{PROJECT_NAME}} .
"#;

const POSIX_START: &str = r#"#!/bin/sh
set -e
. env/bin/activate
cd src
python manage.py makemigrations
python manage.py migrate
python manage.py createsuperuser --no-input
nohup python manage.py runserver > runserver.log 2>&1 &
sleep 2
if command -v xdg-open > /dev/null 2>&1; then
    xdg-open {{SERVER_URL}} > /dev/null 2>&1 || true
elif command -v open > /dev/null 2>&1; then
    open {{SERVER_URL}} || true
fi
"#;

const BATCH_INSTALL: &str = r#"@echo off
python -m venv env || exit /b 1
call env\Scripts\activate.bat
call python.exe -m pip install --upgrade pip
pip install {{DEPENDENCIES}} || exit /b 1
pip freeze > requirements.txt
if not exist src mkdir src
cd src
if not exist static mkdir static
django-admin startproject {{PROJECT_NAME}} . || exit /b 1
"#;

const BATCH_START: &str = r#"@echo off
call env\Scripts\activate.bat
cd src
python manage.py makemigrations || exit /b 1
python manage.py migrate || exit /b 1
python manage.py createsuperuser --no-input || exit /b 1
start "" python manage.py runserver
start "" {{SERVER_URL}}
"#;

// ── RenderContext ────────────────────────────────────────────────────────────

/// Variables available to a script template.
///
/// - `{{UNKNOWN}}` remains as literal `{{UNKNOWN}}` (no error)
/// - a value is inserted verbatim; callers only pass identifiers and
///   fixed strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

// ── Script types ─────────────────────────────────────────────────────────────

/// Shell dialect of a generated script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFlavor {
    /// `sh` script for Linux and macOS.
    Posix,
    /// `cmd.exe` batch file for Windows.
    Batch,
}

impl ScriptFlavor {
    /// Flavor matching the platform this binary was built for.
    pub const fn native() -> Self {
        if cfg!(windows) { Self::Batch } else { Self::Posix }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Posix => "sh",
            Self::Batch => "bat",
        }
    }

    const fn template(self, kind: ScriptKind) -> &'static str {
        match (self, kind) {
            (Self::Posix, ScriptKind::Install) => POSIX_INSTALL,
            (Self::Posix, ScriptKind::Start) => POSIX_START,
            (Self::Batch, ScriptKind::Install) => BATCH_INSTALL,
            (Self::Batch, ScriptKind::Start) => BATCH_START,
        }
    }
}

impl fmt::Display for ScriptFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Posix => "posix",
            Self::Batch => "batch",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Creates the virtualenv, installs dependencies, bootstraps the project.
    Install,
    /// Migrates, creates the superuser, launches the server and browser.
    Start,
}

impl ScriptKind {
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Install => "install_script",
            Self::Start => "start_script",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Install => "install",
            Self::Start => "start",
        })
    }
}

/// A rendered script, ready to be written out and executed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    kind: ScriptKind,
    flavor: ScriptFlavor,
    content: String,
    env: Vec<(String, Secret)>,
}

impl GeneratedScript {
    /// Build a script from arbitrary text. The renderer is the normal source;
    /// this exists for runners and their tests.
    pub fn new(
        kind: ScriptKind,
        flavor: ScriptFlavor,
        content: impl Into<String>,
        env: Vec<(String, Secret)>,
    ) -> Self {
        Self {
            kind,
            flavor,
            content: content.into(),
            env,
        }
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn flavor(&self) -> ScriptFlavor {
        self.flavor
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Extra environment variables for the child process.
    pub fn env(&self) -> &[(String, Secret)] {
        &self.env
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.kind.file_stem(), self.flavor.extension())
    }
}

// ── ScriptRenderer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRenderer {
    flavor: ScriptFlavor,
}

impl ScriptRenderer {
    pub fn new(flavor: ScriptFlavor) -> Self {
        Self { flavor }
    }

    pub fn flavor(&self) -> ScriptFlavor {
        self.flavor
    }

    pub fn install(&self, config: &ProvisioningConfig) -> GeneratedScript {
        self.render(ScriptKind::Install, config, Vec::new())
    }

    pub fn start(&self, config: &ProvisioningConfig) -> GeneratedScript {
        let env = vec![
            (
                SUPERUSER_EMAIL_VAR.to_owned(),
                Secret::new(config.superuser_email().as_str()),
            ),
            (
                SUPERUSER_PASSWORD_VAR.to_owned(),
                config.superuser_password().secret().clone(),
            ),
        ];
        self.render(ScriptKind::Start, config, env)
    }

    fn render(
        &self,
        kind: ScriptKind,
        config: &ProvisioningConfig,
        env: Vec<(String, Secret)>,
    ) -> GeneratedScript {
        let ctx = RenderContext::new()
            .with_variable("PROJECT_NAME", config.project_name().as_str())
            .with_variable("DEPENDENCIES", PYTHON_DEPENDENCIES.join(" "))
            .with_variable("SERVER_URL", DEV_SERVER_URL);

        let mut content = ctx.render(self.flavor.template(kind));
        if self.flavor == ScriptFlavor::Batch {
            content = content.replace('\n', "\r\n");
        }

        GeneratedScript::new(kind, self.flavor, content, env)
    }
}
