//! End-to-end tests of the provisioning pipeline against in-memory adapters.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dsg_adapters::{MemoryArchive, MemoryFilesystem};
use dsg_core::{
    application::{ApplicationError, ProvisioningService, Stage},
    domain::{
        DomainError, EmailAddress, EnvFile, GeneratedScript, MailSecurity, MailSettings,
        MessageLevel, NotificationSettings, PLACEHOLDER_TOKEN, ProjectName, ProvisioningConfig,
        ScriptFlavor, ScriptKind, ScriptRenderer, Secret, SuperuserPassword, WorkspaceLayout,
    },
    error::{DsgError, DsgResult, ErrorCategory},
    prelude::{Presenter, RunOutcome, ScriptRunner},
};

const ROOT: &str = "/work";
const SECRET_LINE: &str = "SECRET_KEY = 'django-insecure-q9$z!k2#v0'";

// ── fakes ────────────────────────────────────────────────────────────────────

/// Stands in for `sh`: the install run creates the files `startproject`
/// would, and every run is recorded.
#[derive(Clone)]
struct FakeRunner {
    fs: MemoryFilesystem,
    settings: String,
    install_outcome: RunOutcome,
    runs: Arc<Mutex<Vec<GeneratedScript>>>,
}

impl FakeRunner {
    fn new(fs: &MemoryFilesystem) -> Self {
        Self {
            fs: fs.clone(),
            settings: format!("from pathlib import Path\n\n{SECRET_LINE}\n\nDEBUG = True\n"),
            install_outcome: RunOutcome::Exited { code: Some(0) },
            runs: Arc::default(),
        }
    }

    fn kinds(&self) -> Vec<ScriptKind> {
        self.runs.lock().unwrap().iter().map(|s| s.kind()).collect()
    }
}

impl ScriptRunner for FakeRunner {
    fn run(&self, script: &GeneratedScript, workdir: &Path) -> DsgResult<RunOutcome> {
        self.runs.lock().unwrap().push(script.clone());
        if script.kind() != ScriptKind::Install {
            return Ok(RunOutcome::Exited { code: Some(0) });
        }
        if self.install_outcome.success() {
            let package = workdir.join("src/shop");
            self.fs.insert_file(package.join("settings.py"), self.settings.clone());
            self.fs.insert_file(package.join("urls.py"), "urlpatterns = []\n");
            self.fs.insert_file(workdir.join("src/manage.py"), "#!/usr/bin/env python\n");
        }
        Ok(self.install_outcome)
    }
}

#[derive(Default)]
struct RecordingPresenter {
    lines: Mutex<Vec<(MessageLevel, String)>>,
}

impl Presenter for RecordingPresenter {
    fn message(&self, level: MessageLevel, text: &str) {
        self.lines.lock().unwrap().push((level, text.to_owned()));
    }

    fn notice(&self, level: MessageLevel, text: &str) {
        self.message(level, text);
    }
}

fn template_archive() -> MemoryArchive {
    MemoryArchive::new()
        .with_file(
            "settings.py",
            "ROOT_URLCONF = '<project_name>.urls'\n\
             WSGI_APPLICATION = '<project_name>.wsgi.application'\n\
             SECRET_KEY = os.getenv('SECRET_KEY')\n",
        )
        .with_file("views.py", "from django.shortcuts import render\n")
        .with_file("urls.py", "from <project_name> import views\n")
        .with_file(".gitignore", "env/\n.env\n")
        .with_file(
            "./src/communications/views.py",
            "from <project_name>.settings import ADMIN_TELEGRAM_ID\n",
        )
        .with_file("src/users/models.py", "class User: ...\n")
        .with_file("src/static/js/script.js", "console.log('ok');\n")
}

fn config() -> ProvisioningConfig {
    ProvisioningConfig::new(
        ProjectName::parse("shop").unwrap(),
        EmailAddress::parse("owner@shop.ru").unwrap(),
        SuperuserPassword::confirm("Abcdef12", "Abcdef12").unwrap(),
    )
}

fn service(
    fs: &MemoryFilesystem,
    archive: MemoryArchive,
    runner: &FakeRunner,
) -> ProvisioningService {
    ProvisioningService::new(
        Box::new(fs.clone()),
        Box::new(archive),
        Box::new(runner.clone()),
        ScriptRenderer::new(ScriptFlavor::Posix),
        WorkspaceLayout::new(ROOT),
    )
}

fn path(relative: &str) -> PathBuf {
    Path::new(ROOT).join(relative)
}

// ── tests ────────────────────────────────────────────────────────────────────

#[test]
fn full_pipeline_produces_patched_project() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);
    let presenter = RecordingPresenter::default();

    let report = service(&fs, template_archive(), &runner)
        .provision(&config(), &presenter)
        .unwrap();

    assert_eq!(report.completed, Stage::ALL.to_vec());
    assert_eq!(report.extracted_files, 7);
    assert_eq!(runner.kinds(), vec![ScriptKind::Install, ScriptKind::Start]);

    let settings = fs.read_file(path("src/shop/settings.py")).unwrap();
    assert!(!settings.contains(PLACEHOLDER_TOKEN));
    assert!(settings.contains("ROOT_URLCONF = 'shop.urls'"));
    assert!(settings.contains("WSGI_APPLICATION = 'shop.wsgi.application'"));

    let urls = fs.read_file(path("src/shop/urls.py")).unwrap();
    assert_eq!(urls, "from shop import views\n");

    let views = fs.read_file(path("src/communications/views.py")).unwrap();
    assert_eq!(views, "from shop.settings import ADMIN_TELEGRAM_ID\n");

    assert!(fs.exists(&path(".gitignore")));
    assert!(fs.exists(&path("src/shop/views.py")));
    assert!(fs.exists(&path("src/static/js/script.js")));
    // Untouched by the archive.
    assert!(fs.exists(&path("src/manage.py")));
}

#[test]
fn patched_file_counts_are_reported() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);

    let report = service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap();

    let counts: Vec<usize> = report.patched_files.iter().map(|(_, n)| *n).collect();
    assert_eq!(counts, vec![2, 1, 1]);
}

#[test]
fn env_file_carries_generated_secret_key_and_collected_values() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);
    let config = config()
        .with_mail(MailSettings {
            host: "smtp.shop.ru".into(),
            port: "587".into(),
            username: "info@shop.ru".into(),
            password: Secret::new("mail-pass"),
            from_address: "Shop <info@shop.ru>".into(),
            security: MailSecurity::Tls,
        })
        .with_notifications(NotificationSettings {
            bot_token: Secret::new("123:abc"),
            admin_chat_id: "42".into(),
        });

    let report = service(&fs, template_archive(), &runner)
        .provision(&config, &RecordingPresenter::default())
        .unwrap();

    assert_eq!(report.env_file, path("src/.env"));
    let text = fs.read_file(&report.env_file).unwrap();
    assert!(text.contains(SECRET_LINE));

    let values = EnvFile::parse(&text).unwrap();
    assert_eq!(values["SECRET_KEY"], "django-insecure-q9$z!k2#v0");
    assert_eq!(values["EMAIL_HOST"], "smtp.shop.ru");
    assert_eq!(values["EMAIL_PORT"], "587");
    assert_eq!(values["EMAIL_HOST_PASSWORD"], "mail-pass");
    assert_eq!(values["DEFAULT_FROM_EMAIL"], "Shop <info@shop.ru>");
    assert_eq!(values["EMAIL_USE_TLS"], "True");
    assert_eq!(values["EMAIL_USE_SSL"], "False");
    assert_eq!(values["TELEGRAM_TOKEN"], "123:abc");
    assert_eq!(values["ADMIN_TELEGRAM_ID"], "42");
}

#[test]
fn start_script_gets_credentials_through_environment() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);

    service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap();

    let runs = runner.runs.lock().unwrap();
    let start = &runs[1];
    assert!(!start.content().contains("Abcdef12"));
    let env: Vec<(&str, &str)> = start
        .env()
        .iter()
        .map(|(k, v)| (k.as_str(), v.expose()))
        .collect();
    assert!(env.contains(&("DJANGO_SUPERUSER_EMAIL", "owner@shop.ru")));
    assert!(env.contains(&("DJANGO_SUPERUSER_PASSWORD", "Abcdef12")));
}

#[test]
fn existing_env_file_is_overwritten() {
    let fs = MemoryFilesystem::new();
    fs.insert_file(path("src/.env"), "STALE = 1\n");
    let runner = FakeRunner::new(&fs);

    service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap();

    let text = fs.read_file(path("src/.env")).unwrap();
    assert!(!text.contains("STALE"));
}

#[test]
fn missing_archive_member_aborts_before_any_write() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);
    let archive = MemoryArchive::new()
        .with_file("settings.py", "")
        .with_file("views.py", "")
        .with_file(".gitignore", "")
        .with_file("src/users/models.py", "");

    let err = service(&fs, archive, &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap_err();

    assert!(matches!(
        err,
        DsgError::Domain(DomainError::MissingArchiveMember { ref member }) if member == "urls.py"
    ));
    assert!(!fs.exists(&path(".gitignore")));
    assert!(!fs.exists(&path("src/users/models.py")));
    assert!(!fs.exists(&path("src/.env")));
    assert_eq!(runner.kinds(), vec![ScriptKind::Install]);
}

#[test]
fn archive_path_escaping_root_is_rejected() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);
    let archive = template_archive().with_file("src/../../etc/passwd", "x");

    let err = service(&fs, archive, &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap_err();

    assert!(matches!(
        err,
        DsgError::Domain(DomainError::UnsafeArchivePath { .. })
    ));
    assert!(!fs.exists(&path(".gitignore")));
}

#[test]
fn failed_install_stops_the_pipeline() {
    let fs = MemoryFilesystem::new();
    let mut runner = FakeRunner::new(&fs);
    runner.install_outcome = RunOutcome::Exited { code: Some(1) };

    let err = service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap_err();

    assert!(matches!(
        err,
        DsgError::Application(ApplicationError::ScriptFailed {
            kind: ScriptKind::Install,
            code: Some(1)
        })
    ));
    assert!(fs.list_files().is_empty());
    assert_eq!(runner.kinds(), vec![ScriptKind::Install]);
}

#[test]
fn cancelled_install_is_a_clean_abort() {
    let fs = MemoryFilesystem::new();
    let mut runner = FakeRunner::new(&fs);
    runner.install_outcome = RunOutcome::Cancelled;

    let err = service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Cancelled);
    assert!(fs.list_files().is_empty());
}

#[test]
fn settings_without_secret_key_is_fatal() {
    let fs = MemoryFilesystem::new();
    let mut runner = FakeRunner::new(&fs);
    runner.settings = "DEBUG = True\n".into();

    let err = service(&fs, template_archive(), &runner)
        .provision(&config(), &RecordingPresenter::default())
        .unwrap_err();

    assert!(matches!(
        err,
        DsgError::Application(ApplicationError::SecretKeyNotFound { .. })
    ));
    assert!(!fs.exists(&path(".gitignore")));
}

#[test]
fn progress_is_reported_as_info() {
    let fs = MemoryFilesystem::new();
    let runner = FakeRunner::new(&fs);
    let presenter = RecordingPresenter::default();

    service(&fs, template_archive(), &runner)
        .provision(&config(), &presenter)
        .unwrap();

    let lines = presenter.lines.lock().unwrap();
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|(level, _)| *level == MessageLevel::Info));
}
