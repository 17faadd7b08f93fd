//! The `.env` file read by the generated project at startup.
//!
//! Format: one `KEY = value` assignment per line, string values in single
//! quotes, booleans as the Python literals `True` / `False`, `#` comments.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::{config::ProvisioningConfig, error::DomainError};

/// SQLite database file name written into every environment file.
pub const DATABASE_NAME: &str = "db.sqlite3";

/// Name of the settings variable carrying the framework's signing key.
pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

/// Find the `SECRET_KEY = ...` assignment in a generated settings file.
///
/// Returns the whole trimmed line. When the key is assigned more than once
/// the last assignment wins, as it does when Python executes the file.
pub fn locate_secret_key(settings: &str) -> Option<String> {
    settings
        .lines()
        .filter(|line| line.starts_with(SECRET_KEY_VAR))
        .last()
        .map(|line| line.trim().to_owned())
}

/// Parsed `KEY -> value` pairs of an environment file.
pub type EnvValues = BTreeMap<String, String>;

/// Renders and reads back the project environment file.
pub struct EnvFile;

impl EnvFile {
    pub fn render(config: &ProvisioningConfig, secret_key_line: &str) -> String {
        let mail = config.mail().cloned().unwrap_or_default();
        let notifications = config.notifications().cloned().unwrap_or_default();

        let mut out = String::new();
        // `write!` into a String cannot fail.
        let _ = writeln!(out, "# Secret key");
        let _ = writeln!(out, "{secret_key_line}");
        let _ = writeln!(out);
        let _ = writeln!(out, "# Allowed hosts");
        let _ = writeln!(out, "ALLOWED_HOSTS = *");
        let _ = writeln!(out);
        let _ = writeln!(out, "# Debug mode");
        let _ = writeln!(out, "DEBUG = {}", py_bool(true));
        let _ = writeln!(out);
        let _ = writeln!(out, "# Database name");
        let _ = writeln!(out, "DATABASE_NAME = {}", quoted(DATABASE_NAME));
        let _ = writeln!(out);
        let _ = writeln!(out, "# Email settings");
        let _ = writeln!(out, "EMAIL_HOST = {}", quoted(&mail.host));
        let _ = writeln!(out, "EMAIL_PORT = {}", quoted(&mail.port));
        let _ = writeln!(out, "EMAIL_HOST_USER = {}", quoted(&mail.username));
        let _ = writeln!(
            out,
            "EMAIL_HOST_PASSWORD = {}",
            quoted(mail.password.expose())
        );
        let _ = writeln!(out, "DEFAULT_FROM_EMAIL = {}", quoted(&mail.from_address));
        let _ = writeln!(out, "EMAIL_USE_TLS = {}", py_bool(mail.security.use_tls()));
        let _ = writeln!(out, "EMAIL_USE_SSL = {}", py_bool(mail.security.use_ssl()));
        let _ = writeln!(out);
        let _ = writeln!(out, "# Telegram bot sending the notifications");
        let _ = writeln!(
            out,
            "TELEGRAM_TOKEN = {}",
            quoted(notifications.bot_token.expose())
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "# Telegram ID of the administrator");
        let _ = writeln!(
            out,
            "ADMIN_TELEGRAM_ID = {}",
            quoted(&notifications.admin_chat_id)
        );
        out
    }

    /// Parse an environment file back into its assignments.
    pub fn parse(text: &str) -> Result<EnvValues, DomainError> {
        dotenvy::from_read_iter(text.as_bytes())
            .map(|item| {
                item.map_err(|e| DomainError::MalformedEnvFile {
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Single-quote a value, which keeps everything literal.
///
/// Single quotes cannot escape anything, so a value holding `'` or `\` goes
/// in double quotes with `\`, `"` and `$` escaped. Unescaped, `$` would
/// start a variable substitution.
fn quoted(value: &str) -> String {
    if !value.contains(['\'', '\\']) {
        return format!("'{value}'");
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
