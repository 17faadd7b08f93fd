//! The provisioning configuration record and its value objects.
//!
//! Every field is validated at construction, so a [`ProvisioningConfig`]
//! that exists is one the pipeline can use as-is.

use std::fmt;

use crate::domain::{error::DomainError, validation::DomainValidator};

/// Project name used when the user leaves the prompt blank.
pub const DEFAULT_PROJECT_NAME: &str = "core";

/// Superuser email used when the user leaves the prompt blank.
pub const DEFAULT_SUPERUSER_EMAIL: &str = "admin@mysite.ru";

// ── Secret ───────────────────────────────────────────────────────────────────

/// A string that must never end up in logs.
///
/// `Debug` and `Display` both print a fixed mask; call [`Secret::expose`] at
/// the one place the real value is needed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(******)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("******")
    }
}

// ── ProjectName ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        DomainValidator::validate_project_name(name)?;
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectName {
    fn default() -> Self {
        Self(DEFAULT_PROJECT_NAME.to_owned())
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── EmailAddress ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let email = raw.trim();
        if DomainValidator::is_valid_email(email) {
            Ok(Self(email.to_owned()))
        } else {
            Err(DomainError::InvalidEmail {
                email: email.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EmailAddress {
    fn default() -> Self {
        Self(DEFAULT_SUPERUSER_EMAIL.to_owned())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── SuperuserPassword ────────────────────────────────────────────────────────

/// A password that has been typed twice identically and passed every
/// strength rule. There is no other way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperuserPassword(Secret);

impl SuperuserPassword {
    pub fn confirm(first: &str, second: &str) -> Result<Self, DomainError> {
        if first != second {
            return Err(DomainError::PasswordMismatch);
        }
        DomainValidator::validate_password(first).map_err(DomainError::WeakPassword)?;
        Ok(Self(Secret::new(first)))
    }

    pub fn secret(&self) -> &Secret {
        &self.0
    }
}

// ── Mail ─────────────────────────────────────────────────────────────────────

/// Transport security for the SMTP connection. SSL and TLS are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MailSecurity {
    #[default]
    Plain,
    Ssl,
    Tls,
}

impl MailSecurity {
    pub const fn use_ssl(self) -> bool {
        matches!(self, Self::Ssl)
    }

    pub const fn use_tls(self) -> bool {
        matches!(self, Self::Tls)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: String,
    pub username: String,
    pub password: Secret,
    pub from_address: String,
    pub security: MailSecurity,
}

// ── Notifications ────────────────────────────────────────────────────────────

/// Telegram bot used by the generated site to notify its administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSettings {
    pub bot_token: Secret,
    pub admin_chat_id: String,
}

// ── ProvisioningConfig ───────────────────────────────────────────────────────

/// Everything the pipeline needs to know about the project being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningConfig {
    project_name: ProjectName,
    superuser_email: EmailAddress,
    superuser_password: SuperuserPassword,
    mail: Option<MailSettings>,
    notifications: Option<NotificationSettings>,
}

impl ProvisioningConfig {
    pub fn new(
        project_name: ProjectName,
        superuser_email: EmailAddress,
        superuser_password: SuperuserPassword,
    ) -> Self {
        Self {
            project_name,
            superuser_email,
            superuser_password,
            mail: None,
            notifications: None,
        }
    }

    pub fn with_mail(mut self, mail: MailSettings) -> Self {
        self.mail = Some(mail);
        self
    }

    pub fn with_notifications(mut self, notifications: NotificationSettings) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn superuser_email(&self) -> &EmailAddress {
        &self.superuser_email
    }

    pub fn superuser_password(&self) -> &SuperuserPassword {
        &self.superuser_password
    }

    pub fn mail(&self) -> Option<&MailSettings> {
        self.mail.as_ref()
    }

    pub fn notifications(&self) -> Option<&NotificationSettings> {
        self.notifications.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::PasswordRule;

    #[test]
    fn secret_is_masked_in_debug_and_display() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret}"), "******");
        assert!(!format!("{secret:?}").contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn config_debug_never_leaks_passwords() {
        let config = ProvisioningConfig::new(
            ProjectName::default(),
            EmailAddress::default(),
            SuperuserPassword::confirm("Abcdef12", "Abcdef12").unwrap(),
        )
        .with_mail(MailSettings {
            password: Secret::new("smtp-pass"),
            ..MailSettings::default()
        });
        let debug = format!("{config:?}");
        assert!(!debug.contains("Abcdef12"));
        assert!(!debug.contains("smtp-pass"));
    }

    #[test]
    fn mismatch_is_checked_before_strength() {
        assert_eq!(
            SuperuserPassword::confirm("short", "other"),
            Err(DomainError::PasswordMismatch)
        );
    }

    #[test]
    fn matching_weak_password_reports_rule() {
        assert_eq!(
            SuperuserPassword::confirm("abcdefg1", "abcdefg1"),
            Err(DomainError::WeakPassword(PasswordRule::MissingUppercase))
        );
    }

    #[test]
    fn project_name_is_trimmed() {
        assert_eq!(ProjectName::parse("  shop ").unwrap().as_str(), "shop");
    }

    #[test]
    fn defaults_match_prompts() {
        assert_eq!(ProjectName::default().as_str(), "core");
        assert_eq!(EmailAddress::default().as_str(), "admin@mysite.ru");
    }

    #[test]
    fn mail_security_is_exclusive() {
        for security in [MailSecurity::Plain, MailSecurity::Ssl, MailSecurity::Tls] {
            assert!(!(security.use_ssl() && security.use_tls()));
        }
    }
}
