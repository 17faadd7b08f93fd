//! Input Collector - interactive gathering of the provisioning configuration.
//!
//! Every validation failure is handled here: the user sees what was wrong and
//! the same question is asked again, with no retry limit. Only terminal
//! failures (closed stdin, broken console) leave this module as errors.

use tracing::{debug, instrument};

use crate::{
    application::ports::{Presenter, Prompter},
    domain::{
        DEFAULT_PROJECT_NAME, DEFAULT_SUPERUSER_EMAIL, DomainError, EmailAddress, MailSecurity,
        MailSettings, MessageLevel, NotificationSettings, PasswordRule, ProjectName,
        ProvisioningConfig, ReminderList, Secret, SuperuserPassword,
    },
    error::DsgResult,
};

const MAIL_INTRO: &str = "Now you can configure outgoing email.";
const MAIL_LATER: &str = "Mail server settings can be filled in later in the \".env\" file.";
const MAIL_REMINDER: &str = "Fill in the mail server settings in \".env\" so the site can send \
                             email (needed to confirm new users' addresses)";

const NOTIFICATIONS_INTRO: &str =
    "Now you can configure Telegram notifications for the administrator.";
const NOTIFICATIONS_LATER: &str = "Telegram settings can be filled in later in the \".env\" file.";
const NOTIFICATIONS_REMINDER: &str = "Fill in the Telegram settings in \".env\" so the site can \
                                      notify the administrator about new registrations";

const YES_NO_HINT: &str = "Please answer 'y' or 'n'.";

/// Asks every question of a run and assembles a [`ProvisioningConfig`].
pub struct InputCollector<'a> {
    prompter: &'a dyn Prompter,
    presenter: &'a dyn Presenter,
}

impl<'a> InputCollector<'a> {
    pub fn new(prompter: &'a dyn Prompter, presenter: &'a dyn Presenter) -> Self {
        Self {
            prompter,
            presenter,
        }
    }

    /// Run the whole questionnaire.
    ///
    /// Postponed sections are recorded in `reminders`.
    #[instrument(skip_all)]
    pub fn collect(&self, reminders: &mut ReminderList) -> DsgResult<ProvisioningConfig> {
        let project_name = self.project_name()?;
        debug!(project = %project_name, "Project name accepted");

        self.presenter
            .notice(MessageLevel::Info, &password_requirements());
        let email = self.superuser_email()?;
        let password = self.superuser_password()?;

        let mut config = ProvisioningConfig::new(project_name, email, password);

        if let Some(mail) = self.mail_settings(reminders)? {
            config = config.with_mail(mail);
        }
        if let Some(notifications) = self.notification_settings(reminders)? {
            config = config.with_notifications(notifications);
        }

        debug!(
            mail = config.mail().is_some(),
            notifications = config.notifications().is_some(),
            postponed = reminders.len(),
            "Configuration collected"
        );
        Ok(config)
    }

    fn project_name(&self) -> DsgResult<ProjectName> {
        let prompt = format!("Project name (Enter for \"{DEFAULT_PROJECT_NAME}\")");
        loop {
            let answer = self.prompter.text(&prompt)?;
            if answer.trim().is_empty() {
                return Ok(ProjectName::default());
            }
            match ProjectName::parse(&answer) {
                Ok(name) => return Ok(name),
                Err(err) => self.reject(&err),
            }
        }
    }

    fn superuser_email(&self) -> DsgResult<EmailAddress> {
        let prompt = format!("Superuser email (Enter for \"{DEFAULT_SUPERUSER_EMAIL}\")");
        loop {
            let answer = self.prompter.text(&prompt)?;
            if answer.trim().is_empty() {
                return Ok(EmailAddress::default());
            }
            match EmailAddress::parse(&answer) {
                Ok(email) => return Ok(email),
                Err(err) => self.reject(&err),
            }
        }
    }

    fn superuser_password(&self) -> DsgResult<SuperuserPassword> {
        loop {
            let first = self.prompter.secret("Password")?;
            let second = self.prompter.secret("Repeat the password")?;
            match SuperuserPassword::confirm(&first, &second) {
                Ok(password) => return Ok(password),
                Err(DomainError::WeakPassword(rule)) => {
                    self.presenter.message(MessageLevel::Error, rule.remedy());
                }
                Err(err) => self.reject(&err),
            }
        }
    }

    fn mail_settings(&self, reminders: &mut ReminderList) -> DsgResult<Option<MailSettings>> {
        self.presenter.notice(MessageLevel::Info, MAIL_INTRO);
        if !self.confirm("Configure the mail server now?")? {
            reminders.push(MAIL_REMINDER);
            self.presenter.notice(MessageLevel::Warning, MAIL_LATER);
            return Ok(None);
        }

        let host = self
            .prompter
            .text("SMTP server address (e.g. \"smtp.dsg.pro\")")?
            .trim()
            .to_lowercase();
        let port = self
            .prompter
            .text("Port (e.g. \"465\" with SSL, \"25\" or \"2525\" unencrypted)")?
            .trim()
            .to_owned();
        let username = self
            .prompter
            .text("Login (e.g. \"info@dsg.pro\")")?
            .trim()
            .to_owned();
        let password = Secret::new(self.prompter.secret("Mail password")?.trim());
        let from_address = self
            .prompter
            .text("Sender name and address (e.g. \"Django Starter Generator <info@dsg.pro>\")")?
            .trim()
            .to_owned();

        let security = if self.confirm("Use SSL?")? {
            MailSecurity::Ssl
        } else if self.confirm("Use TLS?")? {
            MailSecurity::Tls
        } else {
            MailSecurity::Plain
        };

        Ok(Some(MailSettings {
            host,
            port,
            username,
            password,
            from_address,
            security,
        }))
    }

    fn notification_settings(
        &self,
        reminders: &mut ReminderList,
    ) -> DsgResult<Option<NotificationSettings>> {
        self.presenter.notice(MessageLevel::Info, NOTIFICATIONS_INTRO);
        if !self.confirm("Configure Telegram now?")? {
            reminders.push(NOTIFICATIONS_REMINDER);
            self.presenter
                .notice(MessageLevel::Warning, NOTIFICATIONS_LATER);
            return Ok(None);
        }

        let bot_token = Secret::new(
            self.prompter
                .text("Telegram bot token used to send notifications")?
                .trim(),
        );
        let admin_chat_id = self
            .prompter
            .text("Administrator's Telegram ID")?
            .trim()
            .to_owned();

        Ok(Some(NotificationSettings {
            bot_token,
            admin_chat_id,
        }))
    }

    /// Yes/no question; anything else repeats it.
    fn confirm(&self, question: &str) -> DsgResult<bool> {
        let prompt = format!("{question} (y/n)");
        loop {
            match parse_yes_no(&self.prompter.text(&prompt)?) {
                Some(answer) => return Ok(answer),
                None => self.presenter.message(MessageLevel::Error, YES_NO_HINT),
            }
        }
    }

    fn reject(&self, err: &DomainError) {
        self.presenter.message(MessageLevel::Error, &err.to_string());
        for hint in err.suggestions() {
            self.presenter.message(MessageLevel::Info, &hint);
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn password_requirements() -> String {
    let mut text = String::from(
        "Next, create the superuser by choosing an email and a password.\n\nPassword requirements:\n",
    );
    for rule in PasswordRule::ALL {
        text.push_str("- ");
        text.push_str(rule.remedy());
        text.push('\n');
    }
    text.push_str("- Special characters are recommended as well.");
    text
}
