//! Terminal prompting with dialoguer.

use std::io::ErrorKind;

use dialoguer::{
    Error as DialoguerError, Input, Password,
    theme::{ColorfulTheme, SimpleTheme, Theme},
};

use dsg_adapters::CancelToken;
use dsg_core::{
    application::{ApplicationError, ports::Prompter},
    error::{DsgError, DsgResult},
};

/// Reads answers from the controlling terminal.
///
/// The cancel token is armed for the length of each prompt, so a Ctrl+C
/// lands as an error from the prompt instead of ending the process while
/// the terminal is still in raw or no-echo mode.
pub struct DialoguerPrompter {
    theme: Box<dyn Theme>,
    cancel: CancelToken,
}

impl DialoguerPrompter {
    pub fn new(color: bool, cancel: CancelToken) -> Self {
        let theme: Box<dyn Theme> = if color {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        };
        Self { theme, cancel }
    }

    fn guarded<T>(&self, ask: impl FnOnce() -> Result<T, DialoguerError>) -> DsgResult<T> {
        let answer = {
            let _armed = self.cancel.arm();
            ask()
        };
        settle(&self.cancel, answer)
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &str) -> DsgResult<String> {
        self.guarded(|| {
            Input::<String>::with_theme(self.theme.as_ref())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
    }

    // Echo is off while this reads, and the read resumes after SIGINT, so an
    // interrupt takes effect once the line is submitted.
    fn secret(&self, prompt: &str) -> DsgResult<String> {
        self.guarded(|| {
            Password::with_theme(self.theme.as_ref())
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
    }

    fn pause(&self, prompt: &str) -> DsgResult<()> {
        self.text(prompt).map(|_| ())
    }
}

/// An answer only counts if no interrupt arrived while it was being read.
fn settle<T>(cancel: &CancelToken, answer: Result<T, DialoguerError>) -> DsgResult<T> {
    if cancel.is_cancelled() {
        return Err(ApplicationError::PromptInterrupted.into());
    }
    answer.map_err(prompt_error)
}

fn prompt_error(err: DialoguerError) -> DsgError {
    let reason = match err {
        DialoguerError::IO(e) if e.kind() == ErrorKind::Interrupted => {
            return ApplicationError::PromptInterrupted.into();
        }
        DialoguerError::IO(e) if e.kind() == ErrorKind::NotConnected => {
            "standard input is not a terminal".to_owned()
        }
        DialoguerError::IO(e) => e.to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    };
    ApplicationError::PromptFailed { reason }.into()
}

#[cfg(test)]
mod tests {
    use std::io;

    use dsg_core::error::ErrorCategory;

    use super::*;

    #[test]
    fn ctrl_c_in_raw_mode_is_a_cancellation() {
        let err = prompt_error(DialoguerError::IO(io::Error::new(
            ErrorKind::Interrupted,
            "read interrupted",
        )));
        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }

    #[test]
    fn detached_stdin_is_a_prompt_failure() {
        let err = prompt_error(DialoguerError::IO(io::Error::new(
            ErrorKind::NotConnected,
            "not a tty",
        )));
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("not a terminal"));
    }

    #[test]
    fn answer_read_after_an_interrupt_is_discarded() {
        let token = CancelToken::new();
        let guard = token.arm();
        token.cancel();
        drop(guard);

        let err = settle(&token, Ok::<_, DialoguerError>("hunter2".to_owned())).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }

    #[test]
    fn answer_passes_through_without_interrupt() {
        let token = CancelToken::new();
        let answer = settle(&token, Ok::<_, DialoguerError>("shop".to_owned())).unwrap();
        assert_eq!(answer, "shop");
    }
}
