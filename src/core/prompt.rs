//! Interactive prompts.
//!
//! Login asks the user for a token through a [`Prompter`], so the terminal
//! can be swapped for scripted answers in tests.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use crate::error::{Result, StarfetchError};

/// One question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Key the answer is bound to, e.g. `"token"`.
    pub key: &'static str,
    pub text: String,
    pub required: bool,
    /// Do not echo the answer.
    pub hidden: bool,
}

impl Question {
    /// A required question whose answer is not echoed.
    #[must_use]
    pub fn secret(key: &'static str, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
            required: true,
            hidden: true,
        }
    }
}

/// Source of answers to [`Question`]s. Blocking.
pub trait Prompter {
    /// Ask one question and return the raw answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt was aborted or the terminal failed.
    fn ask(&self, question: &Question) -> Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &Question) -> Result<String> {
        let answer = if question.hidden {
            Password::with_theme(&self.theme)
                .with_prompt(&question.text)
                .allow_empty_password(!question.required)
                .interact()
        } else {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(&question.text)
                .allow_empty(!question.required)
                .interact_text()
        };

        answer.map_err(|e| StarfetchError::Other(anyhow::Error::new(e)))
    }
}

/// Ask `question` and enforce its `required` flag.
///
/// # Errors
///
/// Returns [`StarfetchError::Credential`] for `service` if the prompt fails or
/// a required answer is blank.
pub fn ask_required(prompter: &dyn Prompter, service: &str, question: &Question) -> Result<String> {
    let answer = prompter
        .ask(question)
        .map_err(|e| StarfetchError::Credential {
            service: service.to_string(),
            reason: format!("prompt aborted ({e})"),
        })?;

    let answer = answer.trim().to_string();
    if question.required && answer.is_empty() {
        return Err(StarfetchError::Credential {
            service: service.to_string(),
            reason: format!("{} is required", question.key),
        });
    }

    Ok(answer)
}
