//! Prompting seam for the wizard
//!
//! Steps ask questions through [`Prompter`] so they can be driven by
//! [`InquirePrompter`] in a terminal and by [`ScriptedPrompter`] in tests.

use super::render::{print_warning, wizard_render_config};
use crate::error::{DeployError, Result};
use inquire::validator::{ErrorMessage, Validation};
use inquire::{Confirm, CustomUserError, Password, PasswordDisplayMode, Select, Text};
use secrecy::{ExposeSecret, SecretString};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Checks a free-text answer, returning the message to show when it is rejected
pub type TextValidator = fn(&str) -> std::result::Result<(), String>;

/// Asks the user questions
pub trait Prompter: Send + Sync {
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Returns the index of the chosen option
    fn select(&self, message: &str, options: &[String]) -> Result<usize>;

    fn text(&self, message: &str, default: Option<&str>, validator: Option<TextValidator>)
        -> Result<String>;

    /// Masked input; an empty answer is allowed
    fn secret(&self, message: &str) -> Result<SecretString>;
}

/// Terminal prompts via inquire
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(message)
            .with_default(default)
            .with_render_config(wizard_render_config())
            .prompt()?)
    }

    fn select(&self, message: &str, options: &[String]) -> Result<usize> {
        let choice = Select::new(message, options.to_vec())
            .with_render_config(wizard_render_config())
            .with_help_message("↑↓ to move, Enter to select, Esc to cancel")
            .raw_prompt()?;
        Ok(choice.index)
    }

    fn text(
        &self,
        message: &str,
        default: Option<&str>,
        validator: Option<TextValidator>,
    ) -> Result<String> {
        let mut prompt = Text::new(message).with_render_config(wizard_render_config());
        if let Some(default) = default {
            prompt = prompt.with_default(default);
        }
        if let Some(validate) = validator {
            prompt = prompt.with_validator(move |input: &str| {
                let verdict = match validate(input) {
                    Ok(()) => Validation::Valid,
                    Err(message) => Validation::Invalid(ErrorMessage::Custom(message)),
                };
                Ok::<_, CustomUserError>(verdict)
            });
        }
        Ok(prompt.prompt()?)
    }

    fn secret(&self, message: &str) -> Result<SecretString> {
        let value = Password::new(message)
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_render_config(wizard_render_config())
            .prompt()?;
        Ok(SecretString::from(value))
    }
}

/// A canned answer for [`ScriptedPrompter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Select(usize),
    /// Empty text takes the prompt's default, as in a terminal
    Text(String),
    Secret(String),
}

/// Replays a fixed list of answers in order
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }

    fn next(&self, message: &str) -> Result<Answer> {
        let mut answers = self
            .answers
            .lock()
            .map_err(|_| DeployError::Prompt("answer queue poisoned".to_string()))?;
        answers
            .pop_front()
            .ok_or_else(|| DeployError::Prompt(format!("no scripted answer for '{}'", message)))
    }

    fn mismatch(message: &str, got: &Answer) -> DeployError {
        DeployError::Prompt(format!("unexpected answer {:?} for '{}'", got, message))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(Self::mismatch(message, &other)),
        }
    }

    fn select(&self, message: &str, options: &[String]) -> Result<usize> {
        match self.next(message)? {
            Answer::Select(index) if index < options.len() => Ok(index),
            other => Err(Self::mismatch(message, &other)),
        }
    }

    fn text(
        &self,
        message: &str,
        default: Option<&str>,
        validator: Option<TextValidator>,
    ) -> Result<String> {
        let value = match self.next(message)? {
            Answer::Text(value) if value.is_empty() => default.unwrap_or_default().to_string(),
            Answer::Text(value) => value,
            other => return Err(Self::mismatch(message, &other)),
        };
        if let Some(validate) = validator {
            validate(&value).map_err(|e| DeployError::validation(message, e))?;
        }
        Ok(value)
    }

    fn secret(&self, message: &str) -> Result<SecretString> {
        match self.next(message)? {
            Answer::Secret(value) => Ok(SecretString::from(value)),
            other => Err(Self::mismatch(message, &other)),
        }
    }
}

/// Ask for a secret until its trimmed value has at least `min_len` characters
pub fn ask_secret(
    prompter: &dyn Prompter,
    message: &str,
    min_len: usize,
    hint: &str,
) -> Result<SecretString> {
    loop {
        let value = prompter.secret(message)?;
        let trimmed = value.expose_secret().trim();
        if trimmed.chars().count() >= min_len {
            return Ok(SecretString::from(trimmed.to_string()));
        }
        print_warning(hint);
    }
}

/// Accepts a TCP port number in 1-65535
pub fn validate_port(input: &str) -> std::result::Result<(), String> {
    match input.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(()),
        _ => Err("Enter a port between 1 and 65535".to_string()),
    }
}

pub fn validate_non_empty(input: &str) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        Err("This value is required".to_string())
    } else {
        Ok(())
    }
}
