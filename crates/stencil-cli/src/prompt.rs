use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};

use stencil_core::{Choice, Prompter, Validator};
use stencil_error::{Result, StencilError};

fn prompt_error(err: InquireError) -> StencilError {
    StencilError::Prompt(err.to_string())
}

/// Terminal prompts backed by `inquire`.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn select(&self, message: &str, choices: &[Choice]) -> Result<String> {
        Select::new(message, choices.to_vec())
            .prompt()
            .map(|choice| choice.value)
            .map_err(prompt_error)
    }

    fn input(&self, message: &str, default: Option<&str>, validate: Validator) -> Result<String> {
        let mut text = Text::new(message).with_validator(move |value: &str| {
            Ok::<_, CustomUserError>(match validate(value) {
                Ok(()) => Validation::Valid,
                Err(msg) => Validation::Invalid(msg.into()),
            })
        });
        if let Some(default) = default {
            text = text.with_default(default);
        }
        text.prompt().map_err(prompt_error)
    }
}
