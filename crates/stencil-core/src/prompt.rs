use stencil_error::Result;

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// Asks the user questions. Implemented over a terminal by the CLI.
pub trait Prompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Returns the `value` of the picked choice.
    fn select(&self, message: &str, choices: &[Choice]) -> Result<String>;

    fn input(&self, message: &str, default: Option<&str>, validate: Validator) -> Result<String>;
}
