use std::fmt;

#[derive(Debug)]
pub enum StencilError {
    Config(String),
    RegistryUnavailable(String, String),
    InstallFailed(String, String),
    TemplateNotFound(String),
    TemplateError(String),
    CommandNotAllowed(String),
    CommandFailed(String, i32),
    Prompt(String),
    IoError(String),
}

impl fmt::Display for StencilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => {
                write!(f, "Invalid configuration: {msg}")
            }
            Self::RegistryUnavailable(name, reason) => {
                write!(f, "Failed to query registry for '{name}': {reason}")
            }
            Self::InstallFailed(spec, reason) => {
                write!(f, "Failed to install {spec}: {reason}")
            }
            Self::TemplateNotFound(msg) => {
                write!(f, "Template not found: {msg}")
            }
            Self::TemplateError(msg) => {
                write!(f, "Template error: {msg}")
            }
            Self::CommandNotAllowed(cmd) => {
                write!(f, "Command '{cmd}' is not allowed")
            }
            Self::CommandFailed(cmd, code) => {
                write!(f, "Command '{cmd}' failed with exit code {code}")
            }
            Self::Prompt(msg) => {
                write!(f, "Prompt error: {msg}")
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {msg}")
            }
        }
    }
}

impl std::error::Error for StencilError {}

impl From<std::io::Error> for StencilError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StencilError>;
