pub mod cache;
pub mod catalog;
pub mod config;
pub mod init;
pub mod prompt;
pub mod render;

pub use cache::{CacheEntry, CacheManager};
pub use catalog::{TemplateInfo, TemplateKind, load_catalog};
pub use config::CliConfig;
pub use init::{InitManager, InitOptions, ProjectInfo};
pub use prompt::{Choice, Prompter, Validator};
pub use render::{PlaceholderRenderer, RenderContext, Renderer};
