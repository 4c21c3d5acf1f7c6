use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::prompt::InquirePrompter;
use stencil_core::{CliConfig, InitManager, InitOptions};
use stencil_registry::NpmRegistry;

pub struct InitHandler;

impl InitHandler {
    pub fn init_project(
        config: &CliConfig,
        project_name: Option<String>,
        force: bool,
        skip_install: bool,
    ) -> Result<()> {
        Self::print_init_header();

        let options = InitOptions {
            project_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            project_name,
            force,
            skip_install,
        };
        stencil_logger::verbose("projectName", options.project_name.as_deref().unwrap_or(""));
        stencil_logger::verbose("force", &force.to_string());

        let manager = InitManager::new(config, InquirePrompter, NpmRegistry::new(&config.registry));
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(manager.exec(&options))?;
        Ok(())
    }

    fn print_init_header() {
        println!("{} {}", "stencil".bright_cyan().bold(), "init".bright_white());
        println!();
    }
}
