use anyhow::Result;
use owo_colors::OwoColorize;

use stencil_core::{CacheManager, CliConfig};
use stencil_registry::NpmRegistry;

pub struct CacheHandler;

impl CacheHandler {
    fn manager(config: &CliConfig) -> CacheManager<'_, NpmRegistry> {
        CacheManager::new(config, NpmRegistry::new(&config.registry))
    }

    pub fn handle_add(config: &CliConfig, package: &str) -> Result<()> {
        Self::print_header("add", package);

        let rt = tokio::runtime::Runtime::new()?;
        let pkg = rt.block_on(Self::manager(config).add(package))?;

        let version = pkg.resolved_version().unwrap_or_default();
        stencil_logger::finish(&format!("Cached {}@{version}", pkg.package_name()));
        match pkg.get_root_file_path() {
            Some(entry) => println!("{}", entry.display()),
            None => stencil_logger::warn("Package declares no entry file"),
        }
        Ok(())
    }

    pub fn handle_path(config: &CliConfig, package: &str) -> Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        if let Some(path) = rt.block_on(Self::manager(config).path(package))? {
            println!("{}", path.display());
        }
        Ok(())
    }

    pub fn handle_list(config: &CliConfig) -> Result<()> {
        let entries = Self::manager(config).list()?;
        if entries.is_empty() {
            stencil_logger::info("No cached packages");
            return Ok(());
        }

        for entry in entries {
            println!(
                "{}{}{}",
                entry.name.bright_white(),
                "@".bright_black(),
                entry.version.bright_cyan()
            );
        }
        Ok(())
    }

    fn print_header(action: &str, package: &str) {
        println!(
            "{} {} {} {}",
            "stencil".bright_cyan().bold(),
            "cache".bright_white(),
            action.bright_white(),
            package.bright_white()
        );
        println!();
    }
}
