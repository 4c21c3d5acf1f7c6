pub mod commands;
pub mod handlers;
pub mod prompt;

use clap::Parser;

use commands::{CacheAction, Cli, Commands};
use handlers::{CacheHandler, InitHandler};
use stencil_core::CliConfig;

pub fn build_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let config = CliConfig::new(
        dirs::home_dir(),
        cli.cli_home.as_deref(),
        cli.target_path.as_deref(),
        cli.registry.as_deref(),
        cli.mirror,
        cli.debug,
    )?;
    Ok(config)
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    stencil_logger::init_logger(false, config.debug);
    stencil_logger::verbose("cliHome", &config.cli_home.display().to_string());

    match cli.command {
        Commands::Init {
            project_name,
            force,
            skip_install,
        } => InitHandler::init_project(&config, project_name, force, skip_install),
        Commands::Cache { action } => match action {
            CacheAction::Add { package } => CacheHandler::handle_add(&config, &package),
            CacheAction::Path { package } => CacheHandler::handle_path(&config, &package),
            CacheAction::List => CacheHandler::handle_list(&config),
        },
    }
}
