use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stencil_constants::{BIN_NAME, DESCRIPTION};

#[derive(Parser)]
#[command(name = BIN_NAME)]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = DESCRIPTION, long_about = None)]
pub struct Cli {
    /// Enable debug mode for verbose output
    #[arg(long, global = true)]
    pub debug: bool,
    /// Use a local template package instead of downloading one
    #[arg(short = 't', long = "target-path", global = true, env = "STENCIL_TARGET_PATH")]
    pub target_path: Option<PathBuf>,
    /// Package registry to download templates from
    #[arg(long, global = true, env = "STENCIL_REGISTRY")]
    pub registry: Option<String>,
    /// Use the npmmirror registry
    #[arg(long, global = true, conflicts_with = "registry")]
    pub mirror: bool,
    /// Directory holding stencil's caches, relative to the home directory
    #[arg(long = "cli-home", global = true, env = "STENCIL_CLI_HOME", hide = true)]
    pub cli_home: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Creates a new project or component from a template
    #[command(alias = "new")]
    Init {
        /// Name of the project
        project_name: Option<String>,
        /// Continue even if the current directory is not empty
        #[arg(short = 'f', long = "force")]
        force: bool,
        /// Do not run the template's install and start commands
        #[arg(long = "skip-install")]
        skip_install: bool,
    },
    /// Manages packages in the shared store
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Installs or updates a package and prints its entry file
    Add {
        /// Package to cache (e.g. tmpl-basic@2.3.0)
        package: String,
    },
    /// Prints the cache directory of a package
    Path {
        /// Package to look up (e.g. tmpl-basic@2.3.0)
        package: String,
    },
    /// Lists cached packages
    #[command(alias = "ls")]
    List,
}
