use std::path::{Path, PathBuf};

use stencil_constants::{
    DEFAULT_CLI_HOME, DEPENDENCIES_CACHE_DIR, NPM_REGISTRY, STORE_DIR, TEMPLATE_CACHE_DIR,
};
use stencil_error::{Result, StencilError};
use stencil_registry::get_default_registry;

/// Settings of one run, built once by the CLI and passed down.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub home: PathBuf,
    pub cli_home: PathBuf,
    /// Local template package to use instead of the registry.
    pub target_path: Option<PathBuf>,
    pub registry: String,
    pub debug: bool,
}

impl CliConfig {
    pub fn new(
        home: Option<PathBuf>,
        cli_home: Option<&str>,
        target_path: Option<&Path>,
        registry: Option<&str>,
        mirror: bool,
        debug: bool,
    ) -> Result<Self> {
        let home = home
            .filter(|home| home.is_dir())
            .ok_or_else(|| StencilError::Config("user home directory does not exist".to_string()))?;

        let cli_home = match cli_home.map(str::trim).filter(|dir| !dir.is_empty()) {
            Some(dir) => home.join(dir),
            None => home.join(DEFAULT_CLI_HOME),
        };

        let target_path = target_path
            .filter(|path| !path.as_os_str().is_empty())
            .map(std::path::absolute)
            .transpose()
            .map_err(|e| StencilError::Config(format!("invalid target path: {e}")))?;

        let registry = match registry.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => url.to_string(),
            None if mirror => get_default_registry(false).to_string(),
            None => NPM_REGISTRY.to_string(),
        };

        Ok(Self {
            home,
            cli_home,
            target_path,
            registry,
            debug,
        })
    }

    #[must_use]
    pub fn template_target_path(&self) -> PathBuf {
        self.cli_home.join(TEMPLATE_CACHE_DIR)
    }

    #[must_use]
    pub fn template_store_dir(&self) -> PathBuf {
        self.template_target_path().join(STORE_DIR)
    }

    #[must_use]
    pub fn dependencies_target_path(&self) -> PathBuf {
        self.cli_home.join(DEPENDENCIES_CACHE_DIR)
    }

    #[must_use]
    pub fn dependencies_store_dir(&self) -> PathBuf {
        self.dependencies_target_path().join(STORE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_constants::MIRROR_REGISTRY;

    #[test]
    fn test_defaults() {
        let home = tempfile::tempdir().unwrap();
        let config =
            CliConfig::new(Some(home.path().to_path_buf()), None, None, None, false, false).unwrap();

        assert_eq!(config.cli_home, home.path().join(".stencil"));
        assert_eq!(
            config.template_store_dir(),
            home.path().join(".stencil/template/node_modules")
        );
        assert_eq!(config.registry, NPM_REGISTRY);
        assert!(config.target_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let home = tempfile::tempdir().unwrap();
        let config = CliConfig::new(
            Some(home.path().to_path_buf()),
            Some(".scaffold"),
            Some(Path::new("/opt/templates/basic")),
            None,
            true,
            true,
        )
        .unwrap();

        assert_eq!(config.cli_home, home.path().join(".scaffold"));
        assert_eq!(config.target_path.as_deref(), Some(Path::new("/opt/templates/basic")));
        assert_eq!(config.registry, MIRROR_REGISTRY);
        assert!(config.debug);
    }

    #[test]
    fn test_missing_home_is_config_error() {
        let result = CliConfig::new(
            Some(PathBuf::from("/definitely/not/a/home")),
            None,
            None,
            None,
            false,
            false,
        );
        assert!(matches!(result, Err(StencilError::Config(_))));
        assert!(CliConfig::new(None, None, None, None, false, false).is_err());
    }
}
