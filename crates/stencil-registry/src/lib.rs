pub mod client;
pub mod package_info;

pub use client::NpmRegistry;
pub use package_info::PackageInfo;

use std::future::Future;
use std::path::Path;

use stencil_constants::{MIRROR_REGISTRY, NPM_REGISTRY};
use stencil_error::Result;

/// A package to install at an exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
}

impl PackageSpec {
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Everything the package cache needs from a package registry.
pub trait Registry {
    fn registry_url(&self) -> &str;

    /// Latest published version of `name`. Fails with `RegistryUnavailable`.
    fn latest_version(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Installs every package, as published on `registry_url`, into its
    /// cache entry under `store_dir`.
    /// Fails with `InstallFailed`; a failed package leaves no cache entry behind.
    fn install_packages(
        &self,
        root: &Path,
        store_dir: &Path,
        registry_url: &str,
        pkgs: &[PackageSpec],
    ) -> impl Future<Output = Result<()>> + Send;
}

#[must_use]
pub const fn get_default_registry(original: bool) -> &'static str {
    if original { NPM_REGISTRY } else { MIRROR_REGISTRY }
}
