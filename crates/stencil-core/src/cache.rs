use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CliConfig;
use stencil_constants::LATEST_TAG;
use stencil_error::Result;
use stencil_package::{Package, PackageOptions};
use stencil_registry::Registry;
use stencil_store::PathResolver;
use stencil_utils::parse_pkg_spec;

/// Cached packages outside of the template flow, kept under
/// `<cli_home>/dependencies`.
pub struct CacheManager<'a, R> {
    config: &'a CliConfig,
    registry: R,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

impl<'a, R: Registry + Clone> CacheManager<'a, R> {
    pub const fn new(config: &'a CliConfig, registry: R) -> Self {
        Self { config, registry }
    }

    fn package(&self, spec: &str) -> Result<Package<R>> {
        let (name, version) = parse_pkg_spec(spec);
        Package::new(
            PackageOptions {
                target_path: self.config.dependencies_target_path(),
                store_dir: Some(self.config.dependencies_store_dir()),
                package_name: name,
                package_version: version,
            },
            self.registry.clone(),
        )
    }

    /// Installs `spec` if it is not cached. A cached `latest` request is
    /// moved to the newest published version.
    pub async fn add(&self, spec: &str) -> Result<Package<R>> {
        let (_, requested) = parse_pkg_spec(spec);
        let mut pkg = self.package(spec)?;

        if pkg.exists().await? {
            if requested == LATEST_TAG {
                stencil_logger::status(&format!("Updating {}...", pkg.package_name()));
                pkg.update().await?;
            }
        } else {
            stencil_logger::status(&format!("Installing {}...", pkg.package_name()));
            pkg.install().await?;
        }

        Ok(pkg)
    }

    /// Cache directory `spec` resolves to.
    pub async fn path(&self, spec: &str) -> Result<Option<PathBuf>> {
        let mut pkg = self.package(spec)?;
        pkg.prepare().await?;
        Ok(pkg.cache_file_path())
    }

    /// Every version cached in the store, sorted by name then version.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        list_store(&self.config.dependencies_store_dir())
    }
}

pub fn list_store(store_dir: &Path) -> Result<Vec<CacheEntry>> {
    if !store_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(store_dir)?.flatten() {
        let dir_name = entry.file_name();
        let Some((name, version)) = PathResolver::parse_cache_dir_name(&dir_name.to_string_lossy())
        else {
            continue;
        };

        if name.starts_with('@') {
            // scoped: the package directory sits one level deeper
            for child in fs::read_dir(entry.path())?.flatten() {
                entries.push(CacheEntry {
                    name: format!("{name}/{}", child.file_name().to_string_lossy()),
                    version: version.clone(),
                    path: child.path(),
                });
            }
        } else {
            entries.push(CacheEntry {
                name,
                version,
                path: entry.path(),
            });
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
    Ok(entries)
}
