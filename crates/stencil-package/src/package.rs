use std::fs;
use std::path::{Path, PathBuf};

use stencil_constants::LATEST_TAG;
use stencil_error::{Result, StencilError};
use stencil_project::{find_package_dir, read_package_json};
use stencil_registry::{PackageSpec, Registry};
use stencil_store::cache_path_for;
use stencil_utils::format_path;

#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Where the package is used from. In direct-path mode this is the package itself.
    pub target_path: PathBuf,
    /// Shared store; `None` switches to direct-path mode.
    pub store_dir: Option<PathBuf>,
    pub package_name: String,
    /// A concrete version or `latest`.
    pub package_version: String,
}

/// One named, versioned package and its place in the local cache.
///
/// With a store directory the package lives in a version-keyed cache entry
/// under it and can be installed or updated through the registry. Without
/// one the package is whatever sits at `target_path`.
pub struct Package<R> {
    target_path: PathBuf,
    store_dir: Option<PathBuf>,
    package_name: String,
    package_version: String,
    resolved_version: Option<String>,
    registry: R,
}

impl<R: Registry> Package<R> {
    pub fn new(options: PackageOptions, registry: R) -> Result<Self> {
        let PackageOptions {
            target_path,
            store_dir,
            package_name,
            package_version,
        } = options;

        if package_name.trim().is_empty() {
            return Err(StencilError::Config("package name must not be empty".to_string()));
        }
        if package_version.trim().is_empty() {
            return Err(StencilError::Config(format!(
                "version of '{package_name}' must not be empty"
            )));
        }
        if target_path.as_os_str().is_empty() {
            return Err(StencilError::Config(format!(
                "target path of '{package_name}' must not be empty"
            )));
        }
        if !target_path.is_absolute() {
            return Err(StencilError::Config(format!(
                "target path of '{package_name}' must be absolute, got {}",
                target_path.display()
            )));
        }
        if let Some(dir) = store_dir.as_deref() {
            if dir.as_os_str().is_empty() {
                return Err(StencilError::Config(format!(
                    "store directory of '{package_name}' must not be empty"
                )));
            }
            if !dir.is_absolute() {
                return Err(StencilError::Config(format!(
                    "store directory of '{package_name}' must be absolute, got {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            target_path,
            store_dir,
            package_name,
            package_version,
            resolved_version: None,
            registry,
        })
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    #[must_use]
    pub fn store_dir(&self) -> Option<&Path> {
        self.store_dir.as_deref()
    }

    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.store_dir.is_some()
    }

    #[must_use]
    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved_version.as_deref()
    }

    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Turns the requested version into a concrete one. `latest` asks the
    /// registry; anything else is taken verbatim. Runs once per instance.
    pub async fn prepare(&mut self) -> Result<()> {
        if self.resolved_version.is_some() {
            return Ok(());
        }

        let version = if self.package_version == LATEST_TAG {
            self.registry.latest_version(&self.package_name).await?
        } else {
            self.package_version.clone()
        };

        self.resolved_version = Some(version);
        Ok(())
    }

    /// Cache entry of the resolved version, when in shared mode and resolved.
    #[must_use]
    pub fn cache_file_path(&self) -> Option<PathBuf> {
        let store_dir = self.store_dir.as_deref()?;
        let version = self.resolved_version.as_deref()?;
        Some(cache_path_for(store_dir, &self.package_name, version))
    }

    fn specific_cache_file_path(&self, version: &str) -> Result<PathBuf> {
        let store_dir = self.require_store_dir()?;
        Ok(cache_path_for(store_dir, &self.package_name, version))
    }

    fn require_store_dir(&self) -> Result<&Path> {
        self.store_dir.as_deref().ok_or_else(|| {
            StencilError::Config(format!(
                "'{}' has no store directory; direct-path packages are never installed",
                self.package_name
            ))
        })
    }

    pub async fn exists(&mut self) -> Result<bool> {
        let Some(store_dir) = self.store_dir.as_deref() else {
            return Ok(self.target_path.exists());
        };

        fs::create_dir_all(store_dir)?;
        self.prepare().await?;

        Ok(self.cache_file_path().is_some_and(|path| path.exists()))
    }

    /// Installs the resolved version into the store. Only meaningful while
    /// `exists()` is false.
    pub async fn install(&mut self) -> Result<()> {
        self.require_store_dir()?;
        self.prepare().await?;

        let version = self.resolved_version.clone().unwrap_or_default();
        self.install_version(&version).await
    }

    /// Moves to the newest published version, installing it if it is not
    /// cached yet. Older entries stay on disk.
    pub async fn update(&mut self) -> Result<()> {
        self.require_store_dir()?;

        let latest_version = self.registry.latest_version(&self.package_name).await?;
        let latest_path = self.specific_cache_file_path(&latest_version)?;

        if !latest_path.exists() {
            self.install_version(&latest_version).await?;
        }

        self.resolved_version = Some(latest_version);
        Ok(())
    }

    async fn install_version(&self, version: &str) -> Result<()> {
        let store_dir = self.require_store_dir()?;
        let pkgs = [PackageSpec::new(&self.package_name, version)];

        self.registry
            .install_packages(
                &self.target_path,
                store_dir,
                self.registry.registry_url(),
                &pkgs,
            )
            .await
    }

    /// Directory the package is read from: its cache entry in shared mode,
    /// `target_path` otherwise.
    #[must_use]
    pub fn root_dir(&self) -> Option<PathBuf> {
        if self.is_shared() {
            self.cache_file_path()
        } else {
            Some(self.target_path.clone())
        }
    }

    /// Entry file declared by the nearest manifest, or `None` when there is
    /// no manifest or it declares no entry.
    #[must_use]
    pub fn get_root_file_path(&self) -> Option<PathBuf> {
        let root = self.root_dir()?;
        if !root.is_dir() {
            return None;
        }
        let dir = find_package_dir(&root)?;
        let manifest = read_package_json(&dir).ok()?;
        let entry = manifest.entry()?;

        Some(PathBuf::from(format_path(&dir.join(entry))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRegistry {
        latest: Mutex<String>,
        offline: bool,
        fail_install: bool,
        latest_calls: AtomicUsize,
        install_calls: AtomicUsize,
    }

    impl MockRegistry {
        fn new(latest: &str) -> Self {
            Self {
                latest: Mutex::new(latest.to_string()),
                offline: false,
                fail_install: false,
                latest_calls: AtomicUsize::new(0),
                install_calls: AtomicUsize::new(0),
            }
        }

        fn publish(&self, version: &str) {
            *self.latest.lock().unwrap() = version.to_string();
        }

        fn latest_calls(&self) -> usize {
            self.latest_calls.load(Ordering::SeqCst)
        }

        fn install_calls(&self) -> usize {
            self.install_calls.load(Ordering::SeqCst)
        }
    }

    impl Registry for MockRegistry {
        fn registry_url(&self) -> &str {
            "https://registry.example.test"
        }

        async fn latest_version(&self, name: &str) -> Result<String> {
            self.latest_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(StencilError::RegistryUnavailable(
                    name.to_string(),
                    "offline".to_string(),
                ));
            }
            Ok(self.latest.lock().unwrap().clone())
        }

        async fn install_packages(
            &self,
            _root: &Path,
            store_dir: &Path,
            registry_url: &str,
            pkgs: &[PackageSpec],
        ) -> Result<()> {
            self.install_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(registry_url, self.registry_url());
            for pkg in pkgs {
                if self.fail_install {
                    return Err(StencilError::InstallFailed(pkg.to_string(), "boom".to_string()));
                }
                let entry = cache_path_for(store_dir, &pkg.name, &pkg.version);
                fs::create_dir_all(&entry)?;
                fs::write(
                    entry.join("package.json"),
                    format!(r#"{{"name":"{}","version":"{}","main":"lib/index.js"}}"#, pkg.name, pkg.version),
                )?;
            }
            Ok(())
        }
    }

    fn shared(home: &Path, version: &str, registry: MockRegistry) -> Package<MockRegistry> {
        let target_path = home.join("template");
        Package::new(
            PackageOptions {
                store_dir: Some(target_path.join("node_modules")),
                target_path,
                package_name: "tmpl-basic".to_string(),
                package_version: version.to_string(),
            },
            registry,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_latest_install_then_exists() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "latest", MockRegistry::new("2.3.0"));

        pkg.prepare().await.unwrap();
        assert_eq!(pkg.resolved_version(), Some("2.3.0"));
        assert!(!pkg.exists().await.unwrap());

        pkg.install().await.unwrap();
        assert!(pkg.exists().await.unwrap());
        assert_eq!(
            pkg.cache_file_path().unwrap(),
            home.path()
                .join("template")
                .join("node_modules")
                .join("_tmpl-basic@2.3.0@tmpl-basic")
        );
        assert_eq!(pkg.registry().latest_calls(), 1);
    }

    #[tokio::test]
    async fn test_concrete_version_skips_registry() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "1.0.0", MockRegistry::new("2.3.0"));

        pkg.prepare().await.unwrap();

        assert_eq!(pkg.resolved_version(), Some("1.0.0"));
        assert_eq!(pkg.registry().latest_calls(), 0);
    }

    #[tokio::test]
    async fn test_exists_creates_store_dir() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "1.0.0", MockRegistry::new("1.0.0"));
        let store = pkg.store_dir().unwrap().to_path_buf();
        assert!(!store.exists());

        assert!(!pkg.exists().await.unwrap());
        assert!(store.is_dir());
    }

    #[tokio::test]
    async fn test_update_installs_new_version_and_keeps_old() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "latest", MockRegistry::new("2.3.0"));
        pkg.install().await.unwrap();
        let old_entry = pkg.cache_file_path().unwrap();

        pkg.registry().publish("2.4.0");
        pkg.update().await.unwrap();

        assert_eq!(pkg.resolved_version(), Some("2.4.0"));
        assert!(pkg.cache_file_path().unwrap().ends_with("_tmpl-basic@2.4.0@tmpl-basic"));
        assert!(pkg.exists().await.unwrap());
        assert!(old_entry.exists());
        assert_eq!(pkg.registry().install_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_twice_installs_once() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "latest", MockRegistry::new("2.3.0"));
        pkg.install().await.unwrap();

        pkg.registry().publish("2.4.0");
        pkg.update().await.unwrap();
        pkg.update().await.unwrap();

        assert_eq!(pkg.resolved_version(), Some("2.4.0"));
        assert_eq!(pkg.registry().install_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_moves_pinned_version_forward() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "1.0.0", MockRegistry::new("2.3.0"));
        pkg.install().await.unwrap();

        pkg.update().await.unwrap();

        assert_eq!(pkg.resolved_version(), Some("2.3.0"));
    }

    #[tokio::test]
    async fn test_registry_failure_propagates() {
        let home = tempfile::tempdir().unwrap();
        let mut registry = MockRegistry::new("2.3.0");
        registry.offline = true;
        let mut pkg = shared(home.path(), "latest", registry);

        let err = pkg.exists().await.unwrap_err();
        assert!(matches!(err, StencilError::RegistryUnavailable(..)));
        assert_eq!(pkg.resolved_version(), None);

        let err = pkg.update().await.unwrap_err();
        assert!(matches!(err, StencilError::RegistryUnavailable(..)));
    }

    #[tokio::test]
    async fn test_install_failure_leaves_nothing_cached() {
        let home = tempfile::tempdir().unwrap();
        let mut registry = MockRegistry::new("2.3.0");
        registry.fail_install = true;
        let mut pkg = shared(home.path(), "latest", registry);

        let err = pkg.install().await.unwrap_err();

        assert!(matches!(err, StencilError::InstallFailed(..)));
        assert!(!pkg.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_direct_mode_checks_target_path_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("local-template");
        let mut pkg = Package::new(
            PackageOptions {
                target_path: target.clone(),
                store_dir: None,
                package_name: "tmpl-basic".to_string(),
                package_version: "latest".to_string(),
            },
            MockRegistry::new("2.3.0"),
        )
        .unwrap();

        assert!(!pkg.exists().await.unwrap());
        fs::create_dir_all(&target).unwrap();
        assert!(pkg.exists().await.unwrap());

        assert_eq!(pkg.registry().latest_calls(), 0);
        assert!(matches!(pkg.install().await, Err(StencilError::Config(_))));
    }

    #[tokio::test]
    async fn test_root_file_path() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "latest", MockRegistry::new("2.3.0"));
        assert_eq!(pkg.get_root_file_path(), None);

        pkg.install().await.unwrap();

        let entry = pkg.cache_file_path().unwrap();
        assert_eq!(
            pkg.get_root_file_path(),
            Some(PathBuf::from(format_path(&entry.join("lib/index.js"))))
        );
    }

    #[tokio::test]
    async fn test_root_file_path_ignores_manifest_above_missing_entry() {
        let home = tempfile::tempdir().unwrap();
        let mut pkg = shared(home.path(), "latest", MockRegistry::new("2.3.0"));
        fs::create_dir_all(pkg.target_path()).unwrap();
        fs::write(pkg.target_path().join("package.json"), r#"{"main":"other.js"}"#).unwrap();

        assert!(!pkg.exists().await.unwrap());
        assert_eq!(pkg.get_root_file_path(), None);
    }

    #[test]
    fn test_root_file_path_without_manifest_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = Package::new(
            PackageOptions {
                target_path: dir.path().to_path_buf(),
                store_dir: None,
                package_name: "tmpl-basic".to_string(),
                package_version: "1.0.0".to_string(),
            },
            MockRegistry::new("1.0.0"),
        )
        .unwrap();

        assert_eq!(pkg.get_root_file_path(), None);

        fs::write(dir.path().join("package.json"), r#"{"name":"tmpl-basic"}"#).unwrap();
        assert_eq!(pkg.get_root_file_path(), None);
    }

    #[test]
    fn test_relative_paths_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let options = |target_path: PathBuf, store_dir: Option<PathBuf>| PackageOptions {
            target_path,
            store_dir,
            package_name: "tmpl-basic".to_string(),
            package_version: "latest".to_string(),
        };

        let relative_target = Package::new(
            options(PathBuf::from("template"), None),
            MockRegistry::new("1.0.0"),
        );
        assert!(matches!(relative_target, Err(StencilError::Config(_))));

        let relative_store = Package::new(
            options(dir.path().to_path_buf(), Some(PathBuf::from("node_modules"))),
            MockRegistry::new("1.0.0"),
        );
        assert!(matches!(relative_store, Err(StencilError::Config(_))));

        let pkg = Package::new(
            options(dir.path().to_path_buf(), Some(dir.path().join("node_modules"))),
            MockRegistry::new("1.0.0"),
        )
        .unwrap();
        assert!(pkg.is_shared());
        assert_eq!(pkg.target_path(), dir.path());
    }

    #[test]
    fn test_empty_name_is_config_error() {
        let result = Package::new(
            PackageOptions {
                target_path: PathBuf::from("/tmp/stencil"),
                store_dir: None,
                package_name: "  ".to_string(),
                package_version: "latest".to_string(),
            },
            MockRegistry::new("1.0.0"),
        );

        assert!(matches!(result, Err(StencilError::Config(_))));
    }
}
