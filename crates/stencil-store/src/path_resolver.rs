use std::path::{Path, PathBuf};

pub struct PathResolver;

impl PathResolver {
    /// Cache directory for `name@version` under `store_dir`.
    ///
    /// The layout is `_<safe name>@<version>@<name>`: the leading part is a
    /// single path segment, the trailing `name` is kept verbatim so scoped
    /// packages stay recognizable (`_@scope_pkg@1.0.0@@scope/pkg`).
    #[must_use]
    pub fn cache_path_for(store_dir: &Path, package_name: &str, version: &str) -> PathBuf {
        store_dir.join(Self::cache_dir_name(package_name, version))
    }

    #[must_use]
    pub fn cache_dir_name(package_name: &str, version: &str) -> String {
        let safe_package_name = Self::sanitize_package_name(package_name);
        format!("_{safe_package_name}@{version}@{package_name}")
    }

    #[must_use]
    pub fn sanitize_package_name(package_name: &str) -> String {
        package_name.replace('/', "_")
    }

    /// Splits a top-level cache directory name back into `(name, version)`.
    ///
    /// For scoped packages the returned name is only the scope (`@scope`),
    /// since the package part lives one directory deeper.
    #[must_use]
    pub fn parse_cache_dir_name(dir_name: &str) -> Option<(String, String)> {
        let rest = dir_name.strip_prefix('_')?;

        // A scoped safe name starts with '@', skip it when looking for the separator.
        let search_from = usize::from(rest.starts_with('@'));
        let name_end = rest.get(search_from..)?.find('@')? + search_from;
        let after_name = rest.get(name_end + 1..)?;

        let (version, name) = after_name.split_once('@')?;
        if version.is_empty() || name.is_empty() {
            return None;
        }

        Some((name.to_string(), version.to_string()))
    }
}

#[must_use]
pub fn cache_path_for(store_dir: &Path, package_name: &str, version: &str) -> PathBuf {
    PathResolver::cache_path_for(store_dir, package_name, version)
}
