use std::fs;
use std::path::{Path, PathBuf};

use crate::package_json::PackageJson;
use stencil_constants::MANIFEST_FILE;

/// Nearest directory, starting at `start` and walking up, that holds a manifest.
#[must_use]
pub fn find_package_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

pub fn read_package_json(project_dir: &Path) -> anyhow::Result<PackageJson> {
    let path = project_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(path)?;
    let parsed: PackageJson = serde_json::from_str(&content)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_package_dir_walks_up() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("package.json"), r#"{"name":"outer"}"#).unwrap();
        let nested = root.path().join("lib").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_package_dir(&nested).as_deref(), Some(root.path()));
    }

    #[test]
    fn test_find_package_dir_prefers_nearest() {
        let root = tempfile::tempdir().unwrap();
        let inner = root.path().join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(root.path().join("package.json"), "{}").unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        assert_eq!(find_package_dir(&inner), Some(inner));
    }

    #[test]
    fn test_read_keeps_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"tmpl-basic","main":"lib/index.js","files":["lib"],"private":true}"#,
        )
        .unwrap();

        let pkg = read_package_json(dir.path()).unwrap();
        assert_eq!(pkg.entry(), Some("lib/index.js"));
        assert_eq!(pkg.version, None);
        assert_eq!(pkg.other.get("private"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn test_blank_main_is_no_entry() {
        let pkg: PackageJson = serde_json::from_str(r#"{"main":"  "}"#).unwrap();
        assert_eq!(pkg.entry(), None);
    }
}
