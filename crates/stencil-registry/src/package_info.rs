use semver::Version;
use serde_json::Value;
use std::collections::HashMap;

use stencil_constants::LATEST_TAG;

#[derive(Clone, Debug)]
pub struct PackageInfo {
    pub versions: Value,
    pub dist_tags: HashMap<String, String>,
}

impl PackageInfo {
    pub fn from_json(json: &Value) -> Result<Self, serde_json::Error> {
        let dist_tags: HashMap<String, String> = serde_json::from_value(
            json.get("dist-tags")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        )?;

        Ok(Self {
            versions: json
                .get("versions")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            dist_tags,
        })
    }

    /// The `latest` dist-tag, or the highest stable published version when
    /// the tag is missing or not a valid version.
    #[must_use]
    pub fn latest_version(&self) -> Option<String> {
        if let Some(tagged) = self.dist_tags.get(LATEST_TAG) {
            if Version::parse(tagged).is_ok() {
                return Some(tagged.clone());
            }
        }

        self.versions
            .as_object()?
            .keys()
            .filter_map(|v_str| Version::parse(v_str).ok().map(|v| (v, v_str)))
            .filter(|(v, _)| v.pre.is_empty())
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, v_str)| v_str.clone())
    }

    #[must_use]
    pub fn tarball_url(&self, version: &str) -> Option<&str> {
        self.versions
            .get(version)?
            .get("dist")?
            .get("tarball")?
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latest_from_dist_tag() {
        let info = PackageInfo::from_json(&json!({
            "dist-tags": { "latest": "2.3.0", "next": "3.0.0-beta.1" },
            "versions": { "2.3.0": {}, "2.4.0": {}, "3.0.0-beta.1": {} }
        }))
        .unwrap();

        assert_eq!(info.latest_version().as_deref(), Some("2.3.0"));
    }

    #[test]
    fn test_latest_falls_back_to_highest_stable() {
        let info = PackageInfo::from_json(&json!({
            "versions": { "1.9.0": {}, "1.10.0": {}, "2.0.0-rc.1": {}, "garbage": {} }
        }))
        .unwrap();

        assert_eq!(info.latest_version().as_deref(), Some("1.10.0"));
    }

    #[test]
    fn test_no_versions_means_no_latest() {
        let info = PackageInfo::from_json(&json!({ "name": "ghost" })).unwrap();
        assert_eq!(info.latest_version(), None);
    }

    #[test]
    fn test_tarball_url() {
        let info = PackageInfo::from_json(&json!({
            "versions": {
                "1.0.0": { "dist": { "tarball": "https://registry.npmjs.org/tmpl/-/tmpl-1.0.0.tgz" } }
            }
        }))
        .unwrap();

        assert_eq!(
            info.tarball_url("1.0.0"),
            Some("https://registry.npmjs.org/tmpl/-/tmpl-1.0.0.tgz")
        );
        assert_eq!(info.tarball_url("2.0.0"), None);
    }
}
