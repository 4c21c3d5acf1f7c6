use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PackageJson {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub main: Option<String>,
    pub scripts: Option<IndexMap<String, String>>,
    // Everything else the manifest declares
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

impl PackageJson {
    /// The declared entry module, ignoring blank values.
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        self.main
            .as_deref()
            .map(str::trim)
            .filter(|main| !main.is_empty())
    }
}
