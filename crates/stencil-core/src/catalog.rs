use serde::Deserialize;
use std::fs;
use std::path::Path;

use stencil_constants::{BUILTIN_TEMPLATES, TEMPLATE_CATALOG_FILE, TYPE_PROJECT};
use stencil_error::{Result, StencilError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Files are copied and rendered into the project.
    #[default]
    Normal,
    /// The package brings its own installer; only its entry file is reported.
    Custom,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub name: String,
    pub npm_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: TemplateKind,
    #[serde(default)]
    pub install_command: Option<String>,
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    stencil_constants::LATEST_TAG.to_string()
}

fn default_tags() -> Vec<String> {
    vec![TYPE_PROJECT.to_string()]
}

impl TemplateInfo {
    #[must_use]
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn builtin_catalog() -> Vec<TemplateInfo> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(name, npm_name, version, install, start)| TemplateInfo {
            name: (*name).to_string(),
            npm_name: (*npm_name).to_string(),
            version: (*version).to_string(),
            kind: TemplateKind::Normal,
            install_command: Some((*install).to_string()),
            start_command: Some((*start).to_string()),
            ignore: Vec::new(),
            tags: default_tags(),
        })
        .collect()
}

/// Templates from `<cli_home>/templates.json`, or the built-in list when
/// that file does not exist.
pub fn load_catalog(cli_home: &Path) -> Result<Vec<TemplateInfo>> {
    let path = cli_home.join(TEMPLATE_CATALOG_FILE);
    if !path.exists() {
        return Ok(builtin_catalog());
    }

    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| {
        StencilError::TemplateError(format!("invalid catalog {}: {e}", path.display()))
    })
}

/// Templates usable for `kind` (`project` or `component`).
#[must_use]
pub fn templates_for(catalog: &[TemplateInfo], kind: &str) -> Vec<TemplateInfo> {
    catalog.iter().filter(|t| t.is_tagged(kind)).cloned().collect()
}
