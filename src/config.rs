use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CODE_TAGS: &[&str] = &["js", "jsx", "javascript", "typescript", "tsx", "ts", "react"];
pub const STYLE_TAGS: &[&str] = &["css", "scss", "sass", "less"];

/// Libraries the generated project does not install.
pub const DENIED_IMPORTS: &[&str] = &[
    "@headlessui/react",
    "@heroicons/react",
    "react-bootstrap",
    "react-icons",
    "react-bootstrap-icons",
    "@fortawesome",
    "font-awesome",
    "react-fontawesome",
    "antd",
    "material-ui",
    "@mui/material",
    "semantic-ui-react",
    "chakra-ui",
];

/// Tag sets, import denylist and baseline switch used by the sanitizer.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    pub code_tags: Vec<String>,
    pub style_tags: Vec<String>,
    pub denied_imports: Vec<String>,
    pub inject_baseline: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            code_tags: to_owned(CODE_TAGS),
            style_tags: to_owned(STYLE_TAGS),
            denied_imports: to_owned(DENIED_IMPORTS),
            inject_baseline: true,
        }
    }
}

impl SanitizerConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SanitizerConfig = toml::from_str(content).context("Failed to parse sanitizer config")?;
        config.validated()
    }

    /// Normalize tags (trimmed, lower-case), drop empty entries, and reject
    /// a tag listed as both code and style.
    pub fn validated(mut self) -> Result<Self> {
        self.code_tags = normalize_tags(&self.code_tags);
        self.style_tags = normalize_tags(&self.style_tags);
        self.denied_imports = self
            .denied_imports
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        if let Some(tag) = self.code_tags.iter().find(|t| self.style_tags.contains(t)) {
            bail!("Tag '{}' is listed as both a code tag and a style tag", tag);
        }
        Ok(self)
    }
}

/// Load config from a TOML file.
pub fn load_from_path(path: &Path) -> Result<SanitizerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = SanitizerConfig::from_toml(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    info!("Loaded sanitizer config from {}", path.display());
    Ok(config)
}

fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── Tests ──
