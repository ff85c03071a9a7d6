//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ResolverConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Strip descriptions imported through references
    pub remove_descriptions: bool,

    /// JSON Patch applied to the resolved CRD
    pub jsonpatch: Option<PathBuf>,

    /// Reference resolution settings
    pub resolver: ResolverConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse configuration {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.jsonpatch {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("jsonpatch path cannot be empty"));
            }
        }

        self.resolver.validate()
    }
}
