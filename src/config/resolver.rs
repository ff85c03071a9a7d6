//! Reference resolution settings

use anyhow::{anyhow, Result};
use crd_resolver_schema::{DefaultLoader, Resolver, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Reference resolution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Maximum length of a chain of nested references
    pub max_depth: usize,

    /// Whether `http`/`https` references may be fetched
    pub allow_remote: bool,
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow!("resolver.maxDepth must be greater than zero"));
        }
        Ok(())
    }

    /// Build a resolver with these settings
    pub fn build(&self) -> Resolver {
        let loader = DefaultLoader::new().allow_remote(self.allow_remote);
        Resolver::with_loader(loader).max_depth(self.max_depth)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_remote: true,
        }
    }
}
