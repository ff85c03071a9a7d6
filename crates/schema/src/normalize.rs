//! Per-schema pipeline: resolve, then prune

use crate::error::ResolutionError;
use crate::loader::{DefaultLoader, DocumentLoader};
use crate::prune::{prune_extensions, prune_imported_descriptions};
use crate::resolver::Resolver;
use serde_yaml::Value;
use tracing::debug;
use url::Url;

/// Switches for the optional pruning passes
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Strip descriptions pulled in through references
    pub remove_descriptions: bool,
}

/// Turns a schema with references into a self-contained one
pub struct SchemaNormalizer<L = DefaultLoader> {
    resolver: Resolver<L>,
    options: NormalizeOptions,
}

impl<L: DocumentLoader> SchemaNormalizer<L> {
    pub fn new(resolver: Resolver<L>, options: NormalizeOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolve every reference in `schema` and apply the pruning passes
    pub fn normalize(&mut self, schema: &Value, base: &Url) -> Result<Value, ResolutionError> {
        let mut resolved = self.resolver.resolve(schema, base)?;

        prune_extensions(&mut resolved);

        if self.options.remove_descriptions {
            debug!("Removing imported descriptions");
            prune_imported_descriptions(&mut resolved, Some(schema));
        }

        Ok(resolved)
    }
}
