//! Reference resolution and normalization of OpenAPI v3 schemas embedded in
//! Kubernetes CustomResourceDefinitions

pub mod error;
pub mod loader;
pub mod normalize;
pub mod pointer;
pub mod prune;
pub mod resolver;

pub use error::{LoadError, PointerError, ResolutionError};
pub use loader::{DefaultLoader, DocumentLoader};
pub use normalize::{NormalizeOptions, SchemaNormalizer};
pub use prune::{
    is_pruned_extension, prune_extensions, prune_imported_descriptions, ALLOWED_EXTENSIONS,
    EXTENSION_PREFIX,
};
pub use resolver::{Resolver, DEFAULT_MAX_DEPTH};

/// Key marking a JSON reference node
pub const REF_KEY: &str = "$ref";
