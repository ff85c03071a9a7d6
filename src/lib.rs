//! Kubernetes CRD schema resolver
//!
//! Resolves `$ref` references inside the OpenAPI v3 schemas embedded in a
//! CustomResourceDefinition, producing a self-contained CRD. Unsupported
//! `x-kubernetes-*` extensions are stripped, descriptions imported through
//! references can be stripped, and a JSON Patch can be applied to the result.

pub mod cli;
pub mod config;
pub mod patch;
pub mod utils;

pub use config::{Config, ResolverConfig};
pub use crd_resolver_crd::{ApiVersion, CrdDocument, CrdError, SchemaLocation};
pub use crd_resolver_schema::{NormalizeOptions, ResolutionError, SchemaNormalizer};
pub use patch::{JsonPatch, PatchError};

use tracing::info;
use url::Url;

/// Main application context driving one CRD through the pipeline
pub struct CrdResolver {
    config: Config,
}

impl CrdResolver {
    /// Create a resolver with the given configuration
    pub fn new(config: Config) -> CrdResolverResult<Self> {
        config
            .validate()
            .map_err(|e| CrdResolverError::Config(format!("{e:#}")))?;
        Ok(Self { config })
    }

    /// Read `source`, resolve it and write the result to `destination`.
    ///
    /// Either may be `-` for standard input/output. Nothing is written unless
    /// every step succeeded.
    pub fn run(&self, source: &str, destination: &str) -> CrdResolverResult<()> {
        info!("Reading CRD from {}", display_stdio(source));

        let content = utils::read_source(source).map_err(|e| io_error(source, e))?;
        let base = utils::base_url(source).map_err(|e| io_error(source, e))?;

        let output = self.resolve_str(&content, &base)?;

        info!("Writing resolved CRD to {}", display_stdio(destination));
        utils::write_destination(destination, &output).map_err(|e| io_error(destination, e))
    }

    /// Resolve a YAML encoded CRD, returning the resolved CRD as YAML.
    ///
    /// `base` is the location relative references are joined against.
    pub fn resolve_str(&self, content: &str, base: &Url) -> CrdResolverResult<String> {
        let patch = self.load_patch()?;

        let mut document = CrdDocument::from_yaml(content)?;
        info!(
            "Processing {} {}",
            document.api_version(),
            document.name().unwrap_or("<unnamed>")
        );

        self.resolve_document(&mut document, base)?;

        if let Some(patch) = patch {
            patch.apply(document.as_value_mut())?;
        }

        Ok(document.to_yaml_string()?)
    }

    /// Resolve every schema of an already parsed CRD in place
    pub fn resolve_document(
        &self,
        document: &mut CrdDocument,
        base: &Url,
    ) -> CrdResolverResult<Vec<SchemaLocation>> {
        let options = NormalizeOptions {
            remove_descriptions: self.config.remove_descriptions,
        };
        let mut normalizer = SchemaNormalizer::new(self.config.resolver.build(), options);

        let locations = crd_resolver_crd::resolve_schemas(document, &mut normalizer, base)?;
        info!("Resolved {} schema(s)", locations.len());
        Ok(locations)
    }

    fn load_patch(&self) -> CrdResolverResult<Option<JsonPatch>> {
        let Some(path) = &self.config.jsonpatch else {
            return Ok(None);
        };
        info!("Loading JSON patch from {}", path.display());
        Ok(Some(JsonPatch::from_file(path)?))
    }
}

fn display_stdio(path: &str) -> &str {
    if path == utils::STDIO {
        "<stdio>"
    } else {
        path
    }
}

fn io_error(path: &str, source: std::io::Error) -> CrdResolverError {
    CrdResolverError::Io {
        path: display_stdio(path).to_string(),
        source,
    }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum CrdResolverError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Unsupported input: {0}")]
    UnsupportedVersion(CrdError),

    #[error("Schema resolution failed: {0}")]
    Resolution(CrdError),

    #[error("JSON patch error: {0}")]
    Patch(#[from] PatchError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl From<CrdError> for CrdResolverError {
    fn from(e: CrdError) -> Self {
        match e {
            CrdError::Input(message) => CrdResolverError::Input(message),
            e @ (CrdError::WrongKind(_) | CrdError::UnsupportedApiVersion(_)) => {
                CrdResolverError::UnsupportedVersion(e)
            }
            e @ CrdError::Resolution { .. } => CrdResolverError::Resolution(e),
        }
    }
}

/// Result type for the main application
pub type CrdResolverResult<T> = Result<T, CrdResolverError>;
