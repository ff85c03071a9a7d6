//! CRD error types

use crate::types::SchemaLocation;
use crd_resolver_schema::ResolutionError;

#[derive(thiserror::Error, Debug)]
pub enum CrdError {
    #[error("invalid CRD document: {0}")]
    Input(String),

    #[error("input is not a CustomResourceDefinition (kind: {0})")]
    WrongKind(String),

    #[error("unsupported CRD apiVersion {0:?}")]
    UnsupportedApiVersion(String),

    #[error("failed to resolve {location}: {source}")]
    Resolution {
        location: SchemaLocation,
        #[source]
        source: ResolutionError,
    },
}

impl From<serde_yaml::Error> for CrdError {
    fn from(e: serde_yaml::Error) -> Self {
        CrdError::Input(e.to_string())
    }
}

impl CrdError {
    /// Whether the document was rejected for its kind or apiVersion
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            CrdError::WrongKind(_) | CrdError::UnsupportedApiVersion(_)
        )
    }
}
