//! Error types for schema resolution

use std::path::PathBuf;

/// Errors raised while evaluating a JSON Pointer
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer {0:?} must be empty or start with '/'")]
    MissingLeadingSlash(String),

    #[error("pointer {pointer:?} contains an invalid escape sequence in {token:?}")]
    InvalidEscape { pointer: String, token: String },
}

/// Errors raised while loading an external document
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("remote references are disabled")]
    RemoteDisabled,

    #[error("remote references require building with the `http` feature")]
    RemoteUnavailable,

    #[error("HTTP request failed: {0}")]
    Http(String),
}

/// Errors raised by the reference resolver
#[derive(thiserror::Error, Debug)]
pub enum ResolutionError {
    #[error("malformed reference {reference:?}: {reason}")]
    Malformed { reference: String, reason: String },

    #[error("reference {reference:?} does not exist in {document}")]
    NotFound { reference: String, document: String },

    #[error("failed to load {document} for reference {reference:?}: {source}")]
    Load {
        reference: String,
        document: String,
        #[source]
        source: LoadError,
    },

    #[error("circular reference: {}", chain.join(" -> "))]
    Circular { chain: Vec<String> },

    #[error("reference chain exceeded the depth limit of {limit} at {reference:?}")]
    DepthExceeded { reference: String, limit: usize },
}

impl ResolutionError {
    pub(crate) fn malformed(reference: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            reference: reference.to_string(),
            reason: reason.to_string(),
        }
    }
}
