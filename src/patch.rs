//! JSON Patch (RFC 6902) support for resolved CRDs

use std::path::Path;

use crd_resolver_schema::pointer::format_pointer;
use serde_yaml::Value;
use tracing::info;

/// Errors raised while loading or applying a patch
#[derive(thiserror::Error, Debug)]
pub enum PatchError {
    #[error("failed to read JSON patch {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON patch: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("document cannot be represented as JSON: {0}")]
    Conversion(String),

    #[error("failed to apply JSON patch: {0}")]
    Apply(#[from] json_patch::PatchError),
}

/// A parsed JSON Patch document
#[derive(Debug, Clone)]
pub struct JsonPatch {
    patch: json_patch::Patch,
}

impl JsonPatch {
    /// Load a patch from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, PatchError> {
        let content = std::fs::read_to_string(path).map_err(|source| PatchError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a patch from a JSON string
    pub fn from_json(content: &str) -> Result<Self, PatchError> {
        let patch = serde_json::from_str(content)?;
        Ok(Self { patch })
    }

    /// Number of operations in the patch
    pub fn len(&self) -> usize {
        self.patch.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patch.0.is_empty()
    }

    /// Apply the patch to `document`.
    ///
    /// Operations are applied atomically: if any of them fails the document is
    /// left unchanged.
    pub fn apply(&self, document: &mut Value) -> Result<(), PatchError> {
        info!("Applying JSON patch with {} operation(s)", self.len());

        ensure_json_compatible(document, &mut Vec::new())?;
        let mut json =
            serde_json::to_value(&*document).map_err(|e| PatchError::Conversion(e.to_string()))?;
        json_patch::patch(&mut json, &self.patch.0)?;
        *document =
            serde_yaml::to_value(&json).map_err(|e| PatchError::Conversion(e.to_string()))?;
        Ok(())
    }
}

/// Reject content the JSON round trip would silently alter
fn ensure_json_compatible(value: &Value, path: &mut Vec<String>) -> Result<(), PatchError> {
    match value {
        Value::Number(n) if n.is_nan() || n.is_infinite() => {
            Err(unsupported("non-finite number", path))
        }
        Value::Tagged(tagged) => Err(unsupported(&format!("tagged value {}", tagged.tag), path)),
        Value::Sequence(seq) => {
            for (index, item) in seq.iter().enumerate() {
                path.push(index.to_string());
                ensure_json_compatible(item, path)?;
                path.pop();
            }
            Ok(())
        }
        Value::Mapping(map) => {
            for (key, item) in map {
                let Value::String(key) = key else {
                    return Err(unsupported("non-string key", path));
                };
                path.push(key.clone());
                ensure_json_compatible(item, path)?;
                path.pop();
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn unsupported(what: &str, path: &[String]) -> PatchError {
    PatchError::Conversion(format!("{what} at {:?}", format_pointer(path)))
}
