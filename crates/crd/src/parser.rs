//! CRD document parsing and schema lookup

use crate::error::CrdError;
use crate::types::{ApiVersion, SchemaLocation, CRD_KIND};
use serde_yaml::Value;
use tracing::debug;

const OPENAPI_SCHEMA_KEY: &str = "openAPIV3Schema";

/// A parsed CustomResourceDefinition with a supported apiVersion
#[derive(Debug, Clone, PartialEq)]
pub struct CrdDocument {
    root: Value,
    api_version: ApiVersion,
}

impl CrdDocument {
    /// Parse a YAML (or JSON) encoded CRD
    pub fn from_yaml(content: &str) -> Result<Self, CrdError> {
        let mut root: Value = serde_yaml::from_str(content)?;
        root.apply_merge()?;
        Self::from_value(root)
    }

    /// Check `kind` and `apiVersion` of an already parsed document
    pub fn from_value(root: Value) -> Result<Self, CrdError> {
        if !root.is_mapping() {
            return Err(CrdError::Input("document is not a mapping".to_string()));
        }

        let kind = root
            .get("kind")
            .ok_or_else(|| CrdError::Input("missing kind".to_string()))?;
        if kind.as_str() != Some(CRD_KIND) {
            return Err(CrdError::WrongKind(display_scalar(kind)));
        }

        let api_version = root
            .get("apiVersion")
            .ok_or_else(|| CrdError::Input("missing apiVersion".to_string()))?;
        let api_version = api_version
            .as_str()
            .ok_or_else(|| CrdError::UnsupportedApiVersion(display_scalar(api_version)))?
            .parse::<ApiVersion>()
            .map_err(CrdError::UnsupportedApiVersion)?;

        debug!("Parsed {} {}", api_version, CRD_KIND);
        Ok(Self { root, api_version })
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// `metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.root.get("metadata")?.get("name")?.as_str()
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Mutable access to the whole document, for edits after resolution
    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Serialize back to YAML (block style)
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.root)
    }

    /// Every schema embedded in the document, in document order
    pub fn schema_locations(&self) -> Result<Vec<SchemaLocation>, CrdError> {
        let spec = self
            .root
            .get("spec")
            .ok_or_else(|| CrdError::Input("missing spec".to_string()))?;

        match self.api_version {
            ApiVersion::V1Beta1 => {
                let mut locations = Vec::new();
                if spec
                    .get("validation")
                    .and_then(|v| v.get(OPENAPI_SCHEMA_KEY))
                    .is_some()
                {
                    locations.push(SchemaLocation::Validation);
                }
                if let Some(versions) = spec.get("versions").and_then(Value::as_sequence) {
                    locations.extend(
                        versions
                            .iter()
                            .enumerate()
                            .filter(|(_, v)| version_schema(v).is_some())
                            .map(|(index, v)| version_location(index, v)),
                    );
                }
                if locations.is_empty() {
                    return Err(CrdError::Input(format!(
                        "missing spec.validation.{OPENAPI_SCHEMA_KEY}"
                    )));
                }
                Ok(locations)
            }
            ApiVersion::V1 => {
                let versions = spec
                    .get("versions")
                    .and_then(Value::as_sequence)
                    .ok_or_else(|| CrdError::Input("missing spec.versions".to_string()))?;

                versions
                    .iter()
                    .enumerate()
                    .map(|(index, v)| {
                        let location = version_location(index, v);
                        match version_schema(v) {
                            Some(_) => Ok(location),
                            None => Err(CrdError::Input(format!("missing {location}"))),
                        }
                    })
                    .collect()
            }
        }
    }

    /// The schema at `location`
    pub fn schema(&self, location: &SchemaLocation) -> Result<&Value, CrdError> {
        let spec = self.root.get("spec");
        let schema = match location {
            SchemaLocation::Validation => spec
                .and_then(|s| s.get("validation"))
                .and_then(|v| v.get(OPENAPI_SCHEMA_KEY)),
            SchemaLocation::Version { index, .. } => spec
                .and_then(|s| s.get("versions"))
                .and_then(|v| v.get(*index))
                .and_then(version_schema),
        };
        schema.ok_or_else(|| CrdError::Input(format!("missing {location}")))
    }

    /// Mutable access to the schema at `location`
    pub fn schema_mut(&mut self, location: &SchemaLocation) -> Result<&mut Value, CrdError> {
        let spec = self.root.get_mut("spec");
        let schema = match location {
            SchemaLocation::Validation => spec
                .and_then(|s| s.get_mut("validation"))
                .and_then(|v| v.get_mut(OPENAPI_SCHEMA_KEY)),
            SchemaLocation::Version { index, .. } => spec
                .and_then(|s| s.get_mut("versions"))
                .and_then(|v| v.get_mut(*index))
                .and_then(|v| v.get_mut("schema"))
                .and_then(|s| s.get_mut(OPENAPI_SCHEMA_KEY)),
        };
        schema.ok_or_else(|| CrdError::Input(format!("missing {location}")))
    }
}

fn version_schema(version: &Value) -> Option<&Value> {
    version.get("schema")?.get(OPENAPI_SCHEMA_KEY)
}

fn version_location(index: usize, version: &Value) -> SchemaLocation {
    SchemaLocation::Version {
        index,
        name: version
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
