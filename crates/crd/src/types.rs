//! CRD types and data structures

use std::fmt;
use std::str::FromStr;

/// Kind every input document must declare
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Supported `apiextensions.k8s.io` versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// `apiextensions.k8s.io/v1beta1`: one schema under `spec.validation`
    V1Beta1,

    /// `apiextensions.k8s.io/v1`: one schema per entry of `spec.versions`
    V1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1Beta1 => "apiextensions.k8s.io/v1beta1",
            ApiVersion::V1 => "apiextensions.k8s.io/v1",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apiextensions.k8s.io/v1beta1" => Ok(ApiVersion::V1Beta1),
            "apiextensions.k8s.io/v1" => Ok(ApiVersion::V1),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an `openAPIV3Schema` inside a CRD
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// `spec.validation.openAPIV3Schema`
    Validation,

    /// `spec.versions[index].schema.openAPIV3Schema`
    Version { index: usize, name: Option<String> },
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLocation::Validation => f.write_str("spec.validation.openAPIV3Schema"),
            SchemaLocation::Version { index, name } => {
                write!(f, "spec.versions[{index}].schema.openAPIV3Schema")?;
                if let Some(name) = name {
                    write!(f, " ({name})")?;
                }
                Ok(())
            }
        }
    }
}
