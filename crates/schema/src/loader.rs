//! Loading of documents targeted by external references

use crate::error::LoadError;
use serde_yaml::Value;
use tracing::debug;
use url::Url;

/// Source of external documents referenced by `$ref`
pub trait DocumentLoader {
    /// Load and parse the document at `location`
    fn load(&self, location: &Url) -> Result<Value, LoadError>;
}

impl<L: DocumentLoader + ?Sized> DocumentLoader for &L {
    fn load(&self, location: &Url) -> Result<Value, LoadError> {
        (**self).load(location)
    }
}

/// Loader for local files and, with the `http` feature, remote URLs
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    allow_remote: bool,
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self { allow_remote: true }
    }

    /// Enable or disable fetching `http`/`https` references
    pub fn allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    fn read_file(&self, location: &Url) -> Result<String, LoadError> {
        let path = location
            .to_file_path()
            .map_err(|_| LoadError::UnsupportedScheme(location.to_string()))?;
        std::fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
    }
}

impl DocumentLoader for DefaultLoader {
    fn load(&self, location: &Url) -> Result<Value, LoadError> {
        debug!("Loading referenced document {}", location);

        let content = match location.scheme() {
            "file" => self.read_file(location)?,
            "http" | "https" if !self.allow_remote => return Err(LoadError::RemoteDisabled),
            "http" | "https" => fetch_remote(location)?,
            other => return Err(LoadError::UnsupportedScheme(other.to_string())),
        };

        // JSON documents parse as YAML too
        let mut document: Value = serde_yaml::from_str(&content)?;
        document.apply_merge()?;
        Ok(document)
    }
}

#[cfg(feature = "http")]
fn fetch_remote(location: &Url) -> Result<String, LoadError> {
    let response = reqwest::blocking::get(location.clone())
        .and_then(|r| r.error_for_status())
        .map_err(|e| LoadError::Http(e.to_string()))?;
    response.text().map_err(|e| LoadError::Http(e.to_string()))
}

#[cfg(not(feature = "http"))]
fn fetch_remote(_location: &Url) -> Result<String, LoadError> {
    Err(LoadError::RemoteUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_and_json_files() {
        let temp_dir = TempDir::new().unwrap();
        let yaml_path = temp_dir.path().join("common.yaml");
        let json_path = temp_dir.path().join("common.json");
        std::fs::write(&yaml_path, "definitions:\n  Name:\n    type: string\n").unwrap();
        std::fs::write(&json_path, r#"{"definitions": {"Count": {"type": "integer"}}}"#).unwrap();

        let loader = DefaultLoader::new();

        let yaml = loader.load(&Url::from_file_path(&yaml_path).unwrap()).unwrap();
        assert!(yaml["definitions"]["Name"].is_mapping());

        let json = loader.load(&Url::from_file_path(&json_path).unwrap()).unwrap();
        assert_eq!(json["definitions"]["Count"]["type"].as_str(), Some("integer"));
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("common.yaml");
        std::fs::write(
            &path,
            "base: &base\n  type: object\ndefinitions:\n  Spec:\n    <<: *base\n    description: spec\n",
        )
        .unwrap();

        let document = DefaultLoader::new()
            .load(&Url::from_file_path(&path).unwrap())
            .unwrap();

        let spec = &document["definitions"]["Spec"];
        assert_eq!(spec["type"].as_str(), Some("object"));
        assert_eq!(spec["description"].as_str(), Some("spec"));
        assert!(spec.get("<<").is_none());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let location = Url::from_file_path(temp_dir.path().join("missing.yaml")).unwrap();

        let err = DefaultLoader::new().load(&location).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_rejected_schemes() {
        let loader = DefaultLoader::new().allow_remote(false);

        let remote = Url::parse("https://example.com/schema.json").unwrap();
        assert!(matches!(loader.load(&remote), Err(LoadError::RemoteDisabled)));

        let ftp = Url::parse("ftp://example.com/schema.json").unwrap();
        assert!(matches!(loader.load(&ftp), Err(LoadError::UnsupportedScheme(_))));
    }
}
