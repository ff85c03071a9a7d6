//! Resolution of every schema embedded in a CRD

use crate::error::CrdError;
use crate::parser::CrdDocument;
use crate::types::SchemaLocation;
use crd_resolver_schema::{DocumentLoader, SchemaNormalizer};
use tracing::info;
use url::Url;

/// Normalize all schemas of `document` in place.
///
/// Every schema is resolved before any is written back, so on error the
/// document is left as it was. Returns the locations that were rewritten.
pub fn resolve_schemas<L: DocumentLoader>(
    document: &mut CrdDocument,
    normalizer: &mut SchemaNormalizer<L>,
    base: &Url,
) -> Result<Vec<SchemaLocation>, CrdError> {
    let locations = document.schema_locations()?;

    let mut resolved = Vec::with_capacity(locations.len());
    for location in &locations {
        info!("Resolving {}", location);
        let schema = document.schema(location)?;
        let normalized =
            normalizer
                .normalize(schema, base)
                .map_err(|source| CrdError::Resolution {
                    location: location.clone(),
                    source,
                })?;
        resolved.push(normalized);
    }

    for (location, schema) in locations.iter().zip(resolved) {
        *document.schema_mut(location)? = schema;
    }

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crd_resolver_schema::{NormalizeOptions, ResolutionError, Resolver};
    use serde_yaml::Value;

    fn normalizer(remove_descriptions: bool) -> SchemaNormalizer {
        SchemaNormalizer::new(
            Resolver::new(),
            NormalizeOptions {
                remove_descriptions,
            },
        )
    }

    fn base() -> Url {
        Url::parse("file:///crds/widgets.yaml").unwrap()
    }

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_v1beta1_internal_reference() {
        let mut crd = CrdDocument::from_yaml(
            r##"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  validation:
    openAPIV3Schema:
      type: object
      properties:
        spec:
          $ref: "#/definitions/WidgetSpec"
      definitions:
        WidgetSpec:
          type: object
          properties:
            size:
              type: integer
"##,
        )
        .unwrap();
        let before = crd.clone();

        let locations = resolve_schemas(&mut crd, &mut normalizer(false), &base()).unwrap();

        assert_eq!(locations, vec![SchemaLocation::Validation]);
        let schema = &crd.as_value()["spec"]["validation"]["openAPIV3Schema"];
        assert_eq!(
            schema["properties"]["spec"],
            yaml("{type: object, properties: {size: {type: integer}}}")
        );
        let original = &before.as_value()["spec"]["validation"]["openAPIV3Schema"];
        assert_eq!(schema["definitions"], original["definitions"]);
        assert_eq!(crd.as_value()["metadata"], before.as_value()["metadata"]);
    }

    #[test]
    fn test_reference_into_merged_content() {
        let mut crd = CrdDocument::from_yaml(
            r##"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
spec:
  validation:
    openAPIV3Schema:
      properties:
        kind:
          $ref: "#/definitions/Spec/properties/kind"
      definitions:
        Base: &base
          type: object
          properties:
            kind: {type: string}
        Spec:
          <<: *base
          description: merged
"##,
        )
        .unwrap();

        resolve_schemas(&mut crd, &mut normalizer(false), &base()).unwrap();

        let schema = &crd.as_value()["spec"]["validation"]["openAPIV3Schema"];
        assert_eq!(schema["properties"]["kind"], yaml("{type: string}"));
    }

    #[test]
    fn test_v1_versions_are_resolved_independently() {
        let mut crd = CrdDocument::from_yaml(
            r##"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          properties:
            size: {$ref: "#/definitions/Size"}
          definitions:
            Size: {type: integer}
    - name: v2
      schema:
        openAPIV3Schema:
          properties:
            size: {$ref: "#/definitions/Size"}
          definitions:
            Size: {type: string}
"##,
        )
        .unwrap();

        resolve_schemas(&mut crd, &mut normalizer(false), &base()).unwrap();

        let versions = &crd.as_value()["spec"]["versions"];
        assert_eq!(
            versions[0]["schema"]["openAPIV3Schema"]["properties"]["size"],
            yaml("{type: integer}")
        );
        assert_eq!(
            versions[1]["schema"]["openAPIV3Schema"]["properties"]["size"],
            yaml("{type: string}")
        );
    }

    #[test]
    fn test_failure_in_one_version_leaves_document_untouched() {
        let mut crd = CrdDocument::from_yaml(
            r##"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          properties:
            size: {$ref: "#/definitions/Size"}
          definitions:
            Size: {type: integer}
    - name: v2
      schema:
        openAPIV3Schema:
          properties:
            size: {$ref: "#/definitions/Missing"}
"##,
        )
        .unwrap();
        let before = crd.clone();

        let err = resolve_schemas(&mut crd, &mut normalizer(false), &base()).unwrap_err();

        match err {
            CrdError::Resolution { location, source } => {
                assert_eq!(
                    location,
                    SchemaLocation::Version {
                        index: 1,
                        name: Some("v2".to_string())
                    }
                );
                assert!(matches!(source, ResolutionError::NotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(crd, before);
    }

    #[test]
    fn test_extensions_and_descriptions_are_pruned() {
        let mut crd = CrdDocument::from_yaml(
            r##"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          description: Widget
          properties:
            meta:
              $ref: "#/definitions/Meta"
          definitions:
            Meta:
              description: Shared metadata
              type: object
              x-kubernetes-group-version-kind: []
              x-kubernetes-map-type: atomic
"##,
        )
        .unwrap();

        resolve_schemas(&mut crd, &mut normalizer(true), &base()).unwrap();

        let schema = &crd.as_value()["spec"]["versions"][0]["schema"]["openAPIV3Schema"];
        assert_eq!(schema["description"].as_str(), Some("Widget"));
        assert_eq!(
            schema["properties"]["meta"],
            yaml("{type: object, x-kubernetes-map-type: atomic}")
        );
    }
}
