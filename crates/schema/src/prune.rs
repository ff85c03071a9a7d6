//! In-place pruning passes over resolved schemas

use serde_yaml::Value;

/// Prefix of Kubernetes vendor extensions
pub const EXTENSION_PREFIX: &str = "x-kubernetes-";

/// Extensions understood by the API server, kept by [`prune_extensions`]
pub const ALLOWED_EXTENSIONS: [&str; 7] = [
    "x-kubernetes-embedded-resource",
    "x-kubernetes-int-or-string",
    "x-kubernetes-preserve-unknown-fields",
    "x-kubernetes-list-map-keys",
    "x-kubernetes-list-type",
    "x-kubernetes-map-type",
    "x-kubernetes-validator",
];

const DESCRIPTION_KEY: &str = "description";

/// Whether `key` is a vendor extension that [`prune_extensions`] removes
pub fn is_pruned_extension(key: &str) -> bool {
    key.starts_with(EXTENSION_PREFIX) && !ALLOWED_EXTENSIONS.contains(&key)
}

/// Remove every `x-kubernetes-*` key not in [`ALLOWED_EXTENSIONS`], at any depth
pub fn prune_extensions(node: &mut Value) {
    match node {
        Value::Mapping(map) => {
            let pruned: Vec<Value> = map
                .keys()
                .filter(|k| k.as_str().is_some_and(is_pruned_extension))
                .cloned()
                .collect();
            for key in &pruned {
                map.shift_remove(key);
            }
            for child in map.values_mut() {
                prune_extensions(child);
            }
        }
        Value::Sequence(seq) => seq.iter_mut().for_each(prune_extensions),
        _ => {}
    }
}

/// Remove `description` keys that have no counterpart in `source`.
///
/// `source` is the schema as written before reference resolution, walked in
/// step with `resolved`. Subtrees missing from it were imported through a
/// reference, so every description below them goes. Only mapping values are
/// descended into; sequences are left as they are.
pub fn prune_imported_descriptions(resolved: &mut Value, source: Option<&Value>) {
    let Value::Mapping(map) = resolved else {
        return;
    };
    let source = source.and_then(Value::as_mapping);

    let keys: Vec<Value> = map.keys().cloned().collect();
    for key in keys {
        let counterpart = source.and_then(|s| s.get(&key));
        if counterpart.is_none() && key.as_str() == Some(DESCRIPTION_KEY) {
            map.shift_remove(&key);
        } else if let Some(child) = map.get_mut(&key) {
            prune_imported_descriptions(child, counterpart);
        }
    }
}
