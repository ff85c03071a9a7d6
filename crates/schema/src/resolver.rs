//! `$ref` resolution
//!
//! The resolver produces a fresh copy of a schema where every reference node is
//! replaced by the content it points to. References are resolved against the
//! document that contains them: `#/...` pointers inside the schema address the
//! schema itself, relative locations are joined against the base URL, and
//! pointers inside an external document address that document.
//!
//! A reference that is re-entered while it is still being expanded is a cycle
//! and fails the resolution; inlining a recursive schema would never terminate.

use crate::error::ResolutionError;
use crate::loader::{DefaultLoader, DocumentLoader};
use crate::pointer::{format_pointer, lookup, parse_pointer};
use crate::REF_KEY;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Default limit on the length of a chain of nested references
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Pointer prefix of the container document schemas were historically wrapped in
const LEGACY_CONTAINER: [&str; 3] = ["components", "schemas", "crd_schema"];

/// Resolves `$ref` nodes, caching external documents between calls
pub struct Resolver<L = DefaultLoader> {
    loader: L,
    max_depth: usize,
    documents: HashMap<Url, Value>,
}

impl Default for Resolver<DefaultLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver<DefaultLoader> {
    pub fn new() -> Self {
        Self::with_loader(DefaultLoader::new())
    }
}

impl<L: DocumentLoader> Resolver<L> {
    /// Create a resolver fetching external documents through `loader`
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            max_depth: DEFAULT_MAX_DEPTH,
            documents: HashMap::new(),
        }
    }

    /// Limit the length of reference chains
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Return a copy of `schema` with every reference inlined.
    ///
    /// `base` is the location relative references are joined against.
    pub fn resolve(&mut self, schema: &Value, base: &Url) -> Result<Value, ResolutionError> {
        let mut pass = Pass {
            resolver: self,
            root: schema,
            base,
            chain: Vec::new(),
            resolved: HashMap::new(),
            height: 0,
        };
        pass.resolve_value(&Origin::Root, schema)
    }

    fn document(&mut self, reference: &str, location: &Url) -> Result<&Value, ResolutionError> {
        if !self.documents.contains_key(location) {
            let document =
                self.loader
                    .load(location)
                    .map_err(|source| ResolutionError::Load {
                        reference: reference.to_string(),
                        document: location.to_string(),
                        source,
                    })?;
            self.documents.insert(location.clone(), document);
        }
        Ok(&self.documents[location])
    }
}

/// Document a node was read from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Root,
    External(Url),
}

/// A reference target, located but not yet expanded
struct Target {
    key: String,
    origin: Origin,
    value: Value,
}

/// State of a single `resolve` call
struct Pass<'a, L> {
    resolver: &'a mut Resolver<L>,
    root: &'a Value,
    base: &'a Url,
    /// References currently being expanded, outermost first
    chain: Vec<String>,
    /// Fully expanded targets by key, with the length of the longest
    /// reference chain their expansion needed
    resolved: HashMap<String, (Value, usize)>,
    /// Longest reference chain below the reference being expanded
    height: usize,
}

impl<L: DocumentLoader> Pass<'_, L> {
    fn resolve_value(&mut self, origin: &Origin, value: &Value) -> Result<Value, ResolutionError> {
        match value {
            Value::Mapping(map) => match map.get(REF_KEY) {
                Some(reference) => self.resolve_reference(origin, map, reference),
                None => {
                    let mut out = Mapping::with_capacity(map.len());
                    for (key, child) in map {
                        out.insert(key.clone(), self.resolve_value(origin, child)?);
                    }
                    Ok(Value::Mapping(out))
                }
            },
            Value::Sequence(seq) => seq
                .iter()
                .map(|child| self.resolve_value(origin, child))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            other => Ok(other.clone()),
        }
    }

    fn resolve_reference(
        &mut self,
        origin: &Origin,
        node: &Mapping,
        reference: &Value,
    ) -> Result<Value, ResolutionError> {
        let reference = reference.as_str().ok_or_else(|| {
            ResolutionError::malformed(&format!("{reference:?}"), "$ref must be a string")
        })?;

        if node.len() > 1 {
            warn!("Ignoring keys next to $ref {:?}", reference);
        }

        let target = self.locate(origin, reference)?;

        if let Some((done, height)) = self.resolved.get(&target.key) {
            if self.chain.len() + height > self.resolver.max_depth {
                return Err(self.depth_exceeded(reference));
            }
            self.height = self.height.max(*height);
            return Ok(done.clone());
        }

        if self.chain.contains(&target.key) {
            let mut chain = self.chain.clone();
            chain.push(target.key);
            return Err(ResolutionError::Circular { chain });
        }

        if self.chain.len() >= self.resolver.max_depth {
            return Err(self.depth_exceeded(reference));
        }

        debug!("Resolving {} as {}", reference, target.key);

        let outer = std::mem::replace(&mut self.height, 0);
        self.chain.push(target.key.clone());
        let expanded = self.resolve_value(&target.origin, &target.value);
        self.chain.pop();
        let height = self.height + 1;
        self.height = outer.max(height);

        let expanded = expanded?;
        self.resolved.insert(target.key, (expanded.clone(), height));
        Ok(expanded)
    }

    fn depth_exceeded(&self, reference: &str) -> ResolutionError {
        ResolutionError::DepthExceeded {
            reference: reference.to_string(),
            limit: self.resolver.max_depth,
        }
    }

    fn locate(&mut self, origin: &Origin, reference: &str) -> Result<Target, ResolutionError> {
        let (location, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let tokens =
            parse_pointer(fragment).map_err(|e| ResolutionError::malformed(reference, e))?;

        let origin = if location.is_empty() {
            origin.clone()
        } else {
            let base = match origin {
                Origin::Root => self.base,
                Origin::External(url) => url,
            };
            let url = base
                .join(location)
                .map_err(|e| ResolutionError::malformed(reference, e))?;
            Origin::External(url)
        };

        let not_found = |document: String| ResolutionError::NotFound {
            reference: reference.to_string(),
            document,
        };

        match origin {
            Origin::Root => {
                let value = lookup(self.root, &tokens)
                    .or_else(|| {
                        strip_legacy_container(&tokens).and_then(|rest| lookup(self.root, rest))
                    })
                    .ok_or_else(|| not_found("the schema".to_string()))?;
                Ok(Target {
                    key: format!("#{}", format_pointer(&tokens)),
                    origin: Origin::Root,
                    value: value.clone(),
                })
            }
            Origin::External(url) => {
                let document = self.resolver.document(reference, &url)?;
                let value = lookup(document, &tokens)
                    .ok_or_else(|| not_found(url.to_string()))?
                    .clone();
                Ok(Target {
                    key: format!("{}#{}", url, format_pointer(&tokens)),
                    origin: Origin::External(url),
                    value,
                })
            }
        }
    }
}

fn strip_legacy_container(tokens: &[String]) -> Option<&[String]> {
    let matches = tokens.len() >= LEGACY_CONTAINER.len()
        && tokens.iter().zip(LEGACY_CONTAINER).all(|(t, c)| t == c);
    matches.then(|| &tokens[LEGACY_CONTAINER.len()..])
}
