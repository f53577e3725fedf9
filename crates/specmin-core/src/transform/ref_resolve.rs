use std::collections::HashSet;

use indexmap::IndexMap;

use super::merge::CanonicalSpec;
use crate::error::{Diagnostic, ResolveError};
use crate::tree::Node;

const REF_KEY: &str = "$ref";

/// Inlines `$ref` pointers from the canonical spec into operation trees.
///
/// A `{"$ref": "#/components/schemas/Pet"}` entry is replaced by the
/// resolved target under the key `Pet`. Pointers that lead nowhere resolve
/// to an empty mapping and are recorded as diagnostics; a pointer met again
/// while it is still being resolved is a [`ResolveError::CircularRef`].
pub struct RefResolver<'a> {
    root: &'a IndexMap<String, Node>,
    in_progress: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RefResolver<'a> {
    pub fn new(spec: &'a CanonicalSpec) -> Self {
        Self {
            root: spec.root(),
            in_progress: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Return a copy of `node` with every pointer inlined.
    pub fn resolve(&mut self, node: &Node) -> Result<Node, ResolveError> {
        match node {
            Node::Mapping(map) => {
                let mut resolved = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    match value.as_str() {
                        Some(pointer) if key == REF_KEY => {
                            let (name, target) = self.follow(pointer)?;
                            resolved.insert(name, target);
                        }
                        _ => {
                            resolved.insert(key.clone(), self.resolve(value)?);
                        }
                    }
                }
                Ok(Node::Mapping(resolved))
            }
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Sequence),
            Node::Scalar(_) => Ok(node.clone()),
        }
    }

    /// Problems seen so far, each reported once.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn follow(&mut self, pointer: &str) -> Result<(String, Node), ResolveError> {
        let Some(fragment) = pointer.strip_prefix('#') else {
            let name = pointer.rsplit('/').next().unwrap_or(pointer).to_string();
            self.report(Diagnostic::ExternalReference {
                pointer: pointer.to_string(),
            });
            return Ok((name, Node::empty_mapping()));
        };

        let segments: Vec<String> = fragment.split('/').skip(1).map(unescape).collect();
        if segments.is_empty() {
            // `#` is the whole document, which holds this pointer.
            return Err(ResolveError::CircularRef(pointer.to_string()));
        }
        let name = segments
            .last()
            .cloned()
            .unwrap_or_else(|| pointer.to_string());

        let target = match self.walk(&segments) {
            Ok(target) => target,
            Err(missing_segment) => {
                self.report(Diagnostic::UnresolvedReference {
                    pointer: pointer.to_string(),
                    missing_segment,
                });
                return Ok((name, Node::empty_mapping()));
            }
        };

        if !self.in_progress.insert(pointer.to_string()) {
            return Err(ResolveError::CircularRef(pointer.to_string()));
        }
        let resolved = self.resolve(target)?;
        self.in_progress.remove(pointer);
        Ok((name, resolved))
    }

    /// Walk the pointer segments from the spec root. On failure returns the
    /// first segment that could not be found.
    fn walk(&self, segments: &[String]) -> Result<&'a Node, String> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(String::new());
        };
        let mut current = self.root.get(first).ok_or_else(|| first.clone())?;
        for segment in rest {
            let next = match current {
                Node::Mapping(map) => map.get(segment),
                Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Node::Scalar(_) => None,
            };
            current = next.ok_or_else(|| segment.clone())?;
        }
        Ok(current)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if !self.diagnostics.contains(&diagnostic) {
            log::warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }
    }
}

/// JSON pointer unescaping: `~1` is `/`, `~0` is `~`.
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
