use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MinifierConfig;
use crate::document::{DocCounter, EndpointDocument, EndpointRecord, HttpMethod, build_documents};
use crate::error::{ConfigError, Diagnostic, MinifyError};
use crate::tags::{DEFAULT_TAG, TagSummary, aggregate_tags};
use crate::text::to_text;
use crate::transform::clean::clean_tree;
use crate::transform::flatten::flatten;
use crate::transform::merge::{CanonicalSpec, merge_specs};
use crate::transform::select::select_fields;
use crate::transform::{Abbreviations, RefResolver};
use crate::tree::Node;

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinifyOutput {
    /// Sorted by `(tag, operation_id)` and numbered `0..n`.
    pub documents: Vec<EndpointDocument>,
    /// The same documents grouped by method, each group in sorted order.
    pub by_method: BTreeMap<HttpMethod, Vec<EndpointDocument>>,
    pub tags: Vec<TagSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns parsed spec documents into endpoint documents.
///
/// Holds only immutable configuration; counters and tag tables live inside
/// each [`Minifier::run`] call, so runs never affect one another.
#[derive(Debug, Clone)]
pub struct Minifier {
    config: MinifierConfig,
    abbreviations: Abbreviations,
}

impl Minifier {
    pub fn new(config: MinifierConfig) -> Result<Self, ConfigError> {
        let abbreviations = Abbreviations::new(&config.abbreviations)?;
        Ok(Self {
            config,
            abbreviations,
        })
    }

    /// Run the whole pipeline over `documents`.
    pub fn run(&self, documents: impl IntoIterator<Item = Node>) -> Result<MinifyOutput, MinifyError> {
        // Phase 1: Merge into one canonical spec
        let spec = merge_specs(documents)?;

        // Phase 2: Minify each operation
        let mut resolver = RefResolver::new(&spec);
        let mut records = self.minify_operations(&spec, &mut resolver)?;
        let diagnostics = resolver.into_diagnostics();

        // Phase 3: Sort, then number
        records.sort_by(|a, b| (&a.tag, &a.operation_id).cmp(&(&b.tag, &b.operation_id)));
        let tags = aggregate_tags(&spec, records.iter().map(|r| r.tag.as_str()));
        let mut counter = DocCounter::default();
        let documents = build_documents(
            records,
            &tags,
            self.config.keys_to_keep.tag_summaries,
            &mut counter,
        );

        // Phase 4: Group by method
        let mut by_method: BTreeMap<HttpMethod, Vec<EndpointDocument>> = BTreeMap::new();
        for document in &documents {
            by_method
                .entry(document.method)
                .or_default()
                .push(document.clone());
        }

        log::debug!(
            "minified {} endpoints across {} tags ({} diagnostics)",
            documents.len(),
            tags.len(),
            diagnostics.len()
        );
        Ok(MinifyOutput {
            documents,
            by_method,
            tags,
            diagnostics,
        })
    }

    fn minify_operations(
        &self,
        spec: &CanonicalSpec,
        resolver: &mut RefResolver<'_>,
    ) -> Result<Vec<EndpointRecord>, MinifyError> {
        let keys = &self.config.keys_to_keep;
        let mut records = Vec::new();

        for (path, item) in spec.paths() {
            let Some(methods) = item.as_mapping() else {
                continue;
            };
            for (method_key, operation) in methods {
                let Ok(method) = method_key.parse::<HttpMethod>() else {
                    continue;
                };
                if !self.config.handles(method) {
                    continue;
                }
                if !keys.deprecated && operation.get("deprecated").and_then(Node::as_bool) == Some(true) {
                    log::trace!("skipping deprecated {method} {path}");
                    continue;
                }

                let resolved = if keys.schemas {
                    resolver.resolve(operation)?
                } else {
                    operation.clone()
                };
                let selected = select_fields(&resolved, path, keys);
                let cleaned = clean_tree(&selected, keys);
                let mut tree = flatten(&cleaned);
                if self.config.abbreviate {
                    tree = self.abbreviations.abbreviate(&tree);
                }

                records.push(EndpointRecord {
                    tag: operation_tag(operation),
                    operation_id: operation
                        .get("operationId")
                        .and_then(Node::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    method,
                    path: path.clone(),
                    server_url: format!("{}{}", spec.server_url(), path),
                    text: to_text(&tree),
                });
            }
        }

        Ok(records)
    }
}

/// First entry of `tags`, or [`DEFAULT_TAG`].
fn operation_tag(operation: &Node) -> String {
    operation
        .get("tags")
        .and_then(Node::as_sequence)
        .and_then(|tags| tags.first())
        .and_then(Node::as_str)
        .filter(|tag| !tag.is_empty())
        .unwrap_or(DEFAULT_TAG)
        .to_string()
}

/// Run the pipeline once with `config`.
pub fn minify(
    documents: impl IntoIterator<Item = Node>,
    config: &MinifierConfig,
) -> Result<MinifyOutput, MinifyError> {
    Minifier::new(config.clone())?.run(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;

    fn doc(paths: Node) -> Node {
        mapping! {
            "servers" => vec![mapping! { "url" => "https://api.example.com" }],
            "paths" => paths,
        }
    }

    #[test]
    fn operation_tag_defaults() {
        assert_eq!(operation_tag(&mapping! {}), "default");
        assert_eq!(operation_tag(&mapping! { "tags" => Vec::<Node>::new() }), "default");
        assert_eq!(
            operation_tag(&mapping! { "tags" => vec![Node::from("a"), Node::from("b")] }),
            "a"
        );
    }

    #[test]
    fn skips_unhandled_methods_and_path_level_keys() {
        let spec = doc(mapping! {
            "/pets" => mapping! {
                "summary" => "Pets",
                "parameters" => Vec::<Node>::new(),
                "get" => mapping! { "operationId" => "listPets" },
                "put" => mapping! { "operationId" => "replacePets" },
                "post" => mapping! { "operationId" => "createPet", "deprecated" => true },
            },
        });
        let output = minify([spec], &MinifierConfig::default()).unwrap();
        let ids: Vec<&str> = output
            .documents
            .iter()
            .map(|d| d.operation_id.as_str())
            .collect();
        assert_eq!(ids, ["listPets"]);
    }

    #[test]
    fn deprecated_kept_when_enabled() {
        let mut config = MinifierConfig::default();
        config.keys_to_keep.deprecated = true;
        let spec = doc(mapping! {
            "/pets" => mapping! {
                "post" => mapping! { "operationId" => "createPet", "deprecated" => true },
            },
        });
        let output = minify([spec], &config).unwrap();
        assert_eq!(output.documents.len(), 1);
        assert_eq!(output.by_method[&HttpMethod::Post].len(), 1);
    }

    #[test]
    fn schemas_disabled_leaves_refs_alone() {
        let mut config = MinifierConfig::default();
        config.keys_to_keep.schemas = false;
        let spec = doc(mapping! {
            "/pets" => mapping! {
                "get" => mapping! {
                    "operationId" => "listPets",
                    "requestBody" => mapping! { "$ref" => "#/components/requestBodies/Missing" },
                },
            },
        });
        let output = minify([spec], &config).unwrap();
        assert!(output.diagnostics.is_empty());
        assert!(
            output.documents[0]
                .content
                .contains("reqbody\nref #/components/requestbodies/missing")
        );
    }

    #[test]
    fn rejects_chained_abbreviations() {
        let mut config = MinifierConfig::default();
        config
            .abbreviations
            .insert("desc".to_string(), "d".to_string());
        assert!(matches!(
            Minifier::new(config),
            Err(ConfigError::AbbreviationChain { .. })
        ));
    }
}
