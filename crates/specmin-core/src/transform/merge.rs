use indexmap::IndexMap;

use crate::error::MalformedInputError;
use crate::tree::Node;

/// The single merged spec every later stage reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSpec {
    root: IndexMap<String, Node>,
    server_url: String,
}

impl CanonicalSpec {
    /// The whole merged tree, used as the base for pointer resolution.
    pub fn root(&self) -> &IndexMap<String, Node> {
        &self.root
    }

    /// `servers[0].url` of the first document.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// `(path, path item)` pairs in ascending path order.
    pub fn paths(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.root
            .get("paths")
            .and_then(Node::as_mapping)
            .into_iter()
            .flatten()
    }

    pub fn components(&self) -> Option<&IndexMap<String, Node>> {
        self.root.get("components").and_then(Node::as_mapping)
    }

    /// Root `tags` list, empty when absent.
    pub fn tags(&self) -> &[Node] {
        self.root
            .get("tags")
            .and_then(Node::as_sequence)
            .unwrap_or_default()
    }
}

/// Merge spec documents into one [`CanonicalSpec`].
///
/// The first document seeds the result. Later documents overwrite `paths`
/// entries and `components` entries per key (no deep merge) and contribute
/// root tags whose names are new. `paths` and every `components`
/// sub-category end up in ascending key order.
pub fn merge_specs(
    documents: impl IntoIterator<Item = Node>,
) -> Result<CanonicalSpec, MalformedInputError> {
    let mut merged: Option<(IndexMap<String, Node>, String)> = None;

    for (index, document) in documents.into_iter().enumerate() {
        let (document, server_url) = validate(index, document)?;
        if let Some((root, _)) = merged.as_mut() {
            merge_into(root, document);
        } else {
            merged = Some((document, server_url));
        }
    }

    let (mut root, server_url) = merged.ok_or(MalformedInputError::NoDocuments)?;

    if let Some(Node::Mapping(paths)) = root.get_mut("paths") {
        paths.sort_keys();
    }
    if let Some(Node::Mapping(components)) = root.get_mut("components") {
        for category in components.values_mut() {
            if let Node::Mapping(entries) = category {
                entries.sort_keys();
            }
        }
    }

    let spec = CanonicalSpec { root, server_url };
    log::debug!(
        "merged spec: {} paths, {} component categories, server {}",
        spec.paths().count(),
        spec.components().map_or(0, IndexMap::len),
        spec.server_url()
    );
    Ok(spec)
}

fn validate(
    index: usize,
    document: Node,
) -> Result<(IndexMap<String, Node>, String), MalformedInputError> {
    let Node::Mapping(document) = document else {
        return Err(MalformedInputError::NotAMapping { index });
    };
    if !matches!(document.get("paths"), Some(Node::Mapping(_))) {
        return Err(MalformedInputError::MissingPaths { index });
    }
    let server_url = document
        .get("servers")
        .and_then(Node::as_sequence)
        .and_then(|servers| servers.first())
        .and_then(|server| server.get("url"))
        .and_then(Node::as_str)
        .ok_or(MalformedInputError::MissingServerUrl { index })?
        .to_string();
    Ok((document, server_url))
}

fn merge_into(root: &mut IndexMap<String, Node>, mut document: IndexMap<String, Node>) {
    if let (Some(Node::Mapping(paths)), Some(Node::Mapping(incoming))) =
        (root.get_mut("paths"), document.shift_remove("paths"))
    {
        paths.extend(incoming);
    }

    if let Some(Node::Mapping(incoming)) = document.shift_remove("components") {
        let components = root
            .entry("components".to_string())
            .or_insert_with(Node::empty_mapping);
        if !matches!(components, Node::Mapping(_)) {
            *components = Node::empty_mapping();
        }
        if let Node::Mapping(components) = components {
            for (category, entries) in incoming {
                merge_category(components, category, entries);
            }
        }
    }

    if let Some(Node::Sequence(incoming)) = document.shift_remove("tags") {
        let tags = root
            .entry("tags".to_string())
            .or_insert_with(|| Node::Sequence(Vec::new()));
        if let Node::Sequence(tags) = tags {
            for tag in incoming {
                let name = tag.get("name").and_then(Node::as_str);
                let known = tags
                    .iter()
                    .any(|t| name.is_some() && t.get("name").and_then(Node::as_str) == name);
                if !known {
                    tags.push(tag);
                }
            }
        }
    }
}

fn merge_category(components: &mut IndexMap<String, Node>, category: String, entries: Node) {
    match (components.get_mut(&category), entries) {
        (Some(Node::Mapping(existing)), Node::Mapping(incoming)) => existing.extend(incoming),
        (_, entries) => {
            components.insert(category, entries);
        }
    }
}
