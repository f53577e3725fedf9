use indexmap::IndexMap;

use crate::tree::Node;

/// Keys whose subtree keeps its exact shape; only their children collapse.
const PROTECTED_KEYS: [&str; 3] = ["responses", "default", "200"];

/// Collapse chains of single-entry wrapper mappings.
///
/// For an entry `k: {k2: {k3: v}}` the wrapper `k2` is dropped, giving
/// `k: {k3: v}`, and this repeats while the wrapped value is itself a
/// single-entry mapping. The outer key always survives, so
/// `content: {application/json: {schema: {...}}}` becomes
/// `content: {schema: {...}}`. Entries under protected keys and `4xx`/`5xx`
/// status codes are recursed into without collapsing.
pub fn flatten(node: &Node) -> Node {
    let Node::Mapping(map) = node else {
        return node.clone();
    };

    let mut flattened = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        if !matches!(value, Node::Mapping(_)) || is_protected(key) {
            flattened.insert(key.clone(), flatten(value));
            continue;
        }

        let mut value = value;
        while let Some(inner) = single_wrapped_mapping(value) {
            value = inner;
        }
        flattened.insert(key.clone(), flatten(value));
    }
    Node::Mapping(flattened)
}

/// `{k: inner}` where `inner` is a single-entry mapping.
fn single_wrapped_mapping(node: &Node) -> Option<&Node> {
    let map = node.as_mapping().filter(|map| map.len() == 1)?;
    let (_, inner) = map.first()?;
    inner
        .as_mapping()
        .filter(|inner_map| inner_map.len() == 1)
        .map(|_| inner)
}

fn is_protected(key: &str) -> bool {
    PROTECTED_KEYS.contains(&key) || key.starts_with('4') || key.starts_with('5')
}
