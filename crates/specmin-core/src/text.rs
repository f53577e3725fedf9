use std::sync::LazyLock;

use regex::Regex;

use crate::tree::Node;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("valid regex"));

/// Render a tree as newline-separated, normalized text.
///
/// A mapping entry with a scalar value becomes `key value`; a container
/// value puts the key on its own line followed by the rendered container.
/// Sequence elements are rendered one after another. Every key and scalar
/// goes through [`normalize`]; blank lines are dropped.
pub fn to_text(node: &Node) -> String {
    let mut parts = Vec::new();
    match node {
        Node::Mapping(map) => {
            for (key, value) in map {
                let key = normalize(key);
                match value {
                    Node::Scalar(scalar) => {
                        parts.push(format!("{key} {}", normalize(&scalar.to_string())));
                    }
                    container => {
                        parts.push(key);
                        parts.push(to_text(container));
                    }
                }
            }
        }
        Node::Sequence(items) => parts.extend(items.iter().map(to_text)),
        Node::Scalar(scalar) => parts.push(normalize(&scalar.to_string())),
    }
    parts.retain(|part| !part.trim().is_empty());
    parts.join("\n")
}

/// Strip HTML tags and ASCII punctuation other than `/` and `#`, lower-case,
/// and trim.
pub fn normalize(input: &str) -> String {
    let without_tags = HTML_TAG.replace_all(input, "");
    let kept: String = without_tags
        .chars()
        .filter(|c| !c.is_ascii_punctuation() || matches!(c, '/' | '#'))
        .collect();
    kept.to_lowercase().trim().to_string()
}
