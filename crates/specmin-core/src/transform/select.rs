use indexmap::IndexMap;

use crate::config::KeysToKeep;
use crate::tree::{Node, Scalar};

/// Project an operation onto the sections enabled in `keys`.
///
/// Disabled sections are left out entirely. `responses` is present whenever
/// good or bad responses are enabled and holds `200` and/or every `4xx`,
/// `5xx` and `default` response.
pub fn select_fields(operation: &Node, path: &str, keys: &KeysToKeep) -> Node {
    let mut selected = IndexMap::new();

    let mut copy = |key: &str, enabled: bool| {
        if let Some(value) = operation.get(key).filter(|_| enabled) {
            selected.insert(key.to_string(), value.clone());
        }
    };
    copy("parameters", keys.parameters);
    copy("summary", keys.endpoint_summaries);
    copy("description", keys.endpoint_descriptions);
    copy("requestBody", keys.request_bodies);

    if keys.good_responses || keys.bad_responses {
        let responses = operation.get("responses").and_then(Node::as_mapping);
        let mut kept = IndexMap::new();
        for (status, response) in responses.into_iter().flatten() {
            let wanted = if status == "200" {
                keys.good_responses
            } else {
                keys.bad_responses && is_error_status(status)
            };
            if wanted && !matches!(response, Node::Scalar(Scalar::Null)) {
                kept.insert(status.clone(), response.clone());
            }
        }
        selected.insert("responses".to_string(), Node::Mapping(kept));
    }

    log::trace!("{path}: kept {} sections", selected.len());
    Node::Mapping(selected)
}

/// `4xx`, `5xx` and `default` status keys.
fn is_error_status(status: &str) -> bool {
    status.starts_with('4') || status.starts_with('5') || status.contains("default")
}
