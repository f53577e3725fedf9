use std::collections::HashSet;

use serde::Serialize;

use crate::text::to_text;
use crate::transform::merge::CanonicalSpec;
use crate::tree::Node;

/// Tag used for operations without one.
pub const DEFAULT_TAG: &str = "default";

/// One known tag with its rendered description and alphabetical rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub name: String,
    pub summary: String,
    pub tag_number: usize,
}

/// Collect every tag from the spec's root `tags` list plus any tag used by
/// an endpoint, sorted by name and numbered from 0.
///
/// Root tag descriptions are rendered with [`to_text`]; tags only seen on
/// endpoints get an empty summary.
pub fn aggregate_tags<'a>(
    spec: &CanonicalSpec,
    endpoint_tags: impl IntoIterator<Item = &'a str>,
) -> Vec<TagSummary> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();

    for tag in spec.tags() {
        let Some(name) = tag.get("name").and_then(Node::as_str) else {
            log::warn!("skipping root tag without a name");
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }
        let summary = tag
            .get("description")
            .filter(|description| !description.is_empty_value())
            .map(to_text)
            .unwrap_or_default();
        tags.push((name.to_string(), summary));
    }

    for name in endpoint_tags {
        if seen.insert(name.to_string()) {
            tags.push((name.to_string(), String::new()));
        }
    }

    tags.sort_by(|a, b| a.0.cmp(&b.0));
    tags.into_iter()
        .enumerate()
        .map(|(tag_number, (name, summary))| TagSummary {
            name,
            summary,
            tag_number,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;
    use crate::transform::merge::merge_specs;

    fn spec(tags: Vec<Node>) -> CanonicalSpec {
        merge_specs([mapping! {
            "servers" => vec![mapping! { "url" => "https://api.example.com" }],
            "paths" => mapping! {},
            "tags" => tags,
        }])
        .unwrap()
    }

    #[test]
    fn endpoint_tags_join_root_tags_in_name_order() {
        let spec = spec(vec![mapping! {
            "name" => "users",
            "description" => "<p>Manage <b>users</b>.</p>",
        }]);
        let tags = aggregate_tags(&spec, ["billing", DEFAULT_TAG, "billing"]);
        assert_eq!(
            tags,
            vec![
                TagSummary {
                    name: "billing".into(),
                    summary: String::new(),
                    tag_number: 0,
                },
                TagSummary {
                    name: "default".into(),
                    summary: String::new(),
                    tag_number: 1,
                },
                TagSummary {
                    name: "users".into(),
                    summary: "manage users".into(),
                    tag_number: 2,
                },
            ]
        );
    }

    #[test]
    fn duplicate_and_nameless_root_tags_are_skipped() {
        let spec = spec(vec![
            mapping! { "name" => "pets", "description" => "First" },
            mapping! { "name" => "pets", "description" => "Second" },
            mapping! { "description" => "No name" },
            mapping! { "name" => "store" },
        ]);
        let tags = aggregate_tags(&spec, []);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].summary, "first");
        assert_eq!(tags[1].name, "store");
        assert_eq!(tags[1].summary, "");
    }
}
