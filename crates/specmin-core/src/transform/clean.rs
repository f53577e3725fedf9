use indexmap::IndexMap;

use crate::config::KeysToKeep;
use crate::tree::Node;

/// Ancestor marker pushed for sequence elements.
const SEQUENCE_ITEM: &str = "[]";

/// Drop empty values, then the keys `keys` disallows.
pub fn clean_tree(node: &Node, keys: &KeysToKeep) -> Node {
    let mut cleaned = remove_empty_keys(node);
    remove_disallowed_keys(&mut cleaned, keys);
    cleaned
}

/// Recursively drop mapping entries whose value is `null`, `""`, or a
/// mapping/sequence that is empty once cleaned.
pub fn remove_empty_keys(node: &Node) -> Node {
    match node {
        Node::Mapping(map) => {
            let mut cleaned = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                if value.is_empty_value() {
                    continue;
                }
                let value = remove_empty_keys(value);
                if !value.is_empty_value() {
                    cleaned.insert(key.clone(), value);
                }
            }
            Node::Mapping(cleaned)
        }
        Node::Sequence(items) => Node::Sequence(items.iter().map(remove_empty_keys).collect()),
        Node::Scalar(_) => node.clone(),
    }
}

/// Remove `example`, `enum` and nested `description` keys in
/// place, as configured.
///
/// Walks with an explicit stack of `(node, ancestor keys)` so deep trees
/// cannot exhaust the call stack. Each node is visited once.
pub fn remove_disallowed_keys(node: &mut Node, keys: &KeysToKeep) {
    let mut stack: Vec<(&mut Node, Vec<&str>)> = vec![(node, Vec::new())];

    while let Some((current, ancestors)) = stack.pop() {
        match current {
            Node::Mapping(map) => {
                map.retain(|key, _| !is_disallowed(key, &ancestors, keys));
                for (key, value) in map.iter_mut() {
                    if value.is_container() {
                        let mut chain = ancestors.clone();
                        chain.push(key.as_str());
                        stack.push((value, chain));
                    }
                }
            }
            Node::Sequence(items) => {
                for item in items.iter_mut().filter(|item| item.is_container()) {
                    let mut chain = ancestors.clone();
                    chain.push(SEQUENCE_ITEM);
                    stack.push((item, chain));
                }
            }
            Node::Scalar(_) => {}
        }
    }
}

fn is_disallowed(key: &str, ancestors: &[&str], keys: &KeysToKeep) -> bool {
    match key {
        "example" => !keys.examples,
        "enum" => !keys.enums,
        "description" => !ancestors.is_empty() && !keys.nested_descriptions,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping;

    #[test]
    fn drops_null_and_empty_strings() {
        let node = mapping! {
            "summary" => "",
            "description" => Node::null(),
            "parameters" => vec![mapping! { "name" => "id", "description" => "" }],
            "deprecated" => false,
        };
        assert_eq!(
            remove_empty_keys(&node),
            mapping! {
                "parameters" => vec![mapping! { "name" => "id" }],
                "deprecated" => false,
            }
        );
    }

    #[test]
    fn drops_mappings_that_become_empty() {
        let node = mapping! {
            "responses" => mapping! { "200" => mapping! { "description" => "" } },
            "schema" => mapping! { "Ghost" => mapping! {} },
            "tags" => Vec::<Node>::new(),
        };
        assert_eq!(remove_empty_keys(&node), mapping! {});
    }

    #[test]
    fn removes_examples_and_enums_at_any_depth() {
        let mut node = mapping! {
            "example" => "top",
            "schema" => mapping! {
                "type" => "string",
                "enum" => vec![Node::from("a"), Node::from("b")],
                "example" => "a",
            },
            "parameters" => vec![mapping! { "name" => "id", "example" => 1 }],
        };
        remove_disallowed_keys(&mut node, &KeysToKeep::default());
        assert_eq!(
            node,
            mapping! {
                "schema" => mapping! { "type" => "string" },
                "parameters" => vec![mapping! { "name" => "id" }],
            }
        );
    }

    #[test]
    fn property_named_examples_survives() {
        let node = mapping! {
            "schema" => mapping! {
                "properties" => mapping! {
                    "examples" => mapping! { "type" => "array" },
                    "name" => mapping! { "type" => "string" },
                },
            },
        };
        assert_eq!(clean_tree(&node, &KeysToKeep::default()), node);
    }

    #[test]
    fn enabled_toggles_keep_keys() {
        let keys = KeysToKeep {
            examples: true,
            enums: true,
            ..KeysToKeep::default()
        };
        let mut node = mapping! {
            "schema" => mapping! { "enum" => vec![Node::from("a")], "example" => "a" },
        };
        let before = node.clone();
        remove_disallowed_keys(&mut node, &keys);
        assert_eq!(node, before);
    }

    #[test]
    fn nested_descriptions_only_below_top_level() {
        let keys = KeysToKeep {
            nested_descriptions: false,
            ..KeysToKeep::default()
        };
        let node = mapping! {
            "description" => "Top level stays",
            "parameters" => vec![mapping! { "name" => "id", "description" => "goes" }],
            "responses" => mapping! {
                "200" => mapping! { "description" => "goes too" },
            },
        };
        assert_eq!(
            clean_tree(&node, &keys),
            mapping! {
                "description" => "Top level stays",
                "parameters" => vec![mapping! { "name" => "id" }],
                "responses" => mapping! { "200" => mapping! {} },
            }
        );
    }

    #[test]
    fn deep_trees_do_not_overflow() {
        let mut node = mapping! { "example" => "x" };
        for _ in 0..10_000 {
            node = mapping! { "child" => node };
        }
        remove_disallowed_keys(&mut node, &KeysToKeep::default());
        let mut depth = 0;
        let mut current = &node;
        while let Some(child) = current.get("child") {
            current = child;
            depth += 1;
        }
        assert_eq!(depth, 10_000);
        assert_eq!(current, &mapping! {});
        // Dropping a 10k-deep tree recurses; leak it instead.
        std::mem::forget(node);
    }
}
