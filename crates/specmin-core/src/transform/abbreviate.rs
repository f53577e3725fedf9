use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::tree::{Node, Scalar};

/// Lower-cased abbreviation table.
///
/// No shorthand is itself an abbreviated word, so applying the table twice
/// gives the same result as applying it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviations {
    table: HashMap<String, String>,
}

impl Abbreviations {
    pub fn new(table: &IndexMap<String, String>) -> Result<Self, ConfigError> {
        let table: HashMap<String, String> = table
            .iter()
            .map(|(from, to)| (from.to_lowercase(), to.to_lowercase()))
            .collect();
        for (from, to) in &table {
            if to != from && table.contains_key(to) {
                return Err(ConfigError::AbbreviationChain {
                    source_key: from.clone(),
                    target: to.clone(),
                });
            }
        }
        Ok(Self { table })
    }

    /// Lower-case `text` and swap it for its shorthand when one exists.
    pub fn apply(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        match self.table.get(&lowered) {
            Some(short) => short.clone(),
            None => lowered,
        }
    }

    /// Rewrite every mapping key and string leaf. Numbers, booleans and
    /// nulls are kept.
    pub fn abbreviate(&self, node: &Node) -> Node {
        match node {
            Node::Mapping(map) => Node::Mapping(
                map.iter()
                    .map(|(key, value)| (self.apply(key), self.abbreviate(value)))
                    .collect(),
            ),
            Node::Sequence(items) => {
                Node::Sequence(items.iter().map(|item| self.abbreviate(item)).collect())
            }
            Node::Scalar(Scalar::String(s)) => Node::string(self.apply(s)),
            Node::Scalar(_) => node.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinifierConfig;
    use crate::mapping;

    fn defaults() -> Abbreviations {
        Abbreviations::new(&MinifierConfig::default().abbreviations).unwrap()
    }

    #[test]
    fn abbreviates_keys_and_values() {
        let node = mapping! {
            "operationId" => "listPets",
            "requestBody" => mapping! {
                "Description" => "Pet to add",
                "properties" => mapping! { "name" => mapping! { "type" => "String" } },
            },
            "limit" => 10,
            "required" => true,
        };
        assert_eq!(
            defaults().abbreviate(&node),
            mapping! {
                "opid" => "listpets",
                "reqbody" => mapping! {
                    "desc" => "pet to add",
                    "props" => mapping! { "name" => mapping! { "type" => "str" } },
                },
                "limit" => 10,
                "required" => true,
            }
        );
    }

    #[test]
    fn abbreviating_twice_is_a_no_op() {
        let abbreviations = defaults();
        let node = mapping! {
            "requestBody" => mapping! { "schemaName" => "Object" },
            "items" => vec![Node::from("array"), Node::from("Boolean"), Node::from(3)],
        };
        let once = abbreviations.abbreviate(&node);
        let twice = abbreviations.abbreviate(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_chained_tables() {
        let table: IndexMap<String, String> = [("description", "desc"), ("desc", "d")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert!(matches!(
            Abbreviations::new(&table),
            Err(ConfigError::AbbreviationChain { .. })
        ));
    }
}
