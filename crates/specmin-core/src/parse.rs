use std::fs;
use std::path::Path;

use crate::error::ParseError;
use crate::tree::Node;

/// Parse a spec document from YAML.
pub fn from_yaml(input: &str) -> Result<Node, ParseError> {
    let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    Ok(Node::from(value))
}

/// Parse a spec document from JSON.
pub fn from_json(input: &str) -> Result<Node, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(Node::from(value))
}

/// Read and parse a spec file. `.json` files are parsed as JSON, anything
/// else as YAML.
pub fn from_path(path: &Path) -> Result<Node, ParseError> {
    let content = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json(&content),
        _ => from_yaml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yaml_and_json_agree() {
        let yaml = from_yaml("paths:\n  /a:\n    get:\n      operationId: a\n").unwrap();
        let json = from_json(r#"{"paths": {"/a": {"get": {"operationId": "a"}}}}"#).unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn parse_invalid_yaml() {
        assert!(matches!(from_yaml("a: [1, 2"), Err(ParseError::Yaml(_))));
    }

    #[test]
    fn from_path_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, r#"{"paths": {}}"#).unwrap();
        let node = from_path(&path).unwrap();
        assert!(node.get("paths").is_some());

        let missing = from_path(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ParseError::Io { .. })));
    }
}
