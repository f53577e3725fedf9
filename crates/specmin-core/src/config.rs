use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::document::HttpMethod;
use crate::error::ConfigError;

/// Run configuration loaded from `.specmin.yaml`. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinifierConfig {
    pub keys_to_keep: KeysToKeep,
    /// Operations under any other method key are skipped.
    pub methods: Vec<HttpMethod>,
    /// Literal (case-insensitive) string → shorthand.
    pub abbreviations: IndexMap<String, String>,
    pub abbreviate: bool,
}

impl Default for MinifierConfig {
    fn default() -> Self {
        Self {
            keys_to_keep: KeysToKeep::default(),
            methods: vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Patch,
                HttpMethod::Delete,
            ],
            abbreviations: default_abbreviations(),
            abbreviate: true,
        }
    }
}

impl MinifierConfig {
    pub fn handles(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }
}

/// Which sections of an operation survive minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeysToKeep {
    pub parameters: bool,
    pub good_responses: bool,
    pub bad_responses: bool,
    pub request_bodies: bool,
    /// Resolve `$ref` pointers; when off they are left as plain strings.
    pub schemas: bool,
    pub endpoint_descriptions: bool,
    pub endpoint_summaries: bool,
    pub enums: bool,
    pub nested_descriptions: bool,
    pub examples: bool,
    /// Repeat the tag description inside each endpoint's content.
    pub tag_summaries: bool,
    pub deprecated: bool,
}

impl Default for KeysToKeep {
    fn default() -> Self {
        Self {
            parameters: true,
            good_responses: true,
            bad_responses: false,
            request_bodies: true,
            schemas: true,
            endpoint_descriptions: true,
            endpoint_summaries: true,
            enums: false,
            nested_descriptions: true,
            examples: false,
            tag_summaries: false,
            deprecated: false,
        }
    }
}

fn default_abbreviations() -> IndexMap<String, String> {
    [
        ("operationid", "opid"),
        ("parameters", "params"),
        ("requestbody", "reqbody"),
        ("properties", "props"),
        ("schemaname", "schname"),
        ("description", "desc"),
        ("summary", "sum"),
        ("string", "str"),
        ("number", "num"),
        ("object", "obj"),
        ("boolean", "bool"),
        ("array", "arr"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".specmin.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<MinifierConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: MinifierConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# specmin configuration
keys_to_keep:
  parameters: true
  good_responses: true        # the 200 response
  bad_responses: false        # 4xx, 5xx and default responses
  request_bodies: true
  schemas: true               # inline $ref targets
  endpoint_descriptions: true
  endpoint_summaries: true
  enums: false
  nested_descriptions: true
  examples: false
  tag_summaries: false        # repeat the tag description in every endpoint
  deprecated: false

methods: [get, post, patch, delete]

abbreviate: true
abbreviations:
  operationid: opid
  parameters: params
  requestbody: reqbody
  properties: props
  schemaname: schname
  description: desc
  summary: sum
  string: str
  number: num
  object: obj
  boolean: bool
  array: arr
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MinifierConfig::default();
        assert!(config.keys_to_keep.parameters);
        assert!(config.keys_to_keep.good_responses);
        assert!(!config.keys_to_keep.bad_responses);
        assert!(!config.keys_to_keep.examples);
        assert!(config.abbreviate);
        assert_eq!(config.abbreviations["requestbody"], "reqbody");
        assert!(config.handles(HttpMethod::Patch));
        assert!(!config.handles(HttpMethod::Put));
    }

    #[test]
    fn test_default_content_matches_default_config() {
        let config: MinifierConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, MinifierConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
keys_to_keep:
  bad_responses: true
  enums: true
methods: [get, put]
abbreviate: false
"#;
        let config: MinifierConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.keys_to_keep.bad_responses);
        assert!(config.keys_to_keep.enums);
        // Defaults applied
        assert!(config.keys_to_keep.parameters);
        assert_eq!(config.methods, vec![HttpMethod::Get, HttpMethod::Put]);
        assert!(!config.abbreviate);
        assert_eq!(config.abbreviations.len(), 12);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "methods: [fetch]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
