use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An input document lacks the structure the pipeline needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedInputError {
    #[error("no spec documents supplied")]
    NoDocuments,

    #[error("document {index} is not a mapping")]
    NotAMapping { index: usize },

    #[error("document {index} has no `paths` mapping")]
    MissingPaths { index: usize },

    #[error("document {index} has no `servers[0].url`")]
    MissingServerUrl { index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("circular reference detected: {0}")]
    CircularRef(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("abbreviation target `{target}` of `{source_key}` is itself abbreviated")]
    AbbreviationChain { source_key: String, target: String },
}

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("malformed input: {0}")]
    Malformed(#[from] MalformedInputError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A non-fatal problem noticed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A local pointer whose target does not exist; it was replaced by an empty mapping.
    UnresolvedReference {
        pointer: String,
        missing_segment: String,
    },
    /// A pointer into another document, which is never fetched.
    ExternalReference { pointer: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference {
                pointer,
                missing_segment,
            } => write!(
                f,
                "unresolved reference {pointer}: no `{missing_segment}` segment"
            ),
            Diagnostic::ExternalReference { pointer } => {
                write!(f, "external reference {pointer} left unresolved")
            }
        }
    }
}
