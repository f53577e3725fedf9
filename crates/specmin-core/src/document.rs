use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::tags::TagSummary;

static SCHEME_AND_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^/]+/").expect("valid regex"));

/// HTTP method of a path item entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "put" => Ok(HttpMethod::Put),
            "post" => Ok(HttpMethod::Post),
            "delete" => Ok(HttpMethod::Delete),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "patch" => Ok(HttpMethod::Patch),
            "trace" => Ok(HttpMethod::Trace),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// One minified operation before numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRecord {
    pub tag: String,
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    /// Server URL joined with the path.
    pub server_url: String,
    /// Rendered text of the minified operation tree.
    pub text: String,
}

/// The final per-endpoint unit handed to the indexing stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDocument {
    pub tag: String,
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub server_url: String,
    pub content: String,
    pub tag_summary: String,
    pub tag_number: usize,
    pub doc_number: usize,
    pub title: String,
    pub filename: String,
}

/// Hands out `doc_number`s for a single run.
#[derive(Debug, Default)]
pub struct DocCounter {
    next: usize,
}

impl DocCounter {
    pub fn next_number(&mut self) -> usize {
        let number = self.next;
        self.next += 1;
        number
    }
}

/// Turn sorted records into numbered documents.
///
/// `records` must already be in final `(tag, operation_id)` order: numbers
/// are assigned in iteration order. With `inline_tag_summary` the tag's
/// summary is also put at the head of `content`.
pub fn build_documents(
    records: Vec<EndpointRecord>,
    tags: &[TagSummary],
    inline_tag_summary: bool,
    counter: &mut DocCounter,
) -> Vec<EndpointDocument> {
    let by_name: HashMap<&str, &TagSummary> =
        tags.iter().map(|tag| (tag.name.as_str(), tag)).collect();

    records
        .into_iter()
        .map(|record| {
            let (tag_summary, tag_number) = by_name
                .get(record.tag.as_str())
                .map_or((String::new(), 0), |tag| {
                    (tag.summary.clone(), tag.tag_number)
                });
            let doc_number = counter.next_number();

            let mut content = format!(
                "operationId: {} path: {} content: {}",
                record.operation_id, record.server_url, record.text
            );
            if inline_tag_summary {
                content = format!("tag {} {}\n{}", record.tag, tag_summary, content);
            }

            EndpointDocument {
                title: derive_title(&record.server_url),
                filename: format!(
                    "{}_{}_{}_{}",
                    tag_number, record.tag, record.operation_id, doc_number
                ),
                tag: record.tag,
                operation_id: record.operation_id,
                method: record.method,
                path: record.path,
                server_url: record.server_url,
                content,
                tag_summary,
                tag_number,
                doc_number,
            }
        })
        .collect()
}

/// Drop `scheme://host/` from an absolute URL; anything that does not parse
/// as one is returned unchanged.
pub fn derive_title(server_url: &str) -> String {
    match Url::parse(server_url) {
        Ok(url) if url.has_host() => SCHEME_AND_HOST.replace_all(server_url, "").into_owned(),
        _ => server_url.to_string(),
    }
}
