pub mod config;
pub mod document;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod tags;
pub mod text;
pub mod transform;
pub mod tree;

pub use indexmap::IndexMap;

pub use document::{EndpointDocument, HttpMethod};
pub use pipeline::{Minifier, MinifyOutput, minify};
pub use tags::TagSummary;
pub use tree::{Node, Scalar};
