pub mod abbreviate;
pub mod clean;
pub mod flatten;
pub mod merge;
pub mod ref_resolve;
pub mod select;

pub use abbreviate::Abbreviations;
pub use merge::{CanonicalSpec, merge_specs};
pub use ref_resolve::RefResolver;
