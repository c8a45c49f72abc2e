//! Mapping schemas
//!
//! A schema is kept as a generic tree so fragments can be merged
//! (`extends`, object templates, predicate overrides), and parsed into
//! typed views where it is evaluated.

mod loader;
mod merge;
mod types;

pub use loader::{Schema, SchemaError};
pub use merge::merge;
pub use types::{template_refs, PredicateEntry, PredicateKind, SchemaObject};

pub(crate) use types::{nullable, one_or_many, optional_scalar};
