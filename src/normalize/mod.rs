//! Response normalization
//!
//! Flattens nested collection items into per-type id-keyed entity tables
//! plus an ordered list of top-level result ids. Cross-references between
//! entity types (a track and its uploader) are kept as id references so
//! no entity is duplicated across tables.

mod normalizer;
mod types;

pub use normalizer::normalize;
pub use types::{EntityTable, NormalizedPage, PreTransform};

pub(crate) use types::merge_object_fields;

#[cfg(test)]
mod tests;
