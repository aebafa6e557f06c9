//! Request class registry and URL resolution
//!
//! One [`RequestSpec`] per request class ties together the default endpoint
//! template, the normalization schema and the pre-transform, so the fetch
//! path stays generic instead of being duplicated per class.

mod registry;

pub use registry::{resolve_url, rewrite_page_size, RequestSpec};
