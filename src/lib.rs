//! # soundgraph
//!
//! A client-side sync engine for paginated social-graph and activity-feed
//! collections: followings, followers, favorites and activities.
//!
//! ## Features
//!
//! - **Paginated fetch**: cursor-driven page retrieval with per-class
//!   endpoint templates
//! - **Normalization**: nested response items flattened into per-type
//!   id-keyed entity tables with id cross-references
//! - **Single-flight guarding**: at most one outstanding request per
//!   request class, with a scoped override for re-entrant traversal
//! - **Full-collection traversal**: page-by-page drain of the followings
//!   collection with a per-user favorites fan-out
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use soundgraph::{SyncConfig, SyncEngine};
//!
//! #[tokio::main]
//! async fn main() -> soundgraph::Result<()> {
//!     let config = SyncConfig::new("https://api.example.com", "oauth-token")?;
//!     let engine = SyncEngine::new(config);
//!
//!     // One page of followings
//!     engine.fetch_followings(None, false).await?;
//!
//!     // Everything, including each followed user's favorites
//!     let report = engine.fetch_all_followings_with_favorites().await?;
//!     println!("{} pages, {} fan-outs", report.pages_fetched, report.fan_outs_issued);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SyncEngine                           │
//! │  fetch_page(class, owner, cursor, override) → FetchOutcome  │
//! │  fetch_all_followings_with_favorites() → TraversalReport    │
//! └─────────────────────────────────────────────────────────────┘
//!                │              │               │
//! ┌──────────────┴──┬───────────┴────┬──────────┴──────────────┐
//! │    resource     │      http      │         store           │
//! ├─────────────────┼────────────────┼─────────────────────────┤
//! │ RequestSpec     │ GET + decode   │ EntityStore (merge sink)│
//! │ resolve_url     │ no retries     │ CursorStore             │
//! │ page-size       │                │ InFlightRegistry (RAII) │
//! │ rewrite         │   normalize    │                         │
//! └─────────────────┴────────────────┴─────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Request class registry and URL resolution
pub mod resource;

/// HTTP transport
pub mod http;

/// Response normalization
pub mod normalize;

/// Client-side sync state
pub mod store;

/// Fetch and traversal engine
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

pub use engine::{FetchOutcome, SyncConfig, SyncEngine, SyncStats, TraversalReport};
pub use error::{Error, Result};
pub use normalize::{normalize, NormalizedPage, PreTransform};
pub use store::SyncStore;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
