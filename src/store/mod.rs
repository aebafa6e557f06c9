//! Client-side sync state
//!
//! [`SyncStore`] is the explicit context object holding everything the
//! fetch path mutates: the entity tables, the per-class result lists, the
//! pagination cursors and the single-flight registry. Constructing one per
//! session (or per test) replaces process-wide mutable state; clones share
//! the same underlying maps.

mod cursors;
mod entities;
mod inflight;

pub use cursors::CursorStore;
pub use entities::EntityStore;
pub use inflight::{FlightGuard, InFlightRegistry};

/// Shared state for one sync session
#[derive(Debug, Clone, Default)]
pub struct SyncStore {
    entities: EntityStore,
    cursors: CursorStore,
    in_flight: InFlightRegistry,
}

impl SyncStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity tables and result lists
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    /// Pagination cursors, keyed by flight key
    pub fn cursors(&self) -> &CursorStore {
        &self.cursors
    }

    /// Single-flight registry
    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }
}
