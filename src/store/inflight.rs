//! Single-flight registry
//!
//! At most one outstanding fetch per flight key. Acquisition hands back an
//! RAII [`FlightGuard`] whose `Drop` clears the flag, so the slot is
//! released on every exit path, error paths included.

use crate::types::FlightKey;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Shared set of in-flight keys
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    flags: Arc<Mutex<HashSet<FlightKey>>>,
}

impl InFlightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim a flight key
    ///
    /// Returns `None` when the key is already in flight and `override_in_flight`
    /// is false — the caller must skip the fetch, which is a deliberate no-op,
    /// not an error. With the override a second guard shares the flag; whichever
    /// guard drops first clears it. That interleaving is the one race the
    /// design accepts.
    pub fn try_acquire(&self, key: FlightKey, override_in_flight: bool) -> Option<FlightGuard> {
        let mut flags = self.flags.lock().expect("in-flight lock poisoned");
        if flags.contains(&key) && !override_in_flight {
            debug!(%key, "request already in flight, skipping");
            return None;
        }
        flags.insert(key);
        Some(FlightGuard {
            flags: Arc::clone(&self.flags),
            key,
        })
    }

    /// Whether a key is currently claimed
    pub fn is_in_flight(&self, key: FlightKey) -> bool {
        self.flags
            .lock()
            .expect("in-flight lock poisoned")
            .contains(&key)
    }
}

/// Scoped claim on a flight key, released on drop
#[derive(Debug)]
pub struct FlightGuard {
    flags: Arc<Mutex<HashSet<FlightKey>>>,
    key: FlightKey,
}

impl FlightGuard {
    /// The claimed key
    pub fn key(&self) -> FlightKey {
        self.key
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if let Ok(mut flags) = self.flags.lock() {
            flags.remove(&self.key);
        }
    }
}
