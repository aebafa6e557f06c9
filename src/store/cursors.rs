//! Pagination cursor store
//!
//! One continuation slot per flight key. `None` covers both "never
//! fetched" and "end of collection reached"; the fetch path only advances
//! a slot after the page it came from merged successfully.

use crate::types::FlightKey;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local cursor map
#[derive(Debug, Clone, Default)]
pub struct CursorStore {
    cursors: Arc<RwLock<HashMap<FlightKey, Option<String>>>>,
}

impl CursorStore {
    /// Create an empty cursor store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the continuation for a flight key (`None` = end of collection)
    pub async fn set(&self, key: FlightKey, cursor: Option<String>) {
        let mut cursors = self.cursors.write().await;
        cursors.insert(key, cursor);
    }

    /// Current continuation for a flight key, if one is pending
    pub async fn get(&self, key: FlightKey) -> Option<String> {
        let cursors = self.cursors.read().await;
        cursors.get(&key).cloned().flatten()
    }

    /// Drop all recorded cursors
    pub async fn clear(&self) {
        let mut cursors = self.cursors.write().await;
        cursors.clear();
    }
}
