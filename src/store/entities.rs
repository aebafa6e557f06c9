//! Entity merge sink and per-class result lists
//!
//! Idempotent upsert target for normalized pages. Merge-by-id is
//! commutative at the record level, so interleaved fan-out fetches may
//! land in any order without corrupting the tables.

use crate::normalize::{merge_object_fields, EntityTable, NormalizedPage};
use crate::types::{EntityId, EntityType, JsonValue, RequestClass};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Inner state behind the lock
#[derive(Debug, Default)]
struct EntityState {
    /// Entity tables keyed by type
    entities: HashMap<EntityType, EntityTable>,
    /// Ordered result ids per session-level request class
    results: HashMap<RequestClass, Vec<EntityId>>,
    /// Favorites fetched per followed user
    ///
    /// An entry exists (possibly empty) once a fan-out fetch for that owner
    /// completed; its presence is the "already fetched" skip signal.
    favorites_by_user: HashMap<EntityId, Vec<EntityId>>,
}

/// The shared entity store
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    state: Arc<RwLock<EntityState>>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a normalized page's entities into the tables
    ///
    /// Fields of an already-known entity are overwritten by the supplied
    /// field set; fields absent from the update survive. Merging the same
    /// page twice is a no-op beyond the first merge.
    pub async fn merge_entities(&self, page: &NormalizedPage) {
        let mut state = self.state.write().await;
        for (entity_type, table) in &page.entities {
            let target = state.entities.entry(*entity_type).or_default();
            for (id, record) in table {
                match target.get_mut(id) {
                    Some(existing) => merge_object_fields(existing, record.clone()),
                    None => {
                        target.insert(*id, record.clone());
                    }
                }
            }
        }
    }

    /// Merge ordered result ids into a session-level result list
    ///
    /// Append semantics with replace-by-id: ids already present keep their
    /// position, new ids append in page order.
    pub async fn merge_results(&self, class: RequestClass, ids: &[EntityId]) {
        let mut state = self.state.write().await;
        let list = state.results.entry(class).or_default();
        for id in ids {
            if !list.contains(id) {
                list.push(*id);
            }
        }
    }

    /// Record the favorites fetched for one followed user
    ///
    /// Always creates the owner's entry, even for an empty page, so the
    /// fan-out step can skip owners it already covered.
    pub async fn merge_favorites_of(&self, owner: EntityId, ids: &[EntityId]) {
        let mut state = self.state.write().await;
        let list = state.favorites_by_user.entry(owner).or_default();
        for id in ids {
            if !list.contains(id) {
                list.push(*id);
            }
        }
    }

    /// Look up one entity record (cloned)
    pub async fn entity(&self, entity_type: EntityType, id: EntityId) -> Option<JsonValue> {
        let state = self.state.read().await;
        state.entities.get(&entity_type)?.get(&id).cloned()
    }

    /// Number of stored entities of a type
    pub async fn entity_count(&self, entity_type: EntityType) -> usize {
        let state = self.state.read().await;
        state.entities.get(&entity_type).map_or(0, EntityTable::len)
    }

    /// Ordered result ids for a session-level request class
    pub async fn result_ids(&self, class: RequestClass) -> Vec<EntityId> {
        let state = self.state.read().await;
        state.results.get(&class).cloned().unwrap_or_default()
    }

    /// Whether favorites were already fetched for this owner
    pub async fn has_favorites_of(&self, owner: EntityId) -> bool {
        let state = self.state.read().await;
        state.favorites_by_user.contains_key(&owner)
    }

    /// Favorites recorded for one owner, if fetched
    pub async fn favorites_of(&self, owner: EntityId) -> Option<Vec<EntityId>> {
        let state = self.state.read().await;
        state.favorites_by_user.get(&owner).cloned()
    }
}
