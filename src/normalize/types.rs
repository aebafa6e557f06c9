//! Normalization types
//!
//! Output shape of the normalizer and the schema-specific pre-transforms
//! applied before normalization.

use crate::types::{EntityId, EntityType, JsonValue};
use std::collections::HashMap;

/// Entity table: id → entity record
pub type EntityTable = HashMap<EntityId, JsonValue>;

/// Result of normalizing one page of raw items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    /// Entity tables keyed by type
    pub entities: HashMap<EntityType, EntityTable>,
    /// Ids of the top-level items, in page order
    pub result_ids: Vec<EntityId>,
}

impl NormalizedPage {
    /// Create an empty normalized page
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for an entity type, if any entities of it were seen
    pub fn table(&self, entity_type: EntityType) -> Option<&EntityTable> {
        self.entities.get(&entity_type)
    }

    /// Total number of entities across all tables
    pub fn entity_count(&self) -> usize {
        self.entities.values().map(HashMap::len).sum()
    }

    /// True when no entities and no result ids were produced
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.result_ids.is_empty()
    }

    /// Insert an entity, merging object fields when the id was already seen
    pub(crate) fn insert_entity(&mut self, entity_type: EntityType, id: EntityId, value: JsonValue) {
        let table = self.entities.entry(entity_type).or_default();
        match table.get_mut(&id) {
            Some(existing) => merge_object_fields(existing, value),
            None => {
                table.insert(id, value);
            }
        }
    }
}

/// Field-wise merge of two JSON values; non-objects replace wholesale
pub(crate) fn merge_object_fields(existing: &mut JsonValue, incoming: JsonValue) {
    match (existing, incoming) {
        (JsonValue::Object(base), JsonValue::Object(update)) => {
            for (key, value) in update {
                base.insert(key, value);
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Schema-specific transform applied to raw items before normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreTransform {
    /// Items are normalized as-is
    #[default]
    None,
    /// Keep only track-origin activity items and unwrap the embedded track
    ///
    /// Activity feed items wrap the actual entity in an `origin` field and
    /// carry a `type` such as `track`, `track-repost` or `track-sharing`.
    TrackOrigins,
}

impl PreTransform {
    /// Apply the transform, leaving the input untouched
    pub fn apply(self, items: &[JsonValue]) -> Vec<JsonValue> {
        match self {
            Self::None => items.to_vec(),
            Self::TrackOrigins => items
                .iter()
                .filter(|item| is_track_activity(item))
                .filter_map(|item| item.get("origin").cloned())
                .collect(),
        }
    }
}

/// Check whether an activity item originates from a track
fn is_track_activity(item: &JsonValue) -> bool {
    item.get("type")
        .and_then(JsonValue::as_str)
        .is_some_and(|t| t.starts_with("track"))
}
