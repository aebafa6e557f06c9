//! The normalizer
//!
//! Converts a raw page collection into [`NormalizedPage`] tables.

use super::types::{NormalizedPage, PreTransform};
use crate::types::{EntityId, EntityType, JsonValue};
use tracing::debug;

/// Normalize a page of raw items against an entity schema
///
/// Items lacking a numeric `id` are skipped. For track items the embedded
/// `user` object is lifted into the user table and replaced by its id, so
/// the uploader exists exactly once regardless of how many of their tracks
/// appear on the page. The input is never mutated.
pub fn normalize(
    items: &[JsonValue],
    entity_type: EntityType,
    pre_transform: PreTransform,
) -> NormalizedPage {
    let items = pre_transform.apply(items);
    let mut page = NormalizedPage::new();

    for mut item in items {
        let Some(id) = entity_id(&item) else {
            debug!(%entity_type, "skipping item without numeric id");
            continue;
        };

        if entity_type == EntityType::Track {
            lift_uploader(&mut item, &mut page);
        }

        page.insert_entity(entity_type, id, item);
        page.result_ids.push(id);
    }

    page
}

/// Extract the numeric id of a raw item
fn entity_id(item: &JsonValue) -> Option<EntityId> {
    item.get("id").and_then(JsonValue::as_u64)
}

/// Replace a track's embedded `user` object with an id reference
///
/// The lifted user lands in the page's user table; tracks missing an
/// embedded uploader (or carrying one without an id) are left as-is.
fn lift_uploader(track: &mut JsonValue, page: &mut NormalizedPage) {
    let Some(user) = track.get("user") else {
        return;
    };
    let Some(user_id) = entity_id(user) else {
        return;
    };

    let user = user.clone();
    page.insert_entity(EntityType::User, user_id, user);

    if let Some(slot) = track.get_mut("user") {
        *slot = JsonValue::from(user_id);
    }
}
