//! Tests for the normalize module

use super::*;
use crate::types::{EntityType, JsonValue};
use pretty_assertions::assert_eq;
use serde_json::json;

fn users(raw: JsonValue) -> Vec<JsonValue> {
    raw.as_array().unwrap().clone()
}

#[test]
fn test_normalize_empty_input_identity() {
    let page = normalize(&[], EntityType::User, PreTransform::None);
    assert!(page.is_empty());
    assert!(page.result_ids.is_empty());
    assert!(page.entities.is_empty());
}

#[test]
fn test_normalize_users_preserves_order() {
    let items = users(json!([
        {"id": 3, "username": "carol"},
        {"id": 1, "username": "alice"},
        {"id": 2, "username": "bob"}
    ]));

    let page = normalize(&items, EntityType::User, PreTransform::None);

    assert_eq!(page.result_ids, vec![3, 1, 2]);
    let table = page.table(EntityType::User).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[&1]["username"], "alice");
}

#[test]
fn test_normalize_skips_items_without_numeric_id() {
    let items = users(json!([
        {"id": 1},
        {"username": "no-id"},
        {"id": "not-a-number"},
        {"id": 2}
    ]));

    let page = normalize(&items, EntityType::User, PreTransform::None);

    assert_eq!(page.result_ids, vec![1, 2]);
    assert_eq!(page.table(EntityType::User).unwrap().len(), 2);
}

#[test]
fn test_normalize_does_not_mutate_input() {
    let items = users(json!([
        {"id": 10, "title": "song", "user": {"id": 5, "username": "alice"}}
    ]));
    let before = items.clone();

    let _ = normalize(&items, EntityType::Track, PreTransform::None);

    assert_eq!(items, before);
}

#[test]
fn test_normalize_tracks_lifts_uploader() {
    let items = users(json!([
        {"id": 10, "title": "first", "user": {"id": 5, "username": "alice"}},
        {"id": 11, "title": "second", "user": {"id": 5, "username": "alice"}}
    ]));

    let page = normalize(&items, EntityType::Track, PreTransform::None);

    assert_eq!(page.result_ids, vec![10, 11]);

    let tracks = page.table(EntityType::Track).unwrap();
    // Uploader replaced by id reference, not an embedded copy
    assert_eq!(tracks[&10]["user"], json!(5));
    assert_eq!(tracks[&11]["user"], json!(5));

    // Exactly one copy of the shared uploader
    let users = page.table(EntityType::User).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[&5]["username"], "alice");
}

#[test]
fn test_normalize_track_without_uploader() {
    let items = users(json!([{"id": 10, "title": "orphan"}]));

    let page = normalize(&items, EntityType::Track, PreTransform::None);

    assert_eq!(page.result_ids, vec![10]);
    assert!(page.table(EntityType::User).is_none());
}

#[test]
fn test_normalize_duplicate_ids_merge_fields() {
    let items = users(json!([
        {"id": 1, "username": "alice", "city": "berlin"},
        {"id": 1, "username": "alice2"}
    ]));

    let page = normalize(&items, EntityType::User, PreTransform::None);

    // Both occurrences land in the result list, table holds the merged record
    assert_eq!(page.result_ids, vec![1, 1]);
    let table = page.table(EntityType::User).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[&1]["username"], "alice2");
    assert_eq!(table[&1]["city"], "berlin");
}

#[test]
fn test_pre_transform_track_origins() {
    let items = users(json!([
        {"type": "track", "origin": {"id": 20, "title": "a"}},
        {"type": "playlist", "origin": {"id": 99, "title": "skipped"}},
        {"type": "track-repost", "origin": {"id": 21, "title": "b"}},
        {"type": "comment"},
        {"origin": {"id": 98}}
    ]));

    let page = normalize(&items, EntityType::Track, PreTransform::TrackOrigins);

    assert_eq!(page.result_ids, vec![20, 21]);
    let tracks = page.table(EntityType::Track).unwrap();
    assert_eq!(tracks[&20]["title"], "a");
    assert_eq!(tracks[&21]["title"], "b");
    assert!(!tracks.contains_key(&99));
}

#[test]
fn test_pre_transform_none_is_identity() {
    let items = users(json!([{"id": 1}, {"id": 2}]));
    assert_eq!(PreTransform::None.apply(&items), items);
}

#[test]
fn test_pre_transform_track_origins_empty() {
    assert!(PreTransform::TrackOrigins.apply(&[]).is_empty());
}

#[test]
fn test_entity_count() {
    let items = users(json!([
        {"id": 10, "user": {"id": 5}},
        {"id": 11, "user": {"id": 6}}
    ]));

    let page = normalize(&items, EntityType::Track, PreTransform::None);
    assert_eq!(page.entity_count(), 4);
}
