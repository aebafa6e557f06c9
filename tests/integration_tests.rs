//! End-to-end tests against a mock collection API

use soundgraph::{EntityType, FlightKey, RequestClass, SyncConfig, SyncEngine};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_favorites(server: &MockServer, owner: u64, tracks: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{owner}/favorites")))
        .and(query_param("oauth_token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": tracks,
            "next_href": null
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Two followings pages, three followed users, one favorites fan-out each.
#[tokio::test]
async fn full_traversal_drains_collection_and_fans_out() {
    let server = MockServer::start().await;

    // Page 1: two users, continuation cursor with the default page size
    Mock::given(method("GET"))
        .and(path("/me/followings"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [
                {"id": 1, "username": "alice"},
                {"id": 2, "username": "bob"}
            ],
            "next_href": format!("{}/me/followings?page_size=20&offset=2", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Page 2: one user, end of collection; must arrive with the bulk size
    Mock::given(method("GET"))
        .and(path("/me/followings"))
        .and(query_param("page_size", "199"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [{"id": 3, "username": "carol"}],
            "next_href": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_favorites(&server, 1, json!([{"id": 101, "title": "one"}])).await;
    mount_favorites(&server, 2, json!([])).await;
    mount_favorites(&server, 3, json!([{"id": 103, "title": "three"}])).await;

    let config = SyncConfig::new(server.uri(), "test-token").unwrap();
    let engine = SyncEngine::new(config);

    let report = engine.fetch_all_followings_with_favorites().await.unwrap();

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.fan_outs_issued, 3);
    assert!(report.failed_owners.is_empty());
    assert!(!report.truncated);
    assert!(report.is_complete());

    let store = engine.store();

    // Result list in page order, cursor drained
    assert_eq!(
        store.entities().result_ids(RequestClass::Followings).await,
        vec![1, 2, 3]
    );
    assert!(store
        .cursors()
        .get(FlightKey::new(RequestClass::Followings))
        .await
        .is_none());

    // Exactly the three followed users in the entity tables
    assert_eq!(store.entities().entity_count(EntityType::User).await, 3);
    assert_eq!(
        store.entities().entity(EntityType::User, 3).await.unwrap()["username"],
        "carol"
    );

    // One favorites sub-collection per followed user, empty page included
    assert_eq!(store.entities().favorites_of(1).await, Some(vec![101]));
    assert_eq!(store.entities().favorites_of(2).await, Some(vec![]));
    assert_eq!(store.entities().favorites_of(3).await, Some(vec![103]));
    assert_eq!(store.entities().entity_count(EntityType::Track).await, 2);
}

/// Session-level classes coexist in one store without interfering.
#[tokio::test]
async fn independent_classes_share_one_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/followers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [{"id": 8, "username": "dora"}],
            "next_href": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/me/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [
                {"type": "track", "origin": {"id": 30, "title": "t", "user": {"id": 8, "username": "dora"}}},
                {"type": "comment"}
            ],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let config = SyncConfig::new(server.uri(), "test-token").unwrap();
    let engine = SyncEngine::new(config);

    let (followers, activities) = tokio::join!(
        engine.fetch_followers(None),
        engine.fetch_activities(None)
    );
    assert!(followers.unwrap().is_completed());
    assert!(activities.unwrap().is_completed());

    let store = engine.store();
    assert_eq!(
        store.entities().result_ids(RequestClass::Followers).await,
        vec![8]
    );
    assert_eq!(
        store.entities().result_ids(RequestClass::Activities).await,
        vec![30]
    );

    // The activity track's uploader was lifted into the user table and
    // deduplicated against the followers record
    assert_eq!(store.entities().entity_count(EntityType::User).await, 1);
    let track = store.entities().entity(EntityType::Track, 30).await.unwrap();
    assert_eq!(track["user"], json!(8));
}

/// A broken favorites endpoint is retried on the next traversal.
#[tokio::test]
async fn failed_fan_out_retried_on_next_traversal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/followings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [{"id": 1, "username": "alice"}],
            "next_href": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/1/favorites"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/1/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [{"id": 101, "title": "one"}],
            "next_href": null
        })))
        .mount(&server)
        .await;

    let config = SyncConfig::new(server.uri(), "test-token").unwrap();
    let engine = SyncEngine::new(config);

    let first = engine.fetch_all_followings_with_favorites().await.unwrap();
    assert_eq!(first.failed_owners, vec![1]);
    assert!(!engine.store().entities().has_favorites_of(1).await);

    let second = engine.fetch_all_followings_with_favorites().await.unwrap();
    assert!(second.failed_owners.is_empty());
    assert_eq!(
        engine.store().entities().favorites_of(1).await,
        Some(vec![101])
    );
}
