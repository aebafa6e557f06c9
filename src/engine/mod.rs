//! Sync engine
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - guarded fetch, normalize and merge of collection pages
//! - `SyncConfig` - session configuration
//! - `TraversalReport` / `SyncStats` - traversal and session accounting
//!
//! One page fetch moves through guard acquisition, transport, normalization
//! and merge in that order; the cursor for the request's slot only advances
//! after the merge, so a failed page never leaves a half-applied state.

mod types;

pub use types::{FetchOutcome, SyncConfig, SyncStats, TraversalReport};

use crate::error::Result;
use crate::http::HttpClient;
use crate::normalize::normalize;
use crate::resource::{resolve_url, rewrite_page_size};
use crate::store::SyncStore;
use crate::types::{EntityId, FlightKey, RawCollectionPage, RequestClass};
use futures::future::join_all;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Sync engine for one session against the collection API
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// Session state
    store: SyncStore,
    /// Session configuration
    config: SyncConfig,
    /// Statistics
    stats: Mutex<SyncStats>,
}

impl SyncEngine {
    /// Create a new sync engine with its own store
    pub fn new(config: SyncConfig) -> Self {
        Self::with_store(config, SyncStore::new())
    }

    /// Create a sync engine sharing an existing store
    pub fn with_store(config: SyncConfig, store: SyncStore) -> Self {
        Self {
            client: HttpClient::new(),
            store,
            config,
            stats: Mutex::new(SyncStats::new()),
        }
    }

    /// Replace the HTTP client
    #[must_use]
    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    /// The session state
    pub fn store(&self) -> &SyncStore {
        &self.store
    }

    /// Snapshot of the session statistics
    pub fn stats(&self) -> SyncStats {
        self.stats.lock().expect("stats lock poisoned").clone()
    }

    // ============================================================================
    // Collection fetch operation
    // ============================================================================

    /// Fetch, normalize and merge one collection page
    ///
    /// Skips (without error) when a request for the same slot is already in
    /// flight and the override is not set. On transport or decode failure the
    /// error propagates to the caller and the slot is released; the cursor
    /// only advances after a successful merge.
    pub async fn fetch_page(
        &self,
        class: RequestClass,
        owner: Option<EntityId>,
        explicit_cursor: Option<String>,
        override_in_flight: bool,
    ) -> Result<FetchOutcome> {
        let key = match owner {
            Some(owner) => FlightKey::for_owner(class, owner),
            None => FlightKey::new(class),
        };

        let Some(_guard) = self.store.in_flight().try_acquire(key, override_in_flight) else {
            return Ok(FetchOutcome::Skipped);
        };

        let spec = class.spec();
        let url = resolve_url(
            &self.config.api_base,
            &self.config.oauth_token,
            owner,
            explicit_cursor.as_deref(),
            spec.path,
        );

        let page: RawCollectionPage = self.client.get_json(&url).await?;

        let normalized = normalize(&page.collection, spec.entity_type, spec.pre_transform);
        self.store.entities().merge_entities(&normalized).await;
        match owner.filter(|_| class.is_per_owner()) {
            Some(owner) => {
                self.store
                    .entities()
                    .merge_favorites_of(owner, &normalized.result_ids)
                    .await;
            }
            None => {
                self.store
                    .entities()
                    .merge_results(class, &normalized.result_ids)
                    .await;
            }
        }

        self.store.cursors().set(key, page.next_href.clone()).await;

        self.stats
            .lock()
            .expect("stats lock poisoned")
            .add_page(normalized.result_ids.len());
        debug!(
            %key,
            records = normalized.result_ids.len(),
            has_next = page.next_href.is_some(),
            "page merged"
        );

        Ok(FetchOutcome::Completed)
    }

    // ============================================================================
    // Per-class one-shot fetches
    // ============================================================================

    /// Fetch one page of the session user's followings
    pub async fn fetch_followings(
        &self,
        cursor: Option<String>,
        override_in_flight: bool,
    ) -> Result<FetchOutcome> {
        self.fetch_page(RequestClass::Followings, None, cursor, override_in_flight)
            .await
    }

    /// Fetch one page of the session user's followers
    pub async fn fetch_followers(&self, cursor: Option<String>) -> Result<FetchOutcome> {
        self.fetch_page(RequestClass::Followers, None, cursor, false)
            .await
    }

    /// Fetch one page of the session user's favorites
    pub async fn fetch_favorites(&self, cursor: Option<String>) -> Result<FetchOutcome> {
        self.fetch_page(RequestClass::Favorites, None, cursor, false)
            .await
    }

    /// Fetch one page of the session user's activity feed
    ///
    /// Only track-origin activity items are kept and unwrapped before
    /// normalization.
    pub async fn fetch_activities(&self, cursor: Option<String>) -> Result<FetchOutcome> {
        self.fetch_page(RequestClass::Activities, None, cursor, false)
            .await
    }

    // ============================================================================
    // Full-collection traversal
    // ============================================================================

    /// Fetch all followings pages and each followed user's favorites
    ///
    /// Drives the followings fetch page by page until the server reports no
    /// continuation, fanning out one favorites fetch per followed user that
    /// has none recorded yet. Stored cursors are rewritten to the bulk page
    /// size to cut round-trips. The loop stops early at the configured page
    /// cap; fan-out failures are collected in the report and retried on the
    /// next traversal, they never abort the loop.
    pub async fn fetch_all_followings_with_favorites(&self) -> Result<TraversalReport> {
        let mut report = TraversalReport::default();
        let followings_key = FlightKey::new(RequestClass::Followings);

        loop {
            if report.pages_fetched >= self.config.max_pages {
                warn!(
                    cap = self.config.max_pages,
                    "traversal page cap reached, stopping with cursor pending"
                );
                report.truncated = true;
                break;
            }

            let cursor = self.store.cursors().get(followings_key).await.map(|c| {
                rewrite_page_size(&c, self.config.default_page_size, self.config.bulk_page_size)
            });

            // The override lets the traversal re-enter the followings slot
            // while its own fan-out is still in flight.
            self.fetch_page(RequestClass::Followings, None, cursor, true)
                .await?;
            report.pages_fetched += 1;

            self.fan_out_favorites(&mut report).await;

            if self.store.cursors().get(followings_key).await.is_none() {
                break;
            }
        }

        Ok(report)
    }

    /// Fetch favorites for every followed user not yet covered
    ///
    /// Fan-out fetches run concurrently; each claims its own class+owner
    /// slot, so siblings never block each other.
    async fn fan_out_favorites(&self, report: &mut TraversalReport) {
        let followings = self
            .store
            .entities()
            .result_ids(RequestClass::Followings)
            .await;

        let mut pending = Vec::new();
        for owner in followings {
            if self.store.entities().has_favorites_of(owner).await {
                continue;
            }
            pending.push(async move {
                let outcome = self
                    .fetch_page(RequestClass::FavoritesOfFollowing, Some(owner), None, false)
                    .await;
                (owner, outcome)
            });
        }

        if pending.is_empty() {
            return;
        }

        report.fan_outs_issued += pending.len();
        self.stats
            .lock()
            .expect("stats lock poisoned")
            .add_fan_outs(pending.len());

        for (owner, outcome) in join_all(pending).await {
            if let Err(err) = outcome {
                warn!(owner, error = %err, "favorites fan-out failed");
                report.failed_owners.push(owner);
                self.stats
                    .lock()
                    .expect("stats lock poisoned")
                    .add_fan_out_failure();
            }
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
