//! Engine types
//!
//! Configuration, fetch outcomes and statistics for the sync engine.

use crate::error::{Error, Result};
use crate::types::EntityId;

/// Configuration for a sync session
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the collection API
    pub api_base: String,
    /// Access credential appended to every request URL
    pub oauth_token: String,
    /// Page size the server embeds in default continuation cursors
    pub default_page_size: u32,
    /// Page size the bulk traversal rewrites cursors to
    pub bulk_page_size: u32,
    /// Safety cap on pages fetched by one full-collection traversal
    pub max_pages: usize,
}

impl SyncConfig {
    /// Create a config, validating the API base URL
    pub fn new(api_base: impl Into<String>, oauth_token: impl Into<String>) -> Result<Self> {
        let api_base = api_base.into();
        url::Url::parse(&api_base)?;

        let oauth_token = oauth_token.into();
        if oauth_token.is_empty() {
            return Err(Error::config("oauth_token must not be empty"));
        }

        Ok(Self {
            api_base,
            oauth_token,
            default_page_size: 20,
            bulk_page_size: 199,
            max_pages: 500,
        })
    }

    /// Set the default page size
    #[must_use]
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the bulk traversal page size
    #[must_use]
    pub fn with_bulk_page_size(mut self, size: u32) -> Self {
        self.bulk_page_size = size;
        self
    }

    /// Set the traversal page cap
    #[must_use]
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = max;
        self
    }
}

/// Result of one page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was fetched, normalized and merged
    Completed,
    /// An identical request was in flight; nothing was fetched
    Skipped,
}

impl FetchOutcome {
    /// Check if the fetch ran to completion
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if the fetch was skipped
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Outcome of a full-collection traversal
#[derive(Debug, Clone, Default)]
pub struct TraversalReport {
    /// Followings pages fetched
    pub pages_fetched: usize,
    /// Per-owner favorites fetches issued
    pub fan_outs_issued: usize,
    /// Owners whose favorites fetch failed; they are retried on the next
    /// traversal since no sub-collection was recorded for them
    pub failed_owners: Vec<EntityId>,
    /// True when the traversal stopped at the page cap instead of the
    /// server's end of collection
    pub truncated: bool,
}

impl TraversalReport {
    /// True when every issued fetch succeeded and the collection ended
    pub fn is_complete(&self) -> bool {
        !self.truncated && self.failed_owners.is_empty()
    }
}

/// Statistics from a sync session
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total top-level records merged
    pub records_merged: usize,
    /// Fan-out fetches issued
    pub fan_outs_issued: usize,
    /// Fan-out fetches that failed
    pub fan_out_failures: usize,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and its merged records
    pub fn add_page(&mut self, records: usize) {
        self.pages_fetched += 1;
        self.records_merged += records;
    }

    /// Record issued fan-out fetches
    pub fn add_fan_outs(&mut self, count: usize) {
        self.fan_outs_issued += count;
    }

    /// Record a failed fan-out fetch
    pub fn add_fan_out_failure(&mut self) {
        self.fan_out_failures += 1;
    }
}
