//! Common types used throughout soundgraph
//!
//! This module contains shared type definitions, type aliases,
//! and the wire shape of a paginated collection response.

use serde::Deserialize;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Numeric entity identifier (the API keys users and tracks by integer id)
pub type EntityId = u64;

// ============================================================================
// Request Class
// ============================================================================

/// Identifies which in-flight/cursor slot a fetch occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestClass {
    /// Users the session user follows
    Followings,
    /// Users following the session user
    Followers,
    /// Tracks the session user favorited
    Favorites,
    /// Activity feed of the session user
    Activities,
    /// Favorites of one followed user (keyed additionally by owner id)
    FavoritesOfFollowing,
}

impl RequestClass {
    /// Stable name, used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Followings => "followings",
            Self::Followers => "followers",
            Self::Favorites => "favorites",
            Self::Activities => "activities",
            Self::FavoritesOfFollowing => "favorites_of_following",
        }
    }

    /// Whether fetches of this class are keyed by an owning user
    pub fn is_per_owner(self) -> bool {
        matches!(self, Self::FavoritesOfFollowing)
    }
}

impl fmt::Display for RequestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Entity Type
// ============================================================================

/// The normalization schema an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// A user profile
    User,
    /// An uploaded track
    Track,
}

impl EntityType {
    /// Stable name, used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Track => "tracks",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Flight Key
// ============================================================================

/// Slot key for the single-flight registry and the cursor store
///
/// Most classes occupy one process-wide slot; per-owner classes get one
/// slot per owning user so sibling fan-out fetches do not block each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlightKey {
    /// The request class
    pub class: RequestClass,
    /// Owning user for per-owner classes
    pub owner: Option<EntityId>,
}

impl FlightKey {
    /// Key for a session-level request class
    pub fn new(class: RequestClass) -> Self {
        Self { class, owner: None }
    }

    /// Key for a per-owner request class
    pub fn for_owner(class: RequestClass, owner: EntityId) -> Self {
        Self {
            class,
            owner: Some(owner),
        }
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{}:{owner}", self.class),
            None => write!(f, "{}", self.class),
        }
    }
}

// ============================================================================
// Raw Collection Page
// ============================================================================

/// One page of a paginated collection response, as sent by the server
#[derive(Debug, Clone, Deserialize)]
pub struct RawCollectionPage {
    /// Raw item objects in page order
    #[serde(default)]
    pub collection: Vec<JsonValue>,
    /// Continuation URL; absent or null signals end of collection
    #[serde(default)]
    pub next_href: Option<String>,
}
