//! Per-class request descriptors and URL construction

use crate::normalize::PreTransform;
use crate::types::{EntityId, EntityType, RequestClass};

/// Everything the fetch path needs to know about one request class
#[derive(Debug, Clone, Copy)]
pub struct RequestSpec {
    /// Endpoint path with default query parameters
    pub path: &'static str,
    /// Schema the page collection normalizes against
    pub entity_type: EntityType,
    /// Transform applied to raw items before normalization
    pub pre_transform: PreTransform,
}

impl RequestClass {
    /// Look up the request descriptor for this class
    pub fn spec(self) -> RequestSpec {
        match self {
            Self::Followings => RequestSpec {
                path: "followings?limit=20&offset=0",
                entity_type: EntityType::User,
                pre_transform: PreTransform::None,
            },
            Self::Followers => RequestSpec {
                path: "followers?limit=20&offset=0",
                entity_type: EntityType::User,
                pre_transform: PreTransform::None,
            },
            Self::Favorites => RequestSpec {
                path: "favorites?linked_partitioning=1&limit=20&offset=0",
                entity_type: EntityType::Track,
                pre_transform: PreTransform::None,
            },
            Self::Activities => RequestSpec {
                path: "activities?limit=20&offset=0",
                entity_type: EntityType::Track,
                pre_transform: PreTransform::TrackOrigins,
            },
            Self::FavoritesOfFollowing => RequestSpec {
                path: "favorites?linked_partitioning=1&limit=200&offset=0",
                entity_type: EntityType::Track,
                pre_transform: PreTransform::None,
            },
        }
    }
}

/// Build the request URL for one page fetch
///
/// An explicit continuation cursor already encodes all query state and is
/// returned verbatim. Otherwise the URL is the owner-scoped resource path
/// with the access credential appended; the default paths always carry a
/// query string, so the credential joins with `&`.
pub fn resolve_url(
    api_base: &str,
    oauth_token: &str,
    owner: Option<EntityId>,
    explicit_cursor: Option<&str>,
    default_path: &str,
) -> String {
    if let Some(cursor) = explicit_cursor {
        return cursor.to_string();
    }

    let base = api_base.trim_end_matches('/');
    match owner {
        Some(id) => format!("{base}/users/{id}/{default_path}&oauth_token={oauth_token}"),
        None => format!("{base}/me/{default_path}&oauth_token={oauth_token}"),
    }
}

/// Rewrite the page-size parameter of a stored cursor for bulk traversal
///
/// Plain substring substitution on the first occurrence; a cursor without
/// the default-size parameter is returned unchanged.
pub fn rewrite_page_size(cursor: &str, default_size: u32, bulk_size: u32) -> String {
    cursor.replacen(
        &format!("page_size={default_size}"),
        &format!("page_size={bulk_size}"),
        1,
    )
}
