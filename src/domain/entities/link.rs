//! Link entity representing a short code mapped to a long URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL owned by a user.
///
/// `short_url` is the globally unique code used in `/{code}`. When the owner
/// picked the code themselves, `custom_alias` holds the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

impl Link {
    /// Returns true if `now` is strictly after the link's expiry.
    ///
    /// Links without `expires_at` never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Snapshot of the fields the redirect path needs.
    pub fn to_resolved(&self) -> ResolvedLink {
        ResolvedLink {
            link_id: self.id,
            original_url: self.original_url.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_id: i64,
}

/// A link together with the number of clicks recorded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSummary {
    pub link: Link,
    pub click_count: i64,
}

/// The part of a link the resolver works with.
///
/// This is what gets cached, so it keeps `expires_at`: a cached entry must be
/// subject to the same expiry check as one read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub link_id: i64,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ResolvedLink {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}
