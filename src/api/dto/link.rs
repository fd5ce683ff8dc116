//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

use crate::domain::entities::{Link, LinkSummary};

/// Request body for `POST /api/links`.
///
/// Empty strings for `customAlias` and `expiresAt` mean "not provided".
/// `expiresAt` is kept as text here and parsed by the handler so that a bad
/// date yields a specific message rather than a generic body rejection.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub original_url: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub custom_alias: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_url: link.short_url,
            custom_alias: link.custom_alias,
            expires_at: link.expires_at,
            created_at: link.created_at,
            user_id: link.user_id,
        }
    }
}

/// A listed link with its click count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkListItem {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub click_count: i64,
}

impl From<LinkSummary> for LinkListItem {
    fn from(summary: LinkSummary) -> Self {
        Self {
            link: summary.link.into(),
            click_count: summary.click_count,
        }
    }
}

/// Response body for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkListItem>,
    pub total: i64,
    pub pages: i64,
}
