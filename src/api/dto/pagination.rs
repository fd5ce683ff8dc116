//! Query parameters for link listing.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// `GET /api/links?page=&limit=&search=`
///
/// Numbers arrive as strings in the query and are parsed with `serde_with`.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListLinksQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[validate(range(min = 1, message = "Page must be greater than 0"))]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    #[serde(default)]
    pub search: Option<String>,
}

impl ListLinksQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}
