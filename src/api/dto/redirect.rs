//! DTO for the JSON lookup endpoint.

use serde::Serialize;

/// Response body for `GET /api/links/{short_code}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalUrlResponse {
    pub original_url: String,
}
