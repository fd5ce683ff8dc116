//! DTO for per-link analytics.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::analytics::AnalyticsReport;

/// Response body for `GET /api/analytics/{link_id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_clicks: i64,
    pub device_breakdown: BTreeMap<String, i64>,
    pub browser_breakdown: BTreeMap<String, i64>,
    /// `YYYY-MM-DD` (UTC) to click count.
    pub clicks_over_time: BTreeMap<String, i64>,
}

impl From<AnalyticsReport> for AnalyticsResponse {
    fn from(report: AnalyticsReport) -> Self {
        Self {
            total_clicks: report.total_clicks,
            device_breakdown: report.device_breakdown,
            browser_breakdown: report.browser_breakdown,
            clicks_over_time: report.clicks_over_time,
        }
    }
}
