//! Click aggregation for the per-link analytics view.

use std::collections::BTreeMap;

use crate::domain::entities::Click;

/// Label used for clicks that carried no device or browser hint.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Aggregated view over a link's clicks.
///
/// Both breakdowns always sum to `total_clicks`. Days are UTC calendar dates
/// formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsReport {
    pub total_clicks: i64,
    pub device_breakdown: BTreeMap<String, i64>,
    pub browser_breakdown: BTreeMap<String, i64>,
    pub clicks_over_time: BTreeMap<String, i64>,
}

impl AnalyticsReport {
    pub fn from_clicks(clicks: &[Click]) -> Self {
        clicks.iter().fold(Self::default(), |mut report, click| {
            report.add(click);
            report
        })
    }

    fn add(&mut self, click: &Click) {
        self.total_clicks += 1;

        *self
            .device_breakdown
            .entry(label_or_unknown(click.device.as_deref()))
            .or_insert(0) += 1;

        *self
            .browser_breakdown
            .entry(label_or_unknown(click.browser.as_deref()))
            .or_insert(0) += 1;

        *self
            .clicks_over_time
            .entry(click.created_at.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
    }
}

// Absent and empty labels both count as `UNKNOWN_LABEL`.
fn label_or_unknown(label: Option<&str>) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    }
}
