//! Click entity representing a single successful resolution.

use chrono::{DateTime, Utc};

/// A click recorded when a short link is resolved.
///
/// `device` and `browser` are client hints copied verbatim from
/// `Sec-CH-UA-Platform` and `Sec-CH-UA`. They are free-form and unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a click.
///
/// `created_at` is the moment the link was resolved, not the moment the
/// background worker got around to persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub created_at: DateTime<Utc>,
}
