//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::NewClick;

/// Request metadata captured at resolution time.
///
/// All fields are optional: any of them may be missing from the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// `Sec-CH-UA-Platform` hint.
    pub device: Option<String>,
    /// `Sec-CH-UA` hint.
    pub browser: Option<String>,
}

/// An in-memory click waiting to be persisted.
///
/// Handlers build one per successful resolution and hand it to
/// [`crate::domain::click_recorder::ClickRecorder`]; the background worker
/// turns it into a [`NewClick`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub client: ClientInfo,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(link_id: i64, client: ClientInfo, clicked_at: DateTime<Utc>) -> Self {
        Self {
            link_id,
            client,
            clicked_at,
        }
    }

    pub fn to_new_click(&self) -> NewClick {
        NewClick {
            link_id: self.link_id,
            ip: self.client.ip.clone(),
            user_agent: self.client.user_agent.clone(),
            device: self.client.device.clone(),
            browser: self.client.browser.clone(),
            created_at: self.clicked_at,
        }
    }
}
