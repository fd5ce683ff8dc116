//! Per-link click analytics.

use std::sync::Arc;

use serde_json::json;

use crate::domain::analytics::AnalyticsReport;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Service computing click analytics for a link's owner.
pub struct AnalyticsService<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L: LinkRepository + ?Sized, C: ClickRepository + ?Sized> AnalyticsService<L, C> {
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Aggregates the clicks of `link_id` for its owner.
    ///
    /// A link owned by someone else is reported exactly like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is not
    /// owned by `user_id`.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn link_analytics(
        &self,
        user_id: i64,
        link_id: i64,
    ) -> Result<AnalyticsReport, AppError> {
        let link = self
            .link_repository
            .find_owned(link_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "link_id": link_id })))?;

        let clicks = self.click_repository.find_by_link(link.id).await?;

        Ok(AnalyticsReport::from_clicks(&clicks))
    }
}
