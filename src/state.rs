//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, AuthService, JwtSettings, LinkService};
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::clock::Clock;
use crate::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use crate::infrastructure::Repositories;
use crate::infrastructure::cache::CacheService;

/// Services and handles shared across requests.
///
/// Cloned per request by Axum; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkRepository, dyn ClickRepository>>,
    pub auth_service: Arc<AuthService<dyn UserRepository>>,
    pub cache: Arc<dyn CacheService>,
    pub click_recorder: ClickRecorder,
    /// Read the client address from proxy headers instead of the socket.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services over `repositories`.
    ///
    /// All services share `clock`, so expiry validation at creation and at
    /// resolution agree.
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        click_recorder: ClickRecorder,
        clock: Arc<dyn Clock>,
        jwt: JwtSettings,
        behind_proxy: bool,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            repositories.links.clone(),
            cache.clone(),
            click_recorder.clone(),
            clock.clone(),
        ));
        let analytics_service = Arc::new(AnalyticsService::new(
            repositories.links,
            repositories.clicks,
        ));
        let auth_service = Arc::new(AuthService::new(repositories.users, jwt, clock));

        Self {
            link_service,
            analytics_service,
            auth_service,
            cache,
            click_recorder,
            behind_proxy,
        }
    }
}
