#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use link_shortener::application::services::JwtSettings;
use link_shortener::application::services::auth_service::hash_password;
use link_shortener::domain::click_event::ClickEvent;
use link_shortener::domain::click_recorder::ClickRecorder;
use link_shortener::domain::clock::{Clock, ManualClock};
use link_shortener::domain::entities::{Link, NewClick, NewLink, NewUser, User};
use link_shortener::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use link_shortener::infrastructure::Repositories;
use link_shortener::infrastructure::cache::NullCache;
use link_shortener::infrastructure::memory::MemoryStore;
use link_shortener::routes::api_router;
use link_shortener::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_PASSWORD: &str = "Test123";

/// Inserts a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A router over an in-memory store with a controllable clock.
///
/// The click worker is not running; queued clicks stay in `clicks`.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: MemoryStore,
    pub clock: Arc<ManualClock>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: TEST_SECRET.to_string(),
        ttl: Duration::from_secs(86_400),
    }
}

pub fn test_app() -> TestApp {
    test_app_with(false)
}

pub fn test_app_with(behind_proxy: bool) -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = MemoryStore::with_clock(clock.clone());
    let (click_recorder, clicks) = ClickRecorder::channel(100);

    let state = AppState::new(
        Repositories::in_memory(store.clone()),
        Arc::new(NullCache::new()),
        click_recorder,
        clock.clone(),
        jwt_settings(),
        behind_proxy,
    );

    let app = api_router(state.clone()).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        state,
        store,
        clock,
        clicks,
    }
}

impl TestApp {
    pub async fn create_user(&self, email: &str) -> User {
        UserRepository::create(
            &self.store,
            NewUser {
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
            },
        )
        .await
        .unwrap()
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.auth_service.issue_token(user.id).unwrap()
    }

    /// Creates a user and returns it with a valid token.
    pub async fn login_as(&self, email: &str) -> (User, String) {
        let user = self.create_user(email).await;
        let token = self.token_for(&user);
        (user, token)
    }

    pub async fn create_link(
        &self,
        user: &User,
        short_url: &str,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Link {
        LinkRepository::create(
            &self.store,
            NewLink {
                original_url: original_url.to_string(),
                short_url: short_url.to_string(),
                custom_alias: None,
                expires_at,
                user_id: user.id,
            },
        )
        .await
        .unwrap()
    }

    pub async fn add_click(
        &self,
        link: &Link,
        device: Option<&str>,
        browser: Option<&str>,
        at: DateTime<Utc>,
    ) {
        self.store
            .record(NewClick {
                link_id: link.id,
                ip: Some("127.0.0.1".to_string()),
                user_agent: None,
                device: device.map(str::to_string),
                browser: browser.map(str::to_string),
                created_at: at,
            })
            .await
            .unwrap();
    }
}
