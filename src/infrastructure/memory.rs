//! In-process repository implementations.
//!
//! [`MemoryStore`] implements every repository trait over a single
//! `RwLock`-guarded state, mirroring the relational constraints of the
//! PostgreSQL schema: unique emails, unique short codes and referential
//! checks for links and clicks. Uniqueness checks and inserts happen under the
//! same write lock, so concurrent creations of one short code cannot both
//! succeed.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{Click, Link, LinkSummary, NewClick, NewLink, NewUser, User};
use crate::domain::repositories::{ClickRepository, LinkFilter, LinkRepository, UserRepository};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    links: Vec<Link>,
    clicks: Vec<Click>,
    short_urls: HashMap<String, i64>,
    next_user_id: i64,
    next_link_id: i64,
    next_click_id: i64,
}

impl Inner {
    fn click_count(&self, link_id: i64) -> i64 {
        self.clicks.iter().filter(|c| c.link_id == link_id).count() as i64
    }
}

/// Shared in-memory store.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store that stamps `created_at` from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "email": new_user.email }),
            ));
        }

        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: self.clock.now(),
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.clone())
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.write().await;

        if !inner.users.iter().any(|u| u.id == new_link.user_id) {
            return Err(AppError::bad_request(
                "Referenced record does not exist",
                json!({ "constraint": "links_user_id_fkey" }),
            ));
        }

        if inner.short_urls.contains_key(&new_link.short_url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_short_url_key" }),
            ));
        }

        inner.next_link_id += 1;
        let link = Link {
            id: inner.next_link_id,
            original_url: new_link.original_url,
            short_url: new_link.short_url,
            custom_alias: new_link.custom_alias,
            expires_at: new_link.expires_at,
            created_at: self.clock.now(),
            user_id: new_link.user_id,
        };
        inner.short_urls.insert(link.short_url.clone(), link.id);
        inner.links.push(link.clone());

        Ok(link)
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .links
            .iter()
            .find(|l| l.short_url == short_url)
            .cloned())
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .links
            .iter()
            .find(|l| l.id == id && l.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        filter: LinkFilter,
    ) -> Result<Vec<LinkSummary>, AppError> {
        let inner = self.inner.read().await;

        let mut links: Vec<&Link> = inner
            .links
            .iter()
            .filter(|l| l.user_id == user_id && filter.matches(l))
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .map(|l| LinkSummary {
                link: l.clone(),
                click_count: inner.click_count(l.id),
            })
            .collect())
    }

    async fn count_for_user(&self, user_id: i64, search: &str) -> Result<i64, AppError> {
        let inner = self.inner.read().await;
        let filter = LinkFilter::new(0, 0).with_search(search);

        Ok(inner
            .links
            .iter()
            .filter(|l| l.user_id == user_id && filter.matches(l))
            .count() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut inner = self.inner.write().await;

        if !inner.links.iter().any(|l| l.id == new_click.link_id) {
            return Err(AppError::bad_request(
                "Referenced record does not exist",
                json!({ "constraint": "clicks_link_id_fkey" }),
            ));
        }

        inner.next_click_id += 1;
        let click = Click {
            id: inner.next_click_id,
            link_id: new_click.link_id,
            ip: new_click.ip,
            user_agent: new_click.user_agent,
            device: new_click.device,
            browser: new_click.browser,
            created_at: new_click.created_at,
        };
        inner.clicks.push(click.clone());

        Ok(click)
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let inner = self.inner.read().await;

        let mut clicks: Vec<Click> = inner
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(clicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use chrono::{Duration, Utc};

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = UserRepository::create(
            &store,
            NewUser {
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();
        (store, user)
    }

    fn new_link(short_url: &str, user_id: i64) -> NewLink {
        NewLink {
            original_url: format!("https://example.com/{short_url}"),
            short_url: short_url.to_string(),
            custom_alias: None,
            expires_at: None,
            user_id,
        }
    }

    fn new_click(link_id: i64) -> NewClick {
        NewClick {
            link_id,
            ip: None,
            user_agent: None,
            device: None,
            browser: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (store, user) = store_with_user().await;

        let err = UserRepository::create(
            &store,
            NewUser {
                email: user.email.clone(),
                password_hash: "other".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_short_url_conflicts() {
        let (store, user) = store_with_user().await;

        LinkRepository::create(&store, new_link("foo", user.id))
            .await
            .unwrap();
        let err = LinkRepository::create(&store, new_link("foo", user.id))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_link_requires_existing_owner() {
        let store = MemoryStore::new();

        let err = LinkRepository::create(&store, new_link("foo", 99))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_click_requires_existing_link() {
        let store = MemoryStore::new();

        let err = store.record(new_click(1)).await.unwrap_err();

        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_counts() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = MemoryStore::with_clock(clock.clone());
        let user = UserRepository::create(
            &store,
            NewUser {
                email: "a@example.com".to_string(),
                password_hash: "h".to_string(),
            },
        )
        .await
        .unwrap();

        let first = LinkRepository::create(&store, new_link("first", user.id))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
        LinkRepository::create(&store, new_link("second", user.id))
            .await
            .unwrap();

        store.record(new_click(first.id)).await.unwrap();
        store.record(new_click(first.id)).await.unwrap();

        let page = store
            .list_for_user(user.id, LinkFilter::new(0, 10))
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].link.short_url, "second");
        assert_eq!(page[0].click_count, 0);
        assert_eq!(page[1].link.short_url, "first");
        assert_eq!(page[1].click_count, 2);
    }

    #[tokio::test]
    async fn test_list_paginates_and_filters() {
        let (store, user) = store_with_user().await;
        for code in ["alpha", "beta", "gamma", "alphabet"] {
            LinkRepository::create(&store, new_link(code, user.id))
                .await
                .unwrap();
        }

        let filtered = store
            .list_for_user(user.id, LinkFilter::new(0, 10).with_search("alpha"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(store.count_for_user(user.id, "alpha").await.unwrap(), 2);

        let second_page = store
            .list_for_user(user.id, LinkFilter::new(2, 2))
            .await
            .unwrap();
        assert_eq!(second_page.len(), 2);
        assert_eq!(store.count_for_user(user.id, "").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_only_returns_own_links() {
        let (store, user) = store_with_user().await;
        let other = UserRepository::create(
            &store,
            NewUser {
                email: "other@example.com".to_string(),
                password_hash: "h".to_string(),
            },
        )
        .await
        .unwrap();

        let link = LinkRepository::create(&store, new_link("mine", user.id))
            .await
            .unwrap();

        assert!(store.find_owned(link.id, other.id).await.unwrap().is_none());
        assert!(store.find_owned(link.id, user.id).await.unwrap().is_some());
        assert_eq!(store.count_for_user(other.id, "").await.unwrap(), 0);
    }
}
