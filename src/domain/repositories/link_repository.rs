//! Repository trait for link data access.

use crate::domain::entities::{Link, LinkSummary, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter and window for listing a user's links.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFilter {
    /// Substring matched against `original_url`, `short_url` and `custom_alias`.
    /// Empty matches everything.
    pub search: String,
    pub offset: i64,
    pub limit: i64,
}

impl LinkFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: String::new(),
            offset,
            limit,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Returns true if `link` matches the search term.
    pub fn matches(&self, link: &Link) -> bool {
        self.search.is_empty()
            || link.original_url.contains(&self.search)
            || link.short_url.contains(&self.search)
            || link
                .custom_alias
                .as_deref()
                .is_some_and(|alias| alias.contains(&self.search))
    }
}

/// Repository interface for links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// The uniqueness of `short_url` is enforced atomically by the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `short_url` is already taken.
    /// Returns [`AppError::Validation`] if the owner does not exist.
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id, only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError>;

    /// Lists a user's links, newest first, with their click counts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn list_for_user(
        &self,
        user_id: i64,
        filter: LinkFilter,
    ) -> Result<Vec<LinkSummary>, AppError>;

    /// Counts a user's links matching `search`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn count_for_user(&self, user_id: i64, search: &str) -> Result<i64, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
