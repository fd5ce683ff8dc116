//! Link creation, resolution and listing service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::click_event::{ClickEvent, ClientInfo};
use crate::domain::click_recorder::ClickRecorder;
use crate::domain::clock::Clock;
use crate::domain::entities::{Link, LinkSummary, NewLink, ResolvedLink};
use crate::domain::repositories::{LinkFilter, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_custom_alias};
use crate::utils::url_validator::{UrlValidationError, validate_target_url};

/// Attempts at finding a free generated code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Validated input for [`LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// One page of a user's links.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub links: Vec<LinkSummary>,
    pub total: i64,
    pub pages: i64,
}

/// Service for creating, resolving and listing short links.
///
/// Creation and resolution read the same [`Clock`], so a link's expiry is
/// judged against one time source throughout its life.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    click_recorder: ClickRecorder,
    clock: Arc<dyn Clock>,
}

impl<L: LinkRepository + ?Sized + 'static> LinkService<L> {
    pub fn new(
        link_repository: Arc<L>,
        cache: Arc<dyn CacheService>,
        click_recorder: ClickRecorder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            link_repository,
            cache,
            click_recorder,
            clock,
        }
    }

    /// Creates a short link owned by `user_id`.
    ///
    /// # Code Selection
    ///
    /// - With `custom_alias`: the alias is validated and used as the short code.
    ///   An alias already in use is rejected, including one lost to a
    ///   concurrent insert.
    /// - Without: a random six-character code is generated, retrying on
    ///   collision up to ten times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is missing or invalid, the
    /// alias is malformed, or `expires_at` is not in the future.
    /// Returns [`AppError::Conflict`] if the alias is taken.
    /// Returns [`AppError::Internal`] on store errors or if no free code was found.
    pub async fn create_link(&self, user_id: i64, input: CreateLink) -> Result<Link, AppError> {
        validate_target_url(&input.original_url).map_err(|e| match &e {
            UrlValidationError::Missing => AppError::bad_request(e.to_string(), json!({})),
            UrlValidationError::InvalidFormat(reason) => {
                AppError::bad_request(e.to_string(), json!({ "reason": reason }))
            }
            UrlValidationError::UnsupportedProtocol => {
                AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
            }
        })?;

        if let Some(expires_at) = input.expires_at {
            let now = self.clock.now();
            if expires_at <= now {
                return Err(AppError::bad_request(
                    "Expiration date must be in the future",
                    json!({ "expires_at": expires_at.to_rfc3339() }),
                ));
            }
        }

        match input.custom_alias {
            Some(alias) => {
                self.create_with_alias(user_id, alias, input.original_url, input.expires_at)
                    .await
            }
            None => {
                self.create_with_generated_code(user_id, input.original_url, input.expires_at)
                    .await
            }
        }
    }

    async fn create_with_alias(
        &self,
        user_id: i64,
        alias: String,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        validate_custom_alias(&alias)?;

        let alias_taken = || {
            AppError::conflict(
                "Custom alias is already taken",
                json!({ "alias": alias.clone() }),
            )
        };

        if self
            .link_repository
            .find_by_short_url(&alias)
            .await?
            .is_some()
        {
            return Err(alias_taken());
        }

        let new_link = NewLink {
            original_url,
            short_url: alias.clone(),
            custom_alias: Some(alias.clone()),
            expires_at,
            user_id,
        };

        match self.link_repository.create(new_link).await {
            Err(AppError::Conflict { .. }) => Err(alias_taken()),
            other => other,
        }
    }

    async fn create_with_generated_code(
        &self,
        user_id: i64,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if self
                .link_repository
                .find_by_short_url(&code)
                .await?
                .is_some()
            {
                debug!(code = %code, attempt, "Generated code already in use");
                continue;
            }

            let new_link = NewLink {
                original_url: original_url.clone(),
                short_url: code.clone(),
                custom_alias: None,
                expires_at,
                user_id,
            };

            match self.link_repository.create(new_link).await {
                Err(AppError::Conflict { .. }) => {
                    debug!(code = %code, attempt, "Generated code taken concurrently");
                }
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Resolves a short code to its target.
    ///
    /// Consults the cache first and falls back to the store; on a store hit
    /// the entry is cached in the background for no longer than the link has
    /// left to live. The expiry check runs on every path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Expired`] if the link's expiry has passed.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, short_code: &str) -> Result<ResolvedLink, AppError> {
        let (resolved, _) = self.resolve_at(short_code).await?;
        Ok(resolved)
    }

    /// Resolves a short code and records a click for it.
    ///
    /// The click is handed to the background worker and timestamped with the
    /// instant used for the expiry check. Nothing about recording can fail
    /// the resolution.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve`]; no click is recorded on error.
    pub async fn resolve_and_record(
        &self,
        short_code: &str,
        client: ClientInfo,
    ) -> Result<ResolvedLink, AppError> {
        let (resolved, now) = self.resolve_at(short_code).await?;

        self.click_recorder
            .record(ClickEvent::new(resolved.link_id, client, now));

        Ok(resolved)
    }

    async fn resolve_at(
        &self,
        short_code: &str,
    ) -> Result<(ResolvedLink, DateTime<Utc>), AppError> {
        let resolved = match self.cache.get_link(short_code).await {
            Ok(Some(cached)) => cached,
            Ok(None) => self.load_and_cache(short_code).await?,
            Err(e) => {
                warn!(short_code, error = %e, "Cache lookup failed, falling back to store");
                self.load_and_cache(short_code).await?
            }
        };

        let now = self.clock.now();
        debug!(
            short_code,
            now = %now,
            expires_at = ?resolved.expires_at,
            "Checking link expiry"
        );

        if resolved.is_expired_at(now) {
            return Err(AppError::expired(
                "Link expired",
                json!({ "short_code": short_code }),
            ));
        }

        Ok((resolved, now))
    }

    async fn load_and_cache(&self, short_code: &str) -> Result<ResolvedLink, AppError> {
        let link = self
            .link_repository
            .find_by_short_url(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Link not found", json!({ "short_code": short_code }))
            })?;

        let resolved = link.to_resolved();

        if let Some(ttl) = self.cache_ttl(&resolved) {
            let cache = self.cache.clone();
            let code = short_code.to_string();
            let entry = resolved.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_link(&code, &entry, ttl).await {
                    warn!(short_code = %code, error = %e, "Failed to cache link");
                }
            });
        }

        Ok(resolved)
    }

    /// TTL for a cache entry, or `None` if the link should not be cached.
    ///
    /// The outer `Option` is whether to cache at all; the inner one is the
    /// TTL override passed to the cache.
    fn cache_ttl(&self, link: &ResolvedLink) -> Option<Option<u64>> {
        if !self.cache.is_enabled() {
            return None;
        }

        match link.expires_at {
            None => Some(None),
            Some(expires_at) => {
                let remaining = (expires_at - self.clock.now()).num_seconds();
                (remaining > 0).then_some(Some(remaining as u64))
            }
        }
    }

    /// Lists `user_id`'s links, newest first.
    ///
    /// `page` is 1-based. `pages` is `ceil(total / limit)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page < 1`, `limit` is outside 1..=100,
    /// or the page offset does not fit in an `i64`.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list_links(
        &self,
        user_id: i64,
        page: i64,
        limit: i64,
        search: &str,
    ) -> Result<LinkPage, AppError> {
        let offset = (page >= 1 && (1..=100).contains(&limit))
            .then(|| (page - 1).checked_mul(limit))
            .flatten()
            .ok_or_else(|| {
                AppError::bad_request(
                    "Invalid pagination parameters",
                    json!({ "page": page, "limit": limit }),
                )
            })?;

        let filter = LinkFilter::new(offset, limit).with_search(search);

        let links = self
            .link_repository
            .list_for_user(user_id, filter)
            .await?;
        let total = self.link_repository.count_for_user(user_id, search).await?;
        let pages = (total + limit - 1) / limit;

        Ok(LinkPage {
            links,
            total,
            pages,
        })
    }

    /// Checks that the link store is reachable.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }
}
