//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkSummary, NewLink};
use crate::domain::repositories::{LinkFilter, LinkRepository};
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "l.id, l.original_url, l.short_url, l.custom_alias, l.expires_at, l.created_at, l.user_id";

// `strpos` keeps the match literal: `%` and `_` in a search term are not wildcards.
const SEARCH_CLAUSE: &str = "($2 = '' \
     OR strpos(l.original_url, $2) > 0 \
     OR strpos(l.short_url, $2) > 0 \
     OR strpos(COALESCE(l.custom_alias, ''), $2) > 0)";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    short_url: String,
    custom_alias: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    user_id: i64,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            original_url: r.original_url,
            short_url: r.short_url,
            custom_alias: r.custom_alias,
            expires_at: r.expires_at,
            created_at: r.created_at,
            user_id: r.user_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkSummaryRow {
    #[sqlx(flatten)]
    link: LinkRow,
    click_count: i64,
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Short code uniqueness is enforced by the `links_short_url_key` constraint,
/// so concurrent inserts of the same code cannot both succeed.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links AS l (original_url, short_url, custom_alias, expires_at, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING l.id, l.original_url, l.short_url, l.custom_alias, l.expires_at, l.created_at, l.user_id
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_url)
        .bind(&new_link.custom_alias)
        .bind(new_link.expires_at)
        .bind(new_link.user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.short_url = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(short_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.id = $1 AND l.user_id = $2");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        filter: LinkFilter,
    ) -> Result<Vec<LinkSummary>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}, COUNT(c.id) AS click_count
            FROM links l
            LEFT JOIN clicks c ON c.link_id = l.id
            WHERE l.user_id = $1 AND {SEARCH_CLAUSE}
            GROUP BY l.id
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $3 OFFSET $4
            "#
        );

        let rows = sqlx::query_as::<_, LinkSummaryRow>(&sql)
            .bind(user_id)
            .bind(&filter.search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| LinkSummary {
                link: r.link.into(),
                click_count: r.click_count,
            })
            .collect())
    }

    async fn count_for_user(&self, user_id: i64, search: &str) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM links l WHERE l.user_id = $1 AND {SEARCH_CLAUSE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .bind(search)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
