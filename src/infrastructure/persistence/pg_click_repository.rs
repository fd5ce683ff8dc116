//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    ip: Option<String>,
    user_agent: Option<String>,
    device: Option<String>,
    browser: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            ip: r.ip,
            user_agent: r.user_agent,
            device: r.device,
            browser: r.browser,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for the click log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (link_id, ip, user_agent, device, browser, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, link_id, ip, user_agent, device, browser, created_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip)
        .bind(&new_click.user_agent)
        .bind(&new_click.device)
        .bind(&new_click.browser)
        .bind(new_click.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, ip, user_agent, device, browser, created_at
            FROM clicks
            WHERE link_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }
}
