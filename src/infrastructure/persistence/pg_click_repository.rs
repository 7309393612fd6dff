//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, DeviceType, DimensionCount, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::utils::db_error::is_foreign_key_violation;

const CLICK_COLUMNS: &str =
    "id, link_id, ip_address, user_agent, referrer, device_type, country, city, clicked_at";

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    ip_address: String,
    user_agent: Option<String>,
    referrer: Option<String>,
    device_type: String,
    country: Option<String>,
    city: Option<String>,
    clicked_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            ip_address: r.ip_address,
            user_agent: r.user_agent,
            referrer: r.referrer,
            device_type: DeviceType::from_label(&r.device_type),
            country: r.country,
            city: r.city,
            clicked_at: r.clicked_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DimensionRow {
    country: Option<String>,
    device_type: String,
    count: i64,
}

/// PostgreSQL repository for click events.
///
/// The `link_clicks.link_id` foreign key rejects events for unknown links;
/// that rejection surfaces as [`AppError::NotFound`].
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
    async fn record(&self, click: NewClick) -> Result<Click, AppError> {
        let sql = format!(
            r#"
            INSERT INTO link_clicks
                (link_id, ip_address, user_agent, referrer, device_type, country, city, clicked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CLICK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(click.link_id)
            .bind(&click.ip_address)
            .bind(&click.user_agent)
            .bind(&click.referrer)
            .bind(click.device_type.as_str())
            .bind(&click.country)
            .bind(&click.city)
            .bind(click.clicked_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::not_found("Link not found", json!({ "id": click.link_id }))
                } else {
                    AppError::from(e)
                }
            })?;

        Ok(row.into())
    }

    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let sql = format!(
            r#"
            SELECT {CLICK_COLUMNS}
            FROM link_clicks
            WHERE link_id = $1
            ORDER BY clicked_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(link_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
                .bind(link_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn count_by_dimensions(&self, link_id: i64) -> Result<Vec<DimensionCount>, AppError> {
        let rows = sqlx::query_as::<_, DimensionRow>(
            r#"
            SELECT country, device_type, COUNT(*) AS count
            FROM link_clicks
            WHERE link_id = $1
            GROUP BY country, device_type
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DimensionCount {
                country: r.country,
                device_type: DeviceType::from_label(&r.device_type),
                count: r.count,
            })
            .collect())
    }
}
