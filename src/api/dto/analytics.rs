//! DTOs for per-link analytics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::{AnalyticsSummary, Click, Link};

/// A single recorded click.
///
/// Geolocation fields that could not be resolved are reported as `"Unknown"`.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: String,
    pub country: String,
    pub city: String,
    pub clicked_at: DateTime<Utc>,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            country: click.country_label().to_string(),
            city: click.city_label().to_string(),
            device_type: click.device_type.as_str().to_string(),
            ip_address: click.ip_address,
            user_agent: click.user_agent,
            referrer: click.referrer,
            clicked_at: click.clicked_at,
        }
    }
}

/// Paginated raw click events for one link.
#[derive(Debug, Serialize)]
pub struct ClickListResponse {
    pub link_id: i64,
    pub short_code: String,
    pub pagination: PaginationMeta,
    pub items: Vec<ClickInfo>,
}

/// Aggregated click counts for one link.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub link_id: i64,
    pub short_code: String,
    pub total: i64,
    pub by_country: BTreeMap<String, i64>,
    pub by_device_type: BTreeMap<String, i64>,
}

impl SummaryResponse {
    pub fn new(link: Link, summary: AnalyticsSummary) -> Self {
        Self {
            link_id: link.id,
            short_code: link.short_code,
            total: summary.total,
            by_country: summary.by_country,
            by_device_type: summary.by_device_type,
        }
    }
}
