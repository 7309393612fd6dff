//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
///
/// `custom_alias` is optional; blank values are treated as absent.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(alias = "originalUrl")]
    #[validate(
        length(min = 1, max = 2048, message = "URL is empty or too long"),
        url(message = "Invalid URL format")
    )]
    pub original_url: String,

    #[serde(default, alias = "customAlias")]
    pub custom_alias: Option<String>,
}

/// A short link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub owner_id: String,
    pub short_url: String,
    pub expiry_date: DateTime<Utc>,
    pub expired: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), link.short_code);
        let expired = link.is_expired();

        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            custom_alias: link.custom_alias,
            owner_id: link.owner_id,
            short_url,
            expiry_date: link.expiry_date,
            expired,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// Links owned by the caller.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub total: usize,
}
