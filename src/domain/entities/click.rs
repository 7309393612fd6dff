//! Click entity representing a single recorded redirect.

use chrono::{DateTime, Utc};

use super::device::DeviceType;

/// Label reported for enrichment fields that could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// An enriched click event recorded when a short link is resolved.
///
/// Written once by the click pipeline and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: DeviceType,
    pub country: Option<String>,
    pub city: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl Click {
    /// Country name, or `"Unknown"` when geolocation produced nothing.
    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN)
    }

    /// City name, or `"Unknown"` when geolocation produced nothing.
    pub fn city_label(&self) -> &str {
        self.city.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Input data for recording a new click event.
///
/// `link_id` must reference an existing link; stores reject it otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: DeviceType,
    pub country: Option<String>,
    pub city: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl NewClick {
    pub fn into_click(self, id: i64) -> Click {
        Click {
            id,
            link_id: self.link_id,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            referrer: self.referrer,
            device_type: self.device_type,
            country: self.country,
            city: self.city,
            clicked_at: self.clicked_at,
        }
    }
}
