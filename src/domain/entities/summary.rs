//! Aggregated click analytics for a single link.

use std::collections::BTreeMap;

use super::click::UNKNOWN;
use super::device::DeviceType;

/// Number of clicks sharing one (country, device type) combination.
///
/// Stores return these from a single grouped read, so totals derived from
/// them are always mutually consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCount {
    pub country: Option<String>,
    pub device_type: DeviceType,
    pub count: i64,
}

/// Click totals for a link, broken down by country and by device type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub link_id: i64,
    pub total: i64,
    pub by_country: BTreeMap<String, i64>,
    pub by_device_type: BTreeMap<String, i64>,
}

impl AnalyticsSummary {
    /// Folds grouped counts into per-dimension totals.
    ///
    /// Clicks without a country are grouped under `"Unknown"`.
    pub fn from_counts(link_id: i64, counts: impl IntoIterator<Item = DimensionCount>) -> Self {
        let mut summary = Self {
            link_id,
            total: 0,
            by_country: BTreeMap::new(),
            by_device_type: BTreeMap::new(),
        };

        for row in counts {
            summary.total += row.count;

            let country = row.country.unwrap_or_else(|| UNKNOWN.to_string());
            *summary.by_country.entry(country).or_default() += row.count;
            *summary
                .by_device_type
                .entry(row.device_type.as_str().to_string())
                .or_default() += row.count;
        }

        summary
    }
}
