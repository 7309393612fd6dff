//! Collaborator contracts used to enrich raw click context.
//!
//! Enrichment is best-effort: a collaborator may fail, but the click pipeline
//! turns every failure into absent fields instead of dropping the event.

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::DeviceType;

/// Geographic attributes resolved for an IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Fields derived from a [`crate::domain::click_context::ClickContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedFields {
    pub country: Option<String>,
    pub city: Option<String>,
    pub device_type: DeviceType,
}

/// Why an enrichment field could not be determined.
///
/// Never surfaced to callers of the redirect path; only counted and logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentDegraded {
    #[error("client address is not a valid IP address")]
    MalformedAddress,

    #[error("client address is not publicly routable")]
    NonPublicAddress,

    #[error("geolocation lookup timed out")]
    Timeout,

    #[error("geolocation lookup failed: {0}")]
    Lookup(String),

    #[error("geolocation provider has no data for address")]
    NoMapping,
}

impl EnrichmentDegraded {
    /// Stable label used as a metrics dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedAddress => "malformed_address",
            Self::NonPublicAddress => "non_public_address",
            Self::Timeout => "timeout",
            Self::Lookup(_) => "lookup_failed",
            Self::NoMapping => "no_mapping",
        }
    }
}

/// Resolves an IP address to a location.
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::HttpGeoLocator`] - ip-api compatible HTTP provider
/// - [`crate::infrastructure::geo::NullGeoLocator`] - always returns no data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded>;
}

/// Classifies a user agent string into a [`DeviceType`].
///
/// Total: an absent or unrecognised user agent maps to [`DeviceType::Unknown`].
pub trait DeviceClassifier: Send + Sync {
    fn classify(&self, user_agent: Option<&str>) -> DeviceType;
}
