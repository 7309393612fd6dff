//! Geolocation providers.
//!
//! [`HttpGeoLocator`] speaks the ip-api JSON shape
//! (`GET {endpoint}/{ip}?fields=status,message,country,city`). Any provider
//! returning the same fields can be configured through `GEO_ENDPOINT`.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::enrichment::{EnrichmentDegraded, GeoLocation, GeoLocator};

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl GeoIpResponse {
    fn into_location(self) -> Result<GeoLocation, EnrichmentDegraded> {
        if self.status != "success" {
            let message = self.message.unwrap_or(self.status);
            // ip-api reports reserved ranges as failures, not as empty data
            return Err(match message.as_str() {
                "private range" | "reserved range" => EnrichmentDegraded::NoMapping,
                _ => EnrichmentDegraded::Lookup(message),
            });
        }

        Ok(GeoLocation {
            country: non_empty(self.country),
            city: non_empty(self.city),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Network geolocation over HTTP.
pub struct HttpGeoLocator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoLocator {
    /// Builds a locator with its own request timeout.
    ///
    /// The enricher applies its own budget on top; this one bounds the
    /// connection itself so abandoned requests do not linger.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the TLS backend cannot be initialised.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn lookup(&self, ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded> {
        let url = format!("{}/{}", self.endpoint, ip);

        let response = self
            .client
            .get(&url)
            .query(&[("fields", "status,message,country,city")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichmentDegraded::Timeout
                } else {
                    EnrichmentDegraded::Lookup(e.to_string())
                }
            })?
            .error_for_status()
            .map_err(|e| EnrichmentDegraded::Lookup(e.to_string()))?;

        let body: GeoIpResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentDegraded::Lookup(e.to_string()))?;

        body.into_location()
    }
}

/// Provider used when geolocation is disabled; every lookup has no data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeoLocator;

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded> {
        Ok(GeoLocation::default())
    }
}
