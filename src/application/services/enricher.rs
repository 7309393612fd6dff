//! Best-effort derivation of geolocation and device class for a click.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::click_context::ClickContext;
use crate::domain::enrichment::{
    DeviceClassifier, EnrichedFields, EnrichmentDegraded, GeoLocation, GeoLocator,
};

/// Combines a [`GeoLocator`] and a [`DeviceClassifier`] under a time budget.
///
/// [`EventEnricher::enrich`] never fails. Every [`EnrichmentDegraded`] case
/// resolves to absent geolocation fields and is only visible through the
/// `enrichment_degraded_total` counter and debug logs.
pub struct EventEnricher {
    geo: Arc<dyn GeoLocator>,
    classifier: Arc<dyn DeviceClassifier>,
    timeout: Duration,
}

impl EventEnricher {
    pub fn new(
        geo: Arc<dyn GeoLocator>,
        classifier: Arc<dyn DeviceClassifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            geo,
            classifier,
            timeout,
        }
    }

    pub async fn enrich(&self, context: &ClickContext) -> EnrichedFields {
        let device_type = self.classifier.classify(context.user_agent.as_deref());

        let location = match self.locate(&context.ip_address).await {
            Ok(location) => location,
            Err(reason) => {
                tracing::debug!(
                    ip = %context.ip_address,
                    reason = reason.reason(),
                    error = %reason,
                    "Geolocation degraded to defaults"
                );
                metrics::counter!("enrichment_degraded_total", "reason" => reason.reason())
                    .increment(1);
                GeoLocation::default()
            }
        };

        EnrichedFields {
            country: location.country,
            city: location.city,
            device_type,
        }
    }

    async fn locate(&self, raw_ip: &str) -> Result<GeoLocation, EnrichmentDegraded> {
        let ip: IpAddr = raw_ip
            .parse()
            .map_err(|_| EnrichmentDegraded::MalformedAddress)?;

        if !is_public(&ip) {
            return Err(EnrichmentDegraded::NonPublicAddress);
        }

        let location = tokio::time::timeout(self.timeout, self.geo.lookup(ip))
            .await
            .map_err(|_| EnrichmentDegraded::Timeout)??;

        if location.country.is_none() && location.city.is_none() {
            return Err(EnrichmentDegraded::NoMapping);
        }

        Ok(location)
    }
}

/// True when `ip` is routable on the public internet.
pub fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(&v4),
            None => is_public_v6(v6),
        },
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        // 100.64.0.0/10 carrier-grade NAT
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64))
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];

    !(ip.is_loopback()
        || ip.is_unspecified()
        || ip.is_multicast()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local
        || (first & 0xffc0) == 0xfe80)
}
