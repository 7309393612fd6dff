//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Token bucket parameters for one group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Seconds after which one request of the burst is replenished.
    pub replenish_seconds: u64,
    /// Requests a single client may make back to back.
    pub burst: u32,
}

impl RateLimit {
    /// Limits for public endpoints (redirects, health).
    pub const PUBLIC: Self = Self {
        replenish_seconds: 2,
        burst: 100,
    };

    /// Stricter limits for authenticated endpoints.
    pub const PROTECTED: Self = Self {
        replenish_seconds: 1,
        burst: 10,
    };

    pub fn is_valid(&self) -> bool {
        self.replenish_seconds > 0 && self.burst > 0
    }
}

/// Creates a per-IP rate limiter.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the router must be served with connect info.
///
/// # Panics
///
/// Panics if either value of `limit` is zero; configuration loading rejects
/// such values before the router is built.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{code}", get(redirect_handler))
///     .layer(rate_limit::layer(RateLimit::PUBLIC));
/// ```
pub fn layer(
    limit: RateLimit,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(limit.replenish_seconds)
            .burst_size(limit.burst)
            .finish()
            .expect("rate limit values must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
