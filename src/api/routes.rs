//! Route configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`                        - Short link redirect (public)
//! - `GET  /health`                        - Health check: storage, cache, click queue (public)
//! - `POST /links`                         - Create a short link
//! - `GET  /links`                         - List the caller's links
//! - `GET  /links/{id}/analytics`          - Raw click events (owner only)
//! - `GET  /links/{id}/analytics/summary`  - Aggregated counts (owner only)
//!
//! Every `/links` route requires Bearer token authentication via
//! [`crate::api::middleware::auth`]. The redirect route carries no rate limit.

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::api::handlers::{
    analytics_events_handler, analytics_summary_handler, create_link_handler, health_handler,
    list_links_handler, redirect_handler,
};
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;

/// Per-group request limits applied by [`app_router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLimits {
    pub public: RateLimit,
    pub protected: RateLimit,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            public: RateLimit::PUBLIC,
            protected: RateLimit::PROTECTED,
        }
    }
}

/// Authenticated link management and analytics routes.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}/analytics", get(analytics_events_handler))
        .route(
            "/links/{id}/analytics/summary",
            get(analytics_summary_handler),
        )
}

/// Unauthenticated routes other than the redirect.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// Short link resolution. Carries no rate limit and answers only `302` or `404`.
pub fn redirect_routes() -> Router<AppState> {
    Router::new().route("/{code}", get(redirect_handler))
}

/// Constructs the application router with all routes and middleware.
///
/// `/links` and `/health` are rate limited per peer address, so the router
/// must be served with `into_make_service_with_connect_info::<SocketAddr>()`. Trailing-slash
/// normalisation is applied around the finished router by the server.
pub fn app_router(state: AppState, limits: RouteLimits) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::layer(limits.protected));

    let public = public_routes().layer(rate_limit::layer(limits.public));

    Router::new()
        .merge(protected)
        .merge(public)
        .merge(redirect_routes())
        .with_state(state)
        .layer(tracing::layer())
}
