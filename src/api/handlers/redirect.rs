//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::domain::click_context::ClickContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture client IP (`X-Forwarded-For` first entry, else peer address),
///    `User-Agent` and `Referer`
/// 2. Resolve the code through the cache and the link store
/// 3. Queue one click event for background enrichment and storage
/// 4. Return `302 Found` with `Location` set to the original URL
///
/// Click recording never delays or fails the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let context = ClickContext::new(
        resolve_client_ip(&headers, addr.ip()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    let target = state.redirect_service.resolve(&code, context).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, target.original_url)],
    ))
}
