//! Client address resolution from forwarded headers.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Header carrying the proxy chain, client first.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Resolves the client address of a request.
///
/// Prefers the first comma-separated entry of `X-Forwarded-For`, trimmed.
/// Falls back to the socket peer when the header is missing, not valid
/// UTF-8, empty, or the literal `unknown` (case-insensitive).
///
/// The value is returned as-is; it is validated later by enrichment, so a
/// malformed forwarded address is still recorded verbatim.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = resolve_client_ip(&headers, "127.0.0.1".parse().unwrap());
/// assert_eq!(ip, "203.0.113.7");
/// ```
pub fn resolve_client_ip(headers: &HeaderMap, peer: IpAddr) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
        .map(str::to_string)
        .unwrap_or_else(|| peer.to_string())
}
