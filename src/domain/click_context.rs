//! Raw click context captured on the redirect path.

use chrono::{DateTime, Utc};

/// Client context of a single redirect, before enrichment.
///
/// Captured by the redirect handler from request headers and the socket peer;
/// `ip_address` has already been through forwarded-header resolution
/// (see [`crate::utils::client_ip::resolve_client_ip`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickContext {
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl ClickContext {
    /// Builds a context, dropping blank header values.
    pub fn new(ip_address: String, user_agent: Option<&str>, referrer: Option<&str>) -> Self {
        Self {
            ip_address,
            user_agent: non_blank(user_agent),
            referrer: non_blank(referrer),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A resolved click waiting in the recording queue.
///
/// Carries the resolution timestamp so the persisted event reflects when the
/// redirect happened rather than when the worker got to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClick {
    pub link_id: i64,
    pub context: ClickContext,
    pub clicked_at: DateTime<Utc>,
}

impl PendingClick {
    pub fn new(link_id: i64, context: ClickContext) -> Self {
        Self {
            link_id,
            context,
            clicked_at: Utc::now(),
        }
    }
}
