//! Handlers for owner-only link analytics.

use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde_json::json;

use crate::api::dto::analytics::{ClickInfo, ClickListResponse, SummaryResponse};
use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::Principal;
use crate::error::AppError;
use crate::state::AppState;

fn link_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|e| {
        AppError::bad_request("Invalid link id", json!({ "reason": e.body_text() }))
    })
}

/// Raw click events for a link, newest first.
///
/// # Endpoint
///
/// `GET /links/{id}/analytics?page=1&page_size=25`
///
/// # Errors
///
/// - 400 if the id or pagination parameters are invalid
/// - 403 if the caller does not own the link
/// - 404 if the link does not exist
pub async fn analytics_events_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ClickListResponse>, AppError> {
    let id = link_id(path)?;
    let Query(params) = query.map_err(|e| {
        AppError::bad_request("Invalid pagination parameters", json!({ "reason": e.body_text() }))
    })?;

    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let page = state
        .analytics_service
        .list_events(id, &principal, offset, limit)
        .await?;

    Ok(Json(ClickListResponse {
        link_id: page.link.id,
        short_code: page.link.short_code,
        pagination: params.meta(page.total),
        items: page.items.into_iter().map(ClickInfo::from).collect(),
    }))
}

/// Aggregated click counts for a link.
///
/// # Endpoint
///
/// `GET /links/{id}/analytics/summary`
///
/// # Response
///
/// ```json
/// {
///   "link_id": 1,
///   "short_code": "promo",
///   "total": 3,
///   "by_country": { "Norway": 2, "Unknown": 1 },
///   "by_device_type": { "Mobile": 3 }
/// }
/// ```
///
/// # Errors
///
/// Same as [`analytics_events_handler`].
pub async fn analytics_summary_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let id = link_id(path)?;

    let (link, summary) = state.analytics_service.summarize(id, &principal).await?;

    Ok(Json(SummaryResponse::new(link, summary)))
}
