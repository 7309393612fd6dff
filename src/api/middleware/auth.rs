//! Bearer token authentication for owner-scoped routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Resolves the caller behind `Authorization: Bearer <token>`.
///
/// The resulting [`crate::domain::entities::Principal`] is stored in request
/// extensions; protected handlers take it as `Extension<Principal>` and use
/// its id as the link owner.
///
/// Missing, malformed, unknown and revoked tokens all end in `401` with
/// `WWW-Authenticate: Bearer`.
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => token,
        Err(_) => {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Bearer token missing or malformed" }),
            ));
        }
    };

    let principal = state.auth_service.authenticate(&token).await?;
    tracing::debug!(principal = %principal.id, path = %parts.uri.path(), "Authenticated");

    parts.extensions.insert(principal);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
