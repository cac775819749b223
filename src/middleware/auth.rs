use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;

/// Shared-secret bearer check. Runs before the body is read, so rejected
/// requests never touch the temp workspace.
pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .is_some_and(|auth| auth.token() == state.config.cms_secret);

    if !authorized {
        warn!(path = %req.uri().path(), "Rejected request with missing or invalid bearer token");
        return Err(ApiError("Unauthorized".to_string(), StatusCode::UNAUTHORIZED));
    }

    Ok(next.run(req).await)
}
