use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details.into()),
        }
    }
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

/// `{error}` body with the given status.
pub struct ApiError(pub String, pub StatusCode);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        (status, Json(ErrorResponse::new(&message))).into_response()
    }
}

/// `{error, details}` body with the given status.
pub struct DetailedApiError(pub String, pub String, pub StatusCode);

impl IntoResponse for DetailedApiError {
    fn into_response(self) -> Response {
        let (message, details, status) = (self.0, self.1, self.2);
        (status, Json(ErrorResponse::with_details(&message, details))).into_response()
    }
}
