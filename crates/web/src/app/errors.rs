use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use vetcard_auth::{ApiError, LoginError};
use vetcard_router::RouteTableError;

/// Failures while assembling the application at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("backend client: {0}")]
    Backend(#[from] ApiError),
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            err.to_string(),
        ),
        LoginError::Profile(e) => json_error(StatusCode::BAD_GATEWAY, "invalid_profile", e.to_string()),
        LoginError::Api(e) => api_error_to_response(e),
    }
}

pub fn api_error_to_response(err: ApiError) -> axum::response::Response {
    match &err {
        ApiError::Transport(_) => json_error(StatusCode::BAD_GATEWAY, "backend_unavailable", err.to_string()),
        ApiError::Decode(_) => json_error(StatusCode::BAD_GATEWAY, "backend_decode_error", err.to_string()),
        ApiError::Unauthorized(_) | ApiError::Status { .. } => {
            json_error(StatusCode::BAD_GATEWAY, "backend_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
