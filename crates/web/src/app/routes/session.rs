use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, RawQuery},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use vetcard_auth::Credentials;
use vetcard_router::{post_login_target, return_url_from_query};

use crate::app::{AppState, errors};
use crate::context::SessionContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Decoded `returnUrl` the login page was opened with.
    #[serde(default, alias = "returnUrl")]
    pub return_url: Option<String>,
}

/// GET /session
pub async fn current(Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    Json(json!({
        "is_authenticated": ctx.snapshot().is_authenticated(),
        "principal": ctx.principal(),
    }))
}

/// POST /session/login
///
/// The return target comes from the body, else from the request's own
/// `?returnUrl=` (the login page's URL).
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    RawQuery(query): RawQuery,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username and password are required",
        );
    }

    let credentials = Credentials::new(body.username.trim(), body.password);
    match state.login_service().login(&credentials).await {
        Ok(principal) => {
            let return_url = body
                .return_url
                .or_else(|| query.as_deref().and_then(return_url_from_query));
            let location = post_login_target(principal.role, return_url.as_deref());
            (
                StatusCode::OK,
                Json(json!({ "location": location, "principal": principal })),
            )
                .into_response()
        }
        Err(e) => errors::login_error_to_response(e),
    }
}

/// POST /session/logout
pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    state.login_service().logout();
    state.close_sidebar();
    Json(json!({ "location": "/" }))
}
