//! Every unclaimed GET is a page navigation.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{Method, StatusCode, Uri, header},
    response::IntoResponse,
};

use vetcard_router::Navigation;

use crate::app::{AppState, errors};
use crate::context::SessionContext;

/// 303 + `Location` for redirects, otherwise the render plan with the
/// plan's own status (200, or 404 for the catch-all page).
pub async fn navigate(
    Extension(state): Extension<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    method: Method,
    uri: Uri,
) -> axum::response::Response {
    if method != Method::GET && method != Method::HEAD {
        return errors::json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            format!("{method} is not supported on page routes"),
        );
    }

    let url = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let navigation = state.navigator().navigate(url, ctx.snapshot(), state.sidebar());

    match &navigation {
        Navigation::Redirect { location, .. } => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location.clone())],
            Json(navigation.clone()),
        )
            .into_response(),
        Navigation::Render(plan) => {
            let status = StatusCode::from_u16(plan.status).unwrap_or(StatusCode::OK);
            (status, Json(navigation.clone())).into_response()
        }
    }
}
