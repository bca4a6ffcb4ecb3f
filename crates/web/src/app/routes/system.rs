//! Health check and route-policy inspection.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use vetcard_core::{Principal, PrincipalId, Role, SessionSnapshot};
use vetcard_router::{
    AccessGuard, SidebarState,
    path::{requested_url, split_url},
};

use crate::app::{AppState, errors};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /policy/routes - the full route table with every access variant.
pub async fn route_policy(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "routes": state.navigator().table() }))
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub path: String,
    /// Role code or name; absent means guest.
    pub role: Option<String>,
}

/// GET /policy/explain?path=..&role=.. - why a role gets what it gets.
pub async fn explain(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ExplainQuery>,
) -> axum::response::Response {
    let role = match query.role.as_deref().map(str::parse::<Role>).transpose() {
        Ok(role) => role,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_role", e.to_string()),
    };
    let session = match role {
        Some(role) => SessionSnapshot::authenticated(Principal::new(PrincipalId::new(0), "explain", "explain", role)),
        None => SessionSnapshot::guest(),
    };

    let navigator = state.navigator();
    let (path, _) = split_url(&query.path);
    let requested = requested_url(&query.path);
    let variants: Vec<_> = navigator
        .table()
        .lookup(path)
        .map(|hit| {
            hit.entry
                .variants
                .iter()
                .map(|variant| {
                    json!({
                        "access": variant.access,
                        "layout": variant.layout,
                        "decision": AccessGuard::new(variant.access).check(&session, &requested),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let outcome = navigator.navigate(&query.path, &session, SidebarState::default());
    (
        StatusCode::OK,
        Json(json!({
            "path": path,
            "role": role,
            "variants": variants,
            "outcome": outcome,
        })),
    )
        .into_response()
}
