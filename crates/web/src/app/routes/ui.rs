use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};
use serde_json::json;

use crate::app::AppState;

/// POST /ui/sidebar/toggle
pub async fn toggle_sidebar(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let open = state.toggle_sidebar();
    Json(json!({ "open": open }))
}
