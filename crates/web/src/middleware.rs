use std::sync::Arc;

use axum::{extract::State, middleware::Next, response::Response};

use crate::app::AppState;
use crate::context::SessionContext;

/// Attach the current [`SessionContext`] to the request.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let snapshot = state.session().snapshot();
    tracing::trace!(
        method = %req.method(),
        uri = %req.uri(),
        authenticated = snapshot.is_authenticated(),
        "request"
    );
    req.extensions_mut().insert(SessionContext::new(snapshot));
    next.run(req).await
}
