//! Axum application: shared state and the router.
//!
//! - `routes/`: handlers, one file per area
//! - `errors.rs`: JSON error bodies and startup errors

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use vetcard_auth::{
    ApiClient, ApiTransport, FileStore, HttpTransport, KeyValueStore, LoginService, MemoryStore, MockTransport,
    SessionStore,
};
use vetcard_router::{Navigator, RouteTable, SidebarState};

use crate::config::WebConfig;
use crate::middleware;

pub mod errors;
pub mod routes;

use errors::StartupError;

/// Process-wide state: one session, one navigator, one sidebar.
pub struct AppState {
    login: LoginService,
    navigator: Navigator,
    sidebar: Mutex<SidebarState>,
}

impl AppState {
    pub fn new(login: LoginService, navigator: Navigator) -> Self {
        Self {
            login,
            navigator,
            sidebar: Mutex::new(SidebarState::default()),
        }
    }

    /// Wire storage, transport and routes from configuration.
    ///
    /// The session is hydrated from storage; without an API URL the
    /// in-process demo backend answers.
    pub fn from_config(config: &WebConfig) -> Result<Self, StartupError> {
        let storage: Arc<dyn KeyValueStore> = match &config.session_file {
            Some(path) => Arc::new(FileStore::new(path.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        let transport: Arc<dyn ApiTransport> = match &config.api_url {
            Some(url) => Arc::new(HttpTransport::new(url.clone(), config.http_timeout)?),
            None => {
                tracing::info!("no backend URL configured, using the demo backend");
                Arc::new(MockTransport::new())
            }
        };

        let session = SessionStore::hydrate(storage);
        let navigator = Navigator::new(RouteTable::application()?);
        Ok(Self::new(LoginService::new(ApiClient::new(transport, session)), navigator))
    }

    pub fn session(&self) -> &SessionStore {
        self.login.session()
    }

    pub fn login_service(&self) -> &LoginService {
        &self.login
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn sidebar(&self) -> SidebarState {
        *self.sidebar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle_sidebar(&self) -> bool {
        self.sidebar.lock().unwrap_or_else(PoisonError::into_inner).toggle()
    }

    pub fn close_sidebar(&self) {
        self.sidebar.lock().unwrap_or_else(PoisonError::into_inner).close();
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/policy/routes", get(routes::system::route_policy))
        .route("/policy/explain", get(routes::system::explain))
        .route("/session", get(routes::session::current))
        .route("/session/login", post(routes::session::login))
        .route("/session/logout", post(routes::session::logout))
        .route("/ui/sidebar/toggle", post(routes::ui::toggle_sidebar))
        .fallback(routes::pages::navigate)
        .layer(Extension(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::session_middleware,
        ))
        .layer(ServiceBuilder::new())
}
