//! REST client used by pages and the login flow.
//!
//! Every call carries the session's bearer token when there is one. A 401 on
//! an authenticated call triggers one refresh (through the shared
//! [`RefreshCoordinator`]) and one retry; if the refresh fails, the caller
//! gets the original 401.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::refresh::RefreshCoordinator;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method};

/// Backend auth endpoints (relative to the API base).
pub mod endpoints {
    pub const TOKEN: &str = "/v1/auth/token/";
    pub const REFRESH: &str = "/v1/auth/token/refresh/";
    pub const PROFILE: &str = "/v1/auth/get_profile/";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Client-side rejection (4xx): retrying the same request will not help.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }
}

/// Map a raw response onto the JSON body or an [`ApiError`].
///
/// Empty success bodies (e.g. 204) decode as `null`. Error messages come from
/// the body's `detail`, then `message`, then `Error <status>`.
pub fn decode_response(response: ApiResponse) -> Result<Value, ApiError> {
    if response.is_success() {
        return Ok(response.body.unwrap_or(Value::Null));
    }

    let message = response
        .body
        .as_ref()
        .and_then(|body| {
            ["detail", "message"]
                .into_iter()
                .find_map(|field| body.get(field).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| format!("Error {}", response.status));

    if response.status == 401 {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Status {
            status: response.status,
            message,
        })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    session: SessionStore,
    refresher: Arc<RefreshCoordinator>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>, session: SessionStore) -> Self {
        let refresher = Arc::new(RefreshCoordinator::new(transport.clone(), session.clone()));
        Self {
            transport,
            session,
            refresher,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn refresher(&self) -> &RefreshCoordinator {
        &self.refresher
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let request = ApiRequest::get(path);
        let body = self.execute(&request).await?;
        parse(body, &request)
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let request = ApiRequest::new(Method::Post, path).with_body(to_json(body)?);
        let body = self.execute(&request).await?;
        parse(body, &request)
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let request = ApiRequest::new(Method::Put, path).with_body(to_json(body)?);
        let body = self.execute(&request).await?;
        parse(body, &request)
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let request = ApiRequest::new(Method::Delete, path);
        let body = self.execute(&request).await?;
        parse(body, &request)
    }

    /// Send without any bearer and without the refresh/retry path.
    pub async fn send_anonymous<R: DeserializeOwned>(&self, request: &ApiRequest) -> Result<R, ApiError> {
        let response = self.transport.send(request, None).await?;
        parse(decode_response(response)?, request)
    }

    /// Send with an explicit bearer, bypassing the session (used right after
    /// the token exchange, before the session exists).
    pub async fn send_with_bearer<R: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        bearer: &str,
    ) -> Result<R, ApiError> {
        let response = self.transport.send(request, Some(bearer)).await?;
        parse(decode_response(response)?, request)
    }

    /// Session-authenticated send with at most one refresh and one retry.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let sent_with = self.session.tokens();
        let bearer = sent_with.as_ref().map(|tokens| tokens.access.as_str());
        let response = self.transport.send(request, bearer).await?;

        let Some(stale) = sent_with.filter(|_| response.status == 401) else {
            return decode_response(response);
        };

        match self.refresher.refresh(&stale).await {
            Ok(fresh) => {
                tracing::debug!(method = %request.method, path = %request.path, "retrying after token refresh");
                let retried = self.transport.send(request, Some(&fresh)).await?;
                decode_response(retried)
            }
            Err(e) => {
                tracing::debug!(error = %e, path = %request.path, "refresh failed, surfacing original response");
                decode_response(response)
            }
        }
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse<R: DeserializeOwned>(body: Value, request: &ApiRequest) -> Result<R, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::Decode(format!("{} {}: {e}", request.method, request.path)))
}
