//! Single in-flight credential refresh.
//!
//! Requests that hit 401 with the same stale access token queue on one gate.
//! The first one through performs the refresh; the rest see that the stored
//! token already changed and reuse it, so N concurrent failures cost one
//! refresh call. A stale pair is matched on its refresh token, so a request
//! that started under an earlier login never picks up a newer login's token.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::client::{ApiError, decode_response, endpoints};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};
use vetcard_core::TokenPair;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("no active session to refresh")]
    NoSession,

    /// The session that sent the failed request has been replaced.
    #[error("session changed since the request was sent")]
    SessionChanged,

    /// The backend refused the refresh token; the session has been ended.
    #[error("refresh rejected: {0}")]
    Rejected(ApiError),

    /// The refresh could not be completed (network, server error, bad body);
    /// the session is kept.
    #[error("refresh unavailable: {0}")]
    Unavailable(ApiError),
}

pub struct RefreshCoordinator {
    transport: Arc<dyn ApiTransport>,
    session: SessionStore,
    gate: Mutex<()>,
    attempts: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(transport: Arc<dyn ApiTransport>, session: SessionStore) -> Self {
        Self {
            transport,
            session,
            gate: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Number of refresh calls actually sent to the backend.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Obtain an access token newer than `stale.access` for the login that
    /// issued `stale`.
    pub async fn refresh(&self, stale: &TokenPair) -> Result<String, RefreshError> {
        let _gate = self.gate.lock().await;

        let current = self.session.tokens().ok_or(RefreshError::NoSession)?;
        if current.refresh != stale.refresh {
            tracing::debug!("session replaced while the request was in flight");
            return Err(RefreshError::SessionChanged);
        }
        if current.access != stale.access {
            tracing::debug!("access token already refreshed by a concurrent request");
            return Ok(current.access);
        }
        let refresh_token = current.refresh;

        self.attempts.fetch_add(1, Ordering::Relaxed);
        let request = ApiRequest::post(endpoints::REFRESH, json!({ "refresh": refresh_token }));
        let outcome = match self.transport.send(&request, None).await {
            Ok(response) => decode_response(response),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(body) => {
                let access = body
                    .get("access")
                    .and_then(Value::as_str)
                    .filter(|token| !token.is_empty())
                    .ok_or_else(|| {
                        RefreshError::Unavailable(ApiError::Decode(
                            "refresh response has no access token".to_string(),
                        ))
                    })?
                    .to_string();

                if !self.session.replace_access_token(&refresh_token, access.clone()) {
                    return Err(RefreshError::SessionChanged);
                }
                tracing::debug!("access token refreshed");
                Ok(access)
            }
            Err(e) if e.is_client_error() => {
                if self.session.refresh_token().as_deref() != Some(refresh_token.as_str()) {
                    return Err(RefreshError::SessionChanged);
                }
                tracing::warn!(error = %e, "refresh token rejected, ending session");
                self.session.logout();
                Err(RefreshError::Rejected(e))
            }
            Err(e) => {
                tracing::warn!(error = %e, "access token refresh failed");
                Err(RefreshError::Unavailable(e))
            }
        }
    }
}
