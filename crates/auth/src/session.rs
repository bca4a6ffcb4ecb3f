//! Session state provider: the single source of truth for "who is logged in".
//!
//! One [`SessionStore`] exists per running application. It is cheap to clone
//! (all clones share state) and is handed explicitly to the navigator, the
//! API client and the host, never reached through a global.
//!
//! The store never fails: storage errors are logged and the in-memory state
//! still changes, and anything unreadable at startup means "guest".

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use vetcard_core::{Principal, Profile, SessionSnapshot, TokenPair};

use crate::storage::KeyValueStore;

/// Persisted entry holding the bearer credential.
pub const ACCESS_TOKEN_KEY: &str = "authToken";
/// Persisted entry holding the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Persisted entry holding the serialized principal.
pub const PRINCIPAL_KEY: &str = "user";

/// A principal together with the credential pair that proves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub principal: Principal,
    pub tokens: TokenPair,
    pub established_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Option<ActiveSession>>>,
    storage: Arc<dyn KeyValueStore>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// A guest session over `storage`, ignoring whatever it already holds.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Arc::new(RwLock::new(None)),
            storage,
        }
    }

    /// Restore the session persisted in `storage`.
    ///
    /// Presence only: tokens are not validated against the backend. Any
    /// missing entry, unreadable storage or unparsable principal yields a
    /// guest session.
    pub fn hydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let restored = restore(storage.as_ref());
        match &restored {
            Some(active) => tracing::info!(
                principal_id = %active.principal.id,
                role = %active.principal.role,
                "restored persisted session"
            ),
            None => tracing::debug!("no persisted session, starting as guest"),
        }

        Self {
            state: Arc::new(RwLock::new(restored)),
            storage,
        }
    }

    pub fn login(&self, principal: Principal, tokens: TokenPair) {
        self.persist(&principal, &tokens);

        tracing::info!(principal_id = %principal.id, role = %principal.role, "session started");
        *self.write() = Some(ActiveSession {
            principal,
            tokens,
            established_at: Utc::now(),
        });
    }

    /// Idempotent.
    pub fn logout(&self) {
        let previous = self.write().take();
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, PRINCIPAL_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear persisted session entry");
            }
        }

        if let Some(previous) = previous {
            tracing::info!(principal_id = %previous.principal.id, "session ended");
        }
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.read().as_ref().map(|s| s.principal.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(self.current_principal())
    }

    pub fn active(&self) -> Option<ActiveSession> {
        self.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.tokens.access.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.tokens.refresh.clone())
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.read().as_ref().map(|s| s.tokens.clone())
    }

    /// Refresh-success handler. Stores `access` only while the session is
    /// still the one holding `refresh`; returns `false` (and changes nothing)
    /// for a guest or a different login.
    pub fn replace_access_token(&self, refresh: &str, access: impl Into<String>) -> bool {
        let access = access.into();
        let mut state = self.write();
        let Some(active) = state.as_mut().filter(|s| s.tokens.refresh == refresh) else {
            return false;
        };

        if let Err(e) = self.storage.set(ACCESS_TOKEN_KEY, &access) {
            tracing::warn!(error = %e, "failed to persist refreshed access token");
        }
        active.tokens.access = access;
        true
    }

    /// Profile-reload handler. Returns `false` (and changes nothing) for a guest.
    pub fn reload_principal(&self, principal: Principal) -> bool {
        let mut state = self.write();
        let Some(active) = state.as_mut() else {
            return false;
        };

        match serde_json::to_string(&principal) {
            Ok(json) => {
                if let Err(e) = self.storage.set(PRINCIPAL_KEY, &json) {
                    tracing::warn!(error = %e, "failed to persist reloaded principal");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize reloaded principal"),
        }
        active.principal = principal;
        true
    }

    fn persist(&self, principal: &Principal, tokens: &TokenPair) {
        let principal_json = match serde_json::to_string(principal) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize principal, session will not survive restart");
                return;
            }
        };

        let entries = [
            (ACCESS_TOKEN_KEY, tokens.access.as_str()),
            (REFRESH_TOKEN_KEY, tokens.refresh.as_str()),
            (PRINCIPAL_KEY, principal_json.as_str()),
        ];
        for (key, value) in entries {
            if let Err(e) = self.storage.set(key, value) {
                tracing::warn!(key, error = %e, "failed to persist session entry");
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<ActiveSession>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<ActiveSession>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn restore(storage: &dyn KeyValueStore) -> Option<ActiveSession> {
    let read = |key: &str| match storage.get(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read persisted session entry");
            None
        }
    };

    let access = read(ACCESS_TOKEN_KEY)?;
    let refresh = read(REFRESH_TOKEN_KEY)?;
    let raw_principal = read(PRINCIPAL_KEY)?;

    let profile: Profile = match serde_json::from_str(&raw_principal) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "persisted principal is not valid JSON, ignoring session");
            return None;
        }
    };
    let principal = match Principal::try_from(profile) {
        Ok(principal) => principal,
        Err(e) => {
            tracing::warn!(error = %e, "persisted principal is unusable, ignoring session");
            return None;
        }
    };

    Some(ActiveSession {
        principal,
        tokens: TokenPair::new(access, refresh),
        established_at: Utc::now(),
    })
}
