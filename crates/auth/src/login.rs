//! Login flow: credentials → token pair → profile → session.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vetcard_core::{CoreError, Principal, Profile, TokenPair};

use crate::client::{ApiClient, ApiError, endpoints};
use crate::session::SessionStore;
use crate::transport::ApiRequest;

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("profile cannot be used for sign-in: {0}")]
    Profile(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct LoginService {
    client: ApiClient,
}

impl LoginService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Exchange credentials for tokens, fetch the profile, start the session.
    ///
    /// Nothing is stored unless every step succeeds.
    pub async fn login(&self, credentials: &Credentials) -> Result<Principal, LoginError> {
        let request = ApiRequest::post(
            endpoints::TOKEN,
            serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?,
        );
        let tokens: TokenPair = match self.client.send_anonymous(&request).await {
            Ok(tokens) => tokens,
            Err(e) if e.is_unauthorized() || e.status() == Some(400) => {
                tracing::info!(username = %credentials.username, "login rejected");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let profile: Profile = self
            .client
            .send_with_bearer(&ApiRequest::get(endpoints::PROFILE), &tokens.access)
            .await?;
        let principal = Principal::try_from(profile)?;

        self.session().login(principal.clone(), tokens);
        tracing::info!(principal_id = %principal.id, role = %principal.role, "login succeeded");
        Ok(principal)
    }

    pub fn logout(&self) {
        self.session().logout();
    }

    /// Re-fetch the profile for the current session; `Ok(None)` for a guest.
    pub async fn reload_profile(&self) -> Result<Option<Principal>, LoginError> {
        if !self.session().is_authenticated() {
            return Ok(None);
        }

        let profile: Profile = self.client.get(endpoints::PROFILE).await?;
        let principal = Principal::try_from(profile)?;
        if self.session().reload_principal(principal.clone()) {
            Ok(Some(principal))
        } else {
            Ok(None)
        }
    }
}
