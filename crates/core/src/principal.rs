use serde::{Deserialize, Serialize};

use crate::{CoreError, PrincipalId, Role, role::RawRole};

/// Profile payload as returned by the backend (`get_profile`) and as persisted
/// under the `user` storage key.
///
/// Every field is optional on the wire; [`Principal::try_from`] decides what
/// is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<RawRole>,
}

/// The authenticated identity as known to the client.
///
/// Serializes to a profile-compatible object so the persisted form can be
/// read back through [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Principal {
    pub fn new(
        id: PrincipalId,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            role,
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl TryFrom<Profile> for Principal {
    type Error = CoreError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        let id = profile
            .id
            .map(PrincipalId::new)
            .ok_or_else(|| CoreError::incomplete_profile("id"))?;
        let role = match profile.role {
            Some(raw) => Role::try_from(raw)?,
            None => return Err(CoreError::incomplete_profile("role")),
        };

        let username = non_blank(profile.username).unwrap_or_default();
        let first_name = non_blank(profile.first_name);
        let last_name = non_blank(profile.last_name);
        let full_name = [first_name.as_deref(), last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        let display_name = if !full_name.is_empty() {
            full_name
        } else if let Some(name) = non_blank(profile.name) {
            name
        } else if !username.is_empty() {
            username.clone()
        } else {
            format!("user {id}")
        };

        Ok(Self {
            id,
            username,
            display_name,
            role,
            email: non_blank(profile.email),
            first_name,
            last_name,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Bearer credential plus the refresh credential used to renew it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

impl core::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
