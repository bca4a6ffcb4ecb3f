use serde::Serialize;

use crate::{Principal, Role};

/// Point-in-time view of the session, handed to the routing layer.
///
/// Authentication is derived from the presence of a principal, so the two
/// can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    principal: Option<Principal>,
}

impl SessionSnapshot {
    pub fn guest() -> Self {
        Self { principal: None }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.principal.as_ref().map(|p| p.role)
    }
}

impl From<Option<Principal>> for SessionSnapshot {
    fn from(principal: Option<Principal>) -> Self {
        Self { principal }
    }
}
