//! Access guard: render, or redirect to login, or redirect away.

use serde::Serialize;
use vetcard_core::{Role, RoleSet, SessionSnapshot};

use crate::redirect;

/// Who may reach a route variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum Access {
    /// Reachable regardless of session.
    Public,
    /// The principal's role must be in the set.
    Roles(RoleSet),
    /// Any authenticated principal.
    AnyAuthenticated,
}

impl Access {
    pub fn only(role: Role) -> Self {
        Access::Roles(RoleSet::only(role))
    }

    pub fn any_of(roles: &[Role]) -> Self {
        Access::Roles(RoleSet::of(roles))
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Access::Public)
    }

    pub fn permits(&self, session: &SessionSnapshot) -> bool {
        match self {
            Access::Public => true,
            Access::AnyAuthenticated => session.is_authenticated(),
            Access::Roles(roles) => session.role().is_some_and(|role| roles.contains(role)),
        }
    }

    /// Whether a principal holding `role` satisfies this access.
    pub fn permits_role(&self, role: Role) -> bool {
        match self {
            Access::Public | Access::AnyAuthenticated => true,
            Access::Roles(roles) => roles.contains(role),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    Allowed(Role),
    Denied(Role),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Render,
    RedirectToLogin { location: String },
    RedirectDenied { location: String },
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::Render => None,
            GuardDecision::RedirectToLogin { location } | GuardDecision::RedirectDenied { location } => {
                Some(location)
            }
        }
    }
}

/// Gate in front of a layout. Pure: the decision depends only on the
/// configured access and the snapshot handed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    access: Access,
}

impl AccessGuard {
    pub fn new(access: Access) -> Self {
        Self { access }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn state(&self, session: &SessionSnapshot) -> GuardState {
        match session.role() {
            None => GuardState::Unauthenticated,
            Some(role) if self.access.permits_role(role) => GuardState::Allowed(role),
            Some(role) => GuardState::Denied(role),
        }
    }

    /// `requested` is the original path plus query, preserved for the
    /// post-login return.
    pub fn check(&self, session: &SessionSnapshot, requested: &str) -> GuardDecision {
        if self.access.is_public() {
            return GuardDecision::Render;
        }

        match self.state(session) {
            GuardState::Allowed(_) => GuardDecision::Render,
            GuardState::Unauthenticated => GuardDecision::RedirectToLogin {
                location: redirect::login_redirect(requested),
            },
            GuardState::Denied(role) => GuardDecision::RedirectDenied {
                location: redirect::denied_target(role).to_string(),
            },
        }
    }
}
