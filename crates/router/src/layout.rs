//! Layout kinds and the session-dependent layout selector.

use serde::Serialize;
use vetcard_core::{Role, SessionSnapshot};

/// Layout declared on a route variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// No chrome at all (auth pages, not-found).
    Bare,
    Public,
    Owner,
    /// Shared by veterinarians and admins.
    Common,
    Partner,
    /// Chosen per request by [`select_layout`].
    Conditional,
}

/// The concrete chrome a page is rendered in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellKind {
    Bare,
    Public,
    Owner,
    Common,
    Partner,
}

impl ShellKind {
    /// Private shells carry the sidebar navigation.
    pub fn is_private(self) -> bool {
        matches!(self, ShellKind::Owner | ShellKind::Common | ShellKind::Partner)
    }
}

impl LayoutKind {
    pub fn resolve(self, session: &SessionSnapshot) -> ShellKind {
        match self {
            LayoutKind::Bare => ShellKind::Bare,
            LayoutKind::Public => ShellKind::Public,
            LayoutKind::Owner => ShellKind::Owner,
            LayoutKind::Common => ShellKind::Common,
            LayoutKind::Partner => ShellKind::Partner,
            LayoutKind::Conditional => select_layout(session),
        }
    }
}

/// Chrome for routes open to guests and members alike. Never redirects.
pub fn select_layout(session: &SessionSnapshot) -> ShellKind {
    match session.role() {
        None => ShellKind::Public,
        Some(role) => role_shell(role),
    }
}

/// The private shell a role works in.
pub fn role_shell(role: Role) -> ShellKind {
    match role {
        Role::Owner => ShellKind::Owner,
        Role::Veterinarian => ShellKind::Common,
        Role::Partner => ShellKind::Partner,
        Role::Admin => ShellKind::Common,
    }
}
