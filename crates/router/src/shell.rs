//! Page chrome: header, navigation and sidebar around the content slot.

use serde::Serialize;
use vetcard_core::{PrincipalId, Role, SessionSnapshot};

use crate::layout::ShellKind;
use crate::nav::{NavSection, navigation_for};
use crate::redirect::LOGIN_PATH;

pub const REGISTER_PATH: &str = "/register";

/// Where the header's name link points for a role.
pub fn profile_link(role: Role, id: Option<PrincipalId>) -> String {
    match role {
        Role::Admin => match id {
            Some(id) => format!("/admin/users/{id}"),
            None => "/admin".to_string(),
        },
        Role::Veterinarian => "/vet/mydata".to_string(),
        Role::Partner => "/partner/mydata".to_string(),
        Role::Owner => "/userprofile".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Header {
    Guest {
        login: &'static str,
        register: &'static str,
    },
    Member {
        display_name: String,
        profile_link: String,
        role: Role,
    },
}

impl Header {
    pub fn for_session(session: &SessionSnapshot) -> Self {
        match session.principal() {
            None => Header::Guest {
                login: LOGIN_PATH,
                register: REGISTER_PATH,
            },
            Some(principal) => Header::Member {
                display_name: principal.display_name.clone(),
                profile_link: profile_link(principal.role, Some(principal.id)),
                role: principal.role,
            },
        }
    }
}

/// Mobile sidebar visibility. Starts closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SidebarState {
    pub open: bool,
}

impl SidebarState {
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shell {
    pub kind: ShellKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub navigation: Vec<NavSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<SidebarState>,
}

impl Shell {
    /// Bare pages get no chrome; the public shell gets a header only; the
    /// private shells add the role's navigation and the sidebar state.
    pub fn compose(kind: ShellKind, session: &SessionSnapshot, sidebar: SidebarState) -> Self {
        if kind == ShellKind::Bare {
            return Self {
                kind,
                header: None,
                navigation: Vec::new(),
                sidebar: None,
            };
        }

        let header = Some(Header::for_session(session));
        let navigation = match session.role() {
            Some(role) if kind.is_private() => navigation_for(role),
            _ => Vec::new(),
        };

        Self {
            kind,
            header,
            navigation,
            sidebar: kind.is_private().then_some(sidebar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetcard_core::Principal;

    fn member(id: u64, role: Role) -> SessionSnapshot {
        SessionSnapshot::authenticated(Principal::new(PrincipalId::new(id), "u", "Anna Sidorova", role))
    }

    #[test]
    fn profile_links_per_role() {
        assert_eq!(profile_link(Role::Admin, Some(PrincipalId::new(42))), "/admin/users/42");
        assert_eq!(profile_link(Role::Admin, None), "/admin");
        assert_eq!(profile_link(Role::Veterinarian, Some(PrincipalId::new(2))), "/vet/mydata");
        assert_eq!(profile_link(Role::Partner, None), "/partner/mydata");
        assert_eq!(profile_link(Role::Owner, Some(PrincipalId::new(1))), "/userprofile");
    }

    #[test]
    fn guest_header_offers_auth_actions() {
        assert_eq!(
            Header::for_session(&SessionSnapshot::guest()),
            Header::Guest {
                login: "/login",
                register: "/register"
            }
        );
    }

    #[test]
    fn member_header_shows_name_and_profile() {
        let Header::Member {
            display_name,
            profile_link,
            ..
        } = Header::for_session(&member(2, Role::Veterinarian))
        else {
            panic!("expected member header");
        };
        assert_eq!(display_name, "Anna Sidorova");
        assert_eq!(profile_link, "/vet/mydata");
    }

    #[test]
    fn public_shell_has_no_sidebar_or_navigation() {
        let shell = Shell::compose(ShellKind::Public, &member(1, Role::Owner), SidebarState::default());
        assert!(shell.navigation.is_empty());
        assert!(shell.sidebar.is_none());
        assert!(shell.header.is_some());
    }

    #[test]
    fn private_shell_carries_role_navigation_and_sidebar() {
        let shell = Shell::compose(ShellKind::Partner, &member(3, Role::Partner), SidebarState { open: true });
        assert_eq!(shell.navigation, navigation_for(Role::Partner));
        assert_eq!(shell.sidebar, Some(SidebarState { open: true }));
    }

    #[test]
    fn bare_shell_is_empty() {
        let shell = Shell::compose(ShellKind::Bare, &member(1, Role::Owner), SidebarState::default());
        assert!(shell.header.is_none());
        assert!(shell.navigation.is_empty());
    }

    #[test]
    fn sidebar_toggles() {
        let mut sidebar = SidebarState::default();
        assert!(sidebar.toggle());
        assert!(!sidebar.toggle());
        sidebar.open();
        assert!(sidebar.open);
        sidebar.close();
        assert!(!sidebar.open);
    }
}
