//! Sidebar navigation per role.

use serde::Serialize;
use vetcard_core::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub path: &'static str,
    pub icon: &'static str,
    /// Translation key rendered by the client.
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub title: &'static str,
    pub links: Vec<NavLink>,
}

const fn link(path: &'static str, icon: &'static str, label: &'static str) -> NavLink {
    NavLink { path, icon, label }
}

const TOOLS: [NavLink; 5] = [
    link("/assistant", "robot", "sidebar.assistant"),
    link("/articles", "newspaper", "sidebar.articles"),
    link("/products", "shopping-bag", "sidebar.products"),
    link("/my-products", "box", "sidebar.myProducts"),
    link("/specialists", "stethoscope", "sidebar.specialists"),
];

fn section(title: &'static str, links: &[NavLink]) -> NavSection {
    NavSection {
        title,
        links: links.to_vec(),
    }
}

/// Sections shown in the private shell for `role`: its own block first,
/// then the shared tools.
pub fn navigation_for(role: Role) -> Vec<NavSection> {
    let own = match role {
        Role::Owner => section(
            "sidebar.management",
            &[
                link("/dashboard", "home", "sidebar.home"),
                link("/mypets", "paw", "sidebar.mypets"),
                link("/reminders", "bell", "sidebar.reminders"),
            ],
        ),
        Role::Veterinarian => section(
            "sidebar.workspace",
            &[
                link("/vet/mydata", "user-md", "sidebar.mydata"),
                link("/vet/cabinet", "briefcase", "sidebar.cabinet"),
            ],
        ),
        Role::Partner => section(
            "sidebar.workspace",
            &[
                link("/partner/mydata", "user-md", "sidebar.mydata"),
                link("/partner/cabinet", "building", "sidebar.cabinet"),
            ],
        ),
        Role::Admin => section("sidebar.admin", &[link("/admin", "users", "sidebar.adminPanel")]),
    };

    vec![own, section("sidebar.tools", &TOOLS)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_sees_management_then_tools() {
        let sections = navigation_for(Role::Owner);
        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, ["sidebar.management", "sidebar.tools"]);

        let paths: Vec<_> = sections[0].links.iter().map(|l| l.path).collect();
        assert_eq!(paths, ["/dashboard", "/mypets", "/reminders"]);
    }

    #[test]
    fn partner_workspace_links() {
        let sections = navigation_for(Role::Partner);
        assert_eq!(sections[0].title, "sidebar.workspace");
        assert_eq!(sections[0].links[1].icon, "building");
    }

    #[test]
    fn every_role_gets_the_tools_block() {
        for role in Role::ALL {
            let sections = navigation_for(role);
            let tools = sections.last().unwrap();
            assert_eq!(tools.title, "sidebar.tools");
            assert_eq!(tools.links.len(), 5);
            assert_eq!(tools.links[0].path, "/assistant");
        }
    }
}
