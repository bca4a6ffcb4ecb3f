use proptest::prelude::*;
use vetcard_core::{Principal, PrincipalId, Role, SessionSnapshot};
use vetcard_router::{
    Access, LayoutKind, Navigation, Navigator, Page, RedirectReason, RouteTable, ShellKind, SidebarState,
    default_landing, post_login_target, return_url_from_query, select_layout,
};

fn navigator() -> Navigator {
    Navigator::new(RouteTable::application().unwrap())
}

fn member(role: Role) -> SessionSnapshot {
    SessionSnapshot::authenticated(Principal::new(PrincipalId::new(42), "user", "Test User", role))
}

fn go(url: &str, session: &SessionSnapshot) -> Navigation {
    navigator().navigate(url, session, SidebarState::default())
}

/// A concrete URL for every table entry, with placeholders filled in.
fn concrete_paths() -> Vec<String> {
    RouteTable::application()
        .unwrap()
        .entries()
        .iter()
        .map(|e| {
            e.pattern
                .as_str()
                .split('/')
                .map(|s| if s.starts_with(':') { "7" } else { s })
                .collect::<Vec<_>>()
                .join("/")
        })
        .map(|p| if p.is_empty() { "/".to_string() } else { p })
        .collect()
}

#[test]
fn guest_on_dashboard_goes_to_login() {
    assert_eq!(
        go("/dashboard", &SessionSnapshot::guest()),
        Navigation::Redirect {
            location: "/login?returnUrl=%2Fdashboard".into(),
            replace: true,
            reason: RedirectReason::LoginRequired,
        }
    );
}

#[test]
fn veterinarian_on_dashboard_is_redirected() {
    let nav = go("/dashboard", &member(Role::Veterinarian));
    assert_eq!(nav.location(), Some("/vet/mydata"));
}

#[test]
fn admin_opens_user_profile() {
    let nav = go("/admin/users/42", &member(Role::Admin));
    let plan = nav.plan().unwrap();
    assert_eq!(plan.page, Page::AdminUserProfile);
    assert_eq!(plan.params.get("userId"), Some("42"));
    assert_eq!(plan.shell.kind, ShellKind::Common);
}

#[test]
fn guest_reads_articles_in_public_layout() {
    let nav = go("/articles", &SessionSnapshot::guest());
    let plan = nav.plan().unwrap();
    assert_eq!(plan.page, Page::Articles);
    assert_eq!(plan.shell.kind, ShellKind::Public);
    assert!(plan.shell.sidebar.is_none());
}

#[test]
fn partner_reads_articles_in_partner_layout() {
    let nav = go("/articles", &member(Role::Partner));
    let plan = nav.plan().unwrap();
    assert_eq!(plan.page, Page::Articles);
    assert_eq!(plan.shell.kind, ShellKind::Partner);
    assert_eq!(plan.shell.navigation[0].links[0].path, "/partner/mydata");
}

#[test]
fn every_landing_page_renders_for_its_role() {
    for role in Role::ALL {
        let nav = go(default_landing(role), &member(role));
        assert!(nav.plan().is_some(), "{role} is bounced from its own landing page");
    }
}

#[test]
fn assistant_is_open_to_any_member() {
    for role in Role::ALL {
        let plan = go("/assistant", &member(role)).plan().cloned().unwrap();
        assert_eq!(plan.shell.kind, ShellKind::Common);
    }
    assert!(go("/assistant", &SessionSnapshot::guest()).location().is_some());
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn session_strategy() -> impl Strategy<Value = SessionSnapshot> {
    prop_oneof![Just(SessionSnapshot::guest()), role_strategy().prop_map(member)]
}

proptest! {
    /// A member is redirected exactly when no variant admits its role, and
    /// never towards login.
    #[test]
    fn wrong_role_is_always_redirected(role in role_strategy(), index in any::<prop::sample::Index>()) {
        let paths = concrete_paths();
        let path = &paths[index.index(paths.len())];
        let table = RouteTable::application().unwrap();
        let entry = table.lookup(path).unwrap().entry;
        let admitted = entry.variants.iter().any(|v| v.access.permits_role(role));

        match go(path, &member(role)) {
            Navigation::Render(_) => prop_assert!(admitted),
            Navigation::Redirect { location, reason, replace } => {
                prop_assert!(!admitted);
                prop_assert!(replace);
                prop_assert_eq!(reason, RedirectReason::RoleDenied);
                prop_assert_eq!(location, default_landing(role));
            }
        }
    }

    #[test]
    fn public_entries_render_for_everyone(session in session_strategy(), index in any::<prop::sample::Index>()) {
        let table = RouteTable::application().unwrap();
        let public: Vec<_> = table
            .entries()
            .iter()
            .filter(|e| e.variants.iter().any(|v| v.access == Access::Public))
            .collect();
        let entry = public[index.index(public.len())];
        let path = entry.pattern.as_str().replace(":id", "1");

        let nav = go(&path, &session);
        prop_assert_eq!(nav.plan().map(|p| p.page), Some(entry.page));
    }

    /// The `returnUrl` a guest is sent to login with decodes back to the
    /// requested URL, and login lands there.
    #[test]
    fn guest_return_url_round_trips(
        pet in 1u32..100_000,
        tab in "[a-z]{1,8}",
        role in role_strategy(),
    ) {
        let requested = format!("/mypets/edit/{pet}?tab={tab}");
        let location = go(&requested, &SessionSnapshot::guest()).location().map(str::to_string).unwrap();
        let (path, query) = location.split_once('?').unwrap();
        prop_assert_eq!(path, "/login");

        let decoded = return_url_from_query(query);
        prop_assert_eq!(decoded.as_deref(), Some(requested.as_str()));
        prop_assert_eq!(post_login_target(role, decoded.as_deref()), requested);
    }

    #[test]
    fn layout_selection_is_pure(session in session_strategy(), other in session_strategy()) {
        let first = select_layout(&session);
        let _ = select_layout(&other);
        prop_assert_eq!(select_layout(&session), first);
        prop_assert_eq!(LayoutKind::Conditional.resolve(&session), first);
    }
}
