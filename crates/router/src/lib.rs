//! Route table, access guard, layout selection and page chrome.
//!
//! Everything here is synchronous and pure over a [`SessionSnapshot`]:
//! the same URL and snapshot always produce the same [`Navigation`].
//!
//! [`SessionSnapshot`]: vetcard_core::SessionSnapshot

pub mod error;
pub mod guard;
pub mod layout;
pub mod nav;
pub mod navigator;
pub mod page;
pub mod path;
pub mod redirect;
pub mod shell;
pub mod table;

pub use error::RouteTableError;
pub use guard::{Access, AccessGuard, GuardDecision, GuardState};
pub use layout::{LayoutKind, ShellKind, select_layout};
pub use nav::{NavLink, NavSection, navigation_for};
pub use navigator::{Navigation, Navigator, RedirectReason, RenderPlan};
pub use page::Page;
pub use path::{PathPattern, RouteParams};
pub use redirect::{default_landing, login_redirect, post_login_target, return_url_from_query};
pub use shell::{Header, Shell, SidebarState, profile_link};
pub use table::{RouteEntry, RouteMatch, RouteTable, RouteTableBuilder, RouteVariant};
