//! One navigation decision: route lookup, guard, layout and shell.

use serde::Serialize;
use vetcard_core::SessionSnapshot;

use crate::guard::{AccessGuard, GuardDecision};
use crate::layout::ShellKind;
use crate::page::Page;
use crate::path::{RouteParams, requested_url, split_url};
use crate::redirect;
use crate::shell::{Shell, SidebarState};
use crate::table::RouteTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderPlan {
    pub path: String,
    pub page: Page,
    pub params: RouteParams,
    pub shell: Shell,
    /// HTTP-style status: 200, or 404 for the catch-all page.
    pub status: u16,
    /// Decoded, safe `returnUrl` handed to the login page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    LoginRequired,
    RoleDenied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Navigation {
    Render(RenderPlan),
    Redirect {
        location: String,
        /// Replace the current history entry instead of pushing a new one.
        replace: bool,
        reason: RedirectReason,
    },
}

impl Navigation {
    pub fn location(&self) -> Option<&str> {
        match self {
            Navigation::Render(_) => None,
            Navigation::Redirect { location, .. } => Some(location),
        }
    }

    pub fn plan(&self) -> Option<&RenderPlan> {
        match self {
            Navigation::Render(plan) => Some(plan),
            Navigation::Redirect { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
}

impl Navigator {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide what `url` (path, optional query and fragment) shows for
    /// `session`. Never fails: unknown paths render the not-found page.
    pub fn navigate(&self, url: &str, session: &SessionSnapshot, sidebar: SidebarState) -> Navigation {
        let (path, query) = split_url(url);
        let requested = requested_url(url);

        let Some(hit) = self.table.lookup(path) else {
            tracing::debug!(path, "no route, rendering not-found");
            return Navigation::Render(RenderPlan {
                path: path.to_string(),
                page: Page::NotFound,
                params: RouteParams::default(),
                shell: Shell::compose(ShellKind::Bare, session, sidebar),
                status: 404,
                return_url: None,
            });
        };

        let mut refusal = None;
        for variant in &hit.entry.variants {
            match AccessGuard::new(variant.access).check(session, &requested) {
                GuardDecision::Render => {
                    let kind = variant.layout.resolve(session);
                    tracing::debug!(
                        path,
                        page = ?hit.entry.page,
                        shell = ?kind,
                        "render"
                    );
                    return Navigation::Render(RenderPlan {
                        path: path.to_string(),
                        page: hit.entry.page,
                        params: hit.params,
                        shell: Shell::compose(kind, session, sidebar),
                        status: 200,
                        return_url: query
                            .filter(|_| hit.entry.page == Page::Login)
                            .and_then(login_return_url),
                    });
                }
                GuardDecision::RedirectToLogin { location } => {
                    refusal.get_or_insert((location, RedirectReason::LoginRequired));
                }
                GuardDecision::RedirectDenied { location } => {
                    refusal.get_or_insert((location, RedirectReason::RoleDenied));
                }
            }
        }

        let (location, reason) = refusal
            .unwrap_or_else(|| (redirect::login_redirect(&requested), RedirectReason::LoginRequired));
        tracing::debug!(path, %location, ?reason, "redirect");
        Navigation::Redirect {
            location,
            replace: true,
            reason,
        }
    }
}

fn login_return_url(query: &str) -> Option<String> {
    redirect::return_url_from_query(query).filter(|url| redirect::sanitize_return_url(url).is_some())
}
