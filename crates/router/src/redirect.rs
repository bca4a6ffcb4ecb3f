//! Redirect targets: login with a return target, and per-role landing pages.

use vetcard_core::Role;

pub const LOGIN_PATH: &str = "/login";
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// Where a role lands after login when no return target is given.
pub fn default_landing(role: Role) -> &'static str {
    match role {
        Role::Owner => "/dashboard",
        Role::Veterinarian => "/vet/mydata",
        Role::Partner => "/partner/mydata",
        Role::Admin => "/admin",
    }
}

/// Where an authenticated principal is sent when its role may not see a page.
///
/// Uniformly the role's landing page, which every role can always render.
pub fn denied_target(role: Role) -> &'static str {
    default_landing(role)
}

/// `/login?returnUrl=<encoded requested>`.
pub fn login_redirect(requested: &str) -> String {
    format!(
        "{LOGIN_PATH}?{RETURN_URL_PARAM}={}",
        urlencoding::encode(requested)
    )
}

/// Decoded `returnUrl` from a raw query string, if present and non-empty.
pub fn return_url_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == RETURN_URL_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Accept only application-relative targets (`/x`, not `//host` or `http:`).
///
/// Control characters and backslashes are refused too: browsers drop tabs and
/// newlines and read `\` as `/`, so `/\t/host` would become `//host`.
pub fn sanitize_return_url(candidate: &str) -> Option<&str> {
    let safe = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.chars().any(|c| c.is_control() || c == '\\');
    safe.then_some(candidate)
}

/// Where to go after a successful login.
pub fn post_login_target(role: Role, return_url: Option<&str>) -> String {
    match return_url.and_then(sanitize_return_url) {
        Some(target) => target.to_string(),
        None => default_landing(role).to_string(),
    }
}
