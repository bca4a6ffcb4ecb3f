//! In-process stand-in for the backend auth endpoints.
//!
//! Used when no API URL is configured (static hosting / demo mode) and by the
//! tests. Only the auth surface is served; any other endpoint answers 404 so
//! callers see a normal API error.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::client::{ApiError, endpoints};
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method};

/// Passwords accepted for every demo account.
pub const DEMO_PASSWORDS: [&str; 2] = ["password123", "admin123"];

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: u64,
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: u8,
}

impl MockUser {
    fn profile(&self) -> Value {
        json!({
            "id": self.id,
            "profile_id": self.id,
            "username": self.username,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "role": self.role,
        })
    }
}

/// One demo account per role.
pub fn demo_users() -> Vec<MockUser> {
    vec![
        MockUser {
            id: 1,
            username: "petowner",
            email: "owner@vetcard.local",
            first_name: "Ivan",
            last_name: "Petrov",
            role: 1,
        },
        MockUser {
            id: 2,
            username: "vet",
            email: "vet@vetcard.local",
            first_name: "Anna",
            last_name: "Sidorova",
            role: 2,
        },
        MockUser {
            id: 3,
            username: "partner",
            email: "partner@vetcard.local",
            first_name: "Zoo",
            last_name: "Market",
            role: 3,
        },
        MockUser {
            id: 4,
            username: "admin",
            email: "admin@vetcard.local",
            first_name: "Site",
            last_name: "Admin",
            role: 4,
        },
    ]
}

/// Live refresh tokens kept by the demo backend; the oldest is dropped first.
pub const MAX_GRANTS: usize = 1024;

/// One login: a refresh token and the single access token currently valid
/// under it.
#[derive(Debug)]
struct Grant {
    user_id: u64,
    access: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    /// access token -> refresh token of its grant
    access: HashMap<String, String>,
    grants: HashMap<String, Grant>,
    /// refresh tokens, oldest first
    order: VecDeque<String>,
    refresh_calls: u64,
}

impl MockState {
    fn open_grant(&mut self, user_id: u64) -> (String, String) {
        while self.grants.len() >= MAX_GRANTS {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.close_grant(&oldest);
        }

        let access = issue_token();
        let refresh = issue_token();
        self.access.insert(access.clone(), refresh.clone());
        self.grants.insert(
            refresh.clone(),
            Grant {
                user_id,
                access: Some(access.clone()),
            },
        );
        self.order.push_back(refresh.clone());
        (access, refresh)
    }

    fn close_grant(&mut self, refresh: &str) {
        if let Some(access) = self.grants.remove(refresh).and_then(|grant| grant.access) {
            self.access.remove(&access);
        }
    }

    /// Issue a new access token under `refresh`, retiring the previous one.
    fn rotate_access(&mut self, refresh: &str) -> Option<String> {
        let grant = self.grants.get_mut(refresh)?;
        let access = issue_token();
        if let Some(previous) = grant.access.replace(access.clone()) {
            self.access.remove(&previous);
        }
        self.access.insert(access.clone(), refresh.to_string());
        Some(access)
    }

    fn user_for_access(&self, access: &str) -> Option<u64> {
        self.access
            .get(access)
            .and_then(|refresh| self.grants.get(refresh))
            .map(|grant| grant.user_id)
    }
}

fn issue_token() -> String {
    format!("mock_token_{}", Uuid::now_v7().simple())
}

#[derive(Debug)]
pub struct MockTransport {
    users: Vec<MockUser>,
    latency: Duration,
    state: Mutex<MockState>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_users(demo_users())
    }

    pub fn with_users(users: Vec<MockUser>) -> Self {
        Self {
            users,
            latency: Duration::ZERO,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Delay every response, to imitate a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Invalidate all issued access tokens (refresh tokens stay valid).
    pub fn expire_access_tokens(&self) {
        let mut state = self.state();
        state.access.clear();
        for grant in state.grants.values_mut() {
            grant.access = None;
        }
    }

    /// Invalidate every grant, access tokens included.
    pub fn revoke_refresh_tokens(&self) {
        let mut state = self.state();
        state.access.clear();
        state.grants.clear();
        state.order.clear();
    }

    pub fn refresh_calls(&self) -> u64 {
        self.state().refresh_calls
    }

    /// Number of live grants (refresh tokens).
    pub fn live_grants(&self) -> usize {
        self.state().grants.len()
    }

    /// Number of live access tokens.
    pub fn live_access_tokens(&self) -> usize {
        self.state().access.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn obtain_token(&self, body: Option<&Value>) -> ApiResponse {
        let field = |name: &str| body.and_then(|b| b.get(name)).and_then(Value::as_str);
        let (Some(username), Some(password)) = (field("username"), field("password")) else {
            return detail(400, "username and password are required");
        };

        let Some(user) = self.users.iter().find(|u| u.username == username) else {
            return detail(401, "Invalid username or password");
        };
        if !DEMO_PASSWORDS.contains(&password) {
            return detail(401, "Invalid username or password");
        }

        let (access, refresh) = self.state().open_grant(user.id);
        ApiResponse::json(200, json!({ "access": access, "refresh": refresh }))
    }

    fn refresh_token(&self, body: Option<&Value>) -> ApiResponse {
        let mut state = self.state();
        state.refresh_calls += 1;

        let presented = body.and_then(|b| b.get("refresh")).and_then(Value::as_str);
        let Some(access) = presented.and_then(|token| state.rotate_access(token)) else {
            return detail(401, "Token is invalid or expired");
        };

        ApiResponse::json(200, json!({ "access": access }))
    }

    fn profile(&self, bearer: Option<&str>) -> ApiResponse {
        let user_id = bearer.and_then(|token| self.state().user_for_access(token));
        let user = user_id.and_then(|id| self.users.iter().find(|u| u.id == id));
        match user {
            Some(user) => ApiResponse::json(200, user.profile()),
            None => detail(401, "Authentication credentials were not provided or expired"),
        }
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let path = normalize(&request.path);
        let response = match (request.method, path) {
            (Method::Post, p) if p == normalize(endpoints::TOKEN) => self.obtain_token(request.body.as_ref()),
            (Method::Post, p) if p == normalize(endpoints::REFRESH) => self.refresh_token(request.body.as_ref()),
            (Method::Get, p) if p == normalize(endpoints::PROFILE) => self.profile(bearer),
            (method, p) => detail(404, &format!("{method} {p} is not available in the mock API")),
        };
        Ok(response)
    }
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

fn detail(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(status, json!({ "detail": message }))
}
