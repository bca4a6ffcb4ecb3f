use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use vetcard_web::app::{AppState, build_app};
use vetcard_web::config::WebConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(WebConfig::default()).await
    }

    async fn spawn_with(config: WebConfig) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let state = AppState::from_config(&config).expect("failed to build state");
        let app = build_app(Arc::new(state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn login(&self, username: &str, return_url: Option<&str>) -> Value {
        let res = self
            .post(
                "/session/login",
                json!({ "username": username, "password": "password123", "return_url": return_url }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn guest_is_redirected_to_login_with_return_url() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/dashboard").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login?returnUrl=%2Fdashboard");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["type"], "redirect");
    assert_eq!(body["replace"], true);
    assert_eq!(body["reason"], "login_required");
}

#[tokio::test]
async fn guest_reads_articles_in_public_shell() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/articles").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"], "articles");
    assert_eq!(body["shell"]["kind"], "public");
    assert_eq!(body["shell"]["header"]["kind"], "guest");
    assert!(body["shell"].get("sidebar").is_none());
}

#[tokio::test]
async fn unknown_path_is_not_found_page() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/definitely/not/here").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"], "not-found");
}

#[tokio::test]
async fn login_lands_on_return_url_and_unlocks_owner_pages() {
    let srv = TestServer::spawn().await;

    let body = srv.login("petowner", Some("/mypets/edit/3")).await;
    assert_eq!(body["location"], "/mypets/edit/3");
    assert_eq!(body["principal"]["role"], 1);
    assert_eq!(body["principal"]["name"], "Ivan Petrov");

    let session: Value = srv.get("/session").await.json().await.unwrap();
    assert_eq!(session["is_authenticated"], true);

    let res = srv.get("/mypets/edit/3").await;
    assert_eq!(res.status(), StatusCode::OK);
    let plan: Value = res.json().await.unwrap();
    assert_eq!(plan["page"], "edit-pet");
    assert_eq!(plan["params"]["id"], "3");
    assert_eq!(plan["shell"]["kind"], "owner");
    assert_eq!(plan["shell"]["header"]["profile_link"], "/userprofile");
}

#[tokio::test]
async fn login_without_return_url_lands_on_role_home() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.login("vet", None).await["location"], "/vet/mydata");
}

#[tokio::test]
async fn offsite_return_url_is_ignored() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.login("partner", Some("//evil.example")).await["location"], "/partner/mydata");
    assert_eq!(srv.login("partner", Some("/\t/evil.example")).await["location"], "/partner/mydata");
    assert_eq!(srv.login("partner", Some("/\\evil.example")).await["location"], "/partner/mydata");
}

#[tokio::test]
async fn guarded_page_round_trips_through_login() {
    let srv = TestServer::spawn().await;

    let res = srv.get("/dashboard").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let login_url = location(&res).to_string();

    let res = srv.get(&login_url).await;
    assert_eq!(res.status(), StatusCode::OK);
    let plan: Value = res.json().await.unwrap();
    assert_eq!(plan["page"], "login");
    assert_eq!(plan["return_url"], "/dashboard");

    let res = srv
        .post(
            &format!("/session/login?{}", login_url.split_once('?').unwrap().1),
            json!({ "username": "petowner", "password": "password123" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["location"], "/dashboard");

    let landed = srv.get(body["location"].as_str().unwrap()).await;
    assert_eq!(landed.status(), StatusCode::OK);
    let plan: Value = landed.json().await.unwrap();
    assert_eq!(plan["page"], "dashboard");
}

#[tokio::test]
async fn smuggled_return_url_in_query_is_ignored() {
    let srv = TestServer::spawn().await;

    let plan: Value = srv
        .get("/login?returnUrl=%2F%09%2Fevil.example")
        .await
        .json()
        .await
        .unwrap();
    assert!(plan.get("return_url").is_none());

    let body: Value = srv
        .post(
            "/session/login?returnUrl=%2F%09%2Fevil.example",
            json!({ "username": "petowner", "password": "password123" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["location"], "/dashboard");
}

#[tokio::test]
async fn wrong_password_is_401_and_stays_guest() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post("/session/login", json!({ "username": "vet", "password": "nope" }))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_credentials");

    let session: Value = srv.get("/session").await.json().await.unwrap();
    assert_eq!(session["is_authenticated"], false);
    assert_eq!(session["principal"], Value::Null);
}

#[tokio::test]
async fn wrong_role_is_sent_to_own_landing_page() {
    let srv = TestServer::spawn().await;
    srv.login("partner", None).await;

    let res = srv.get("/dashboard").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/partner/mydata");
}

#[tokio::test]
async fn logout_returns_to_root_as_guest() {
    let srv = TestServer::spawn().await;
    srv.login("admin", None).await;
    assert_eq!(srv.get("/admin/users/4").await.status(), StatusCode::OK);

    let body: Value = srv.post("/session/logout", json!({})).await.json().await.unwrap();
    assert_eq!(body["location"], "/");

    let session: Value = srv.get("/session").await.json().await.unwrap();
    assert_eq!(session["is_authenticated"], false);
    assert_eq!(srv.get("/admin/users/4").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn sidebar_toggle_shows_up_in_private_shell() {
    let srv = TestServer::spawn().await;
    srv.login("vet", None).await;

    let toggled: Value = srv.post("/ui/sidebar/toggle", json!({})).await.json().await.unwrap();
    assert_eq!(toggled["open"], true);

    let plan: Value = srv.get("/vet/cabinet").await.json().await.unwrap();
    assert_eq!(plan["shell"]["kind"], "common");
    assert_eq!(plan["shell"]["sidebar"]["open"], true);
    assert_eq!(plan["shell"]["navigation"][0]["title"], "sidebar.workspace");

    let toggled: Value = srv.post("/ui/sidebar/toggle", json!({})).await.json().await.unwrap();
    assert_eq!(toggled["open"], false);
}

#[tokio::test]
async fn explain_reports_each_variant() {
    let srv = TestServer::spawn().await;

    let body: Value = srv
        .get("/policy/explain?path=/my-products&role=admin")
        .await
        .json()
        .await
        .unwrap();
    let variants = body["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 3);
    assert!(variants.iter().all(|v| v["decision"]["decision"] == "redirect_denied"));
    assert_eq!(body["outcome"]["location"], "/admin");

    let res = srv.get("/policy/explain?path=/&role=janitor").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn explain_decisions_match_outcome_for_unnormalized_path() {
    let srv = TestServer::spawn().await;

    let body: Value = srv
        .get("/policy/explain?path=%2Fdashboard%2F%3Ftab%3D1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["path"], "/dashboard");
    assert_eq!(body["outcome"]["location"], "/login?returnUrl=%2Fdashboard%3Ftab%3D1");

    let variants = body["variants"].as_array().unwrap();
    assert!(!variants.is_empty());
    for variant in variants {
        assert_eq!(variant["decision"]["decision"], "redirect_to_login");
        assert_eq!(variant["decision"]["location"], body["outcome"]["location"]);
    }
}

#[tokio::test]
async fn route_policy_lists_the_table() {
    let srv = TestServer::spawn().await;

    let body: Value = srv.get("/policy/routes").await.json().await.unwrap();
    let routes = body["routes"].as_array().unwrap();
    let admin = routes.iter().find(|r| r["pattern"] == "/admin/users/:userId").unwrap();
    assert_eq!(admin["page"], "admin-user-profile");
    assert_eq!(admin["variants"][0]["access"]["kind"], "roles");
    assert_eq!(admin["variants"][0]["access"]["roles"], json!([4]));
}

#[tokio::test]
async fn non_get_on_page_route_is_rejected() {
    let srv = TestServer::spawn().await;
    let res = srv.post("/dashboard", json!({})).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = WebConfig {
        session_file: Some(dir.path().join("session.json")),
        ..WebConfig::default()
    };

    {
        let srv = TestServer::spawn_with(config.clone()).await;
        srv.login("petowner", None).await;
    }

    let srv = TestServer::spawn_with(config).await;
    let session: Value = srv.get("/session").await.json().await.unwrap();
    assert_eq!(session["is_authenticated"], true);
    assert_eq!(session["principal"]["username"], "petowner");
    assert_eq!(srv.get("/dashboard").await.status(), StatusCode::OK);
}
