//! Proxy tests against a fake Todoist API served on an ephemeral port

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::assets::ServiceWorker;
use crate::routes::Health;
use crate::upstream::Upstream;
use crate::{build_router, AppState};

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    uri: String,
    auth: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn fake_todoist(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let seen = Seen {
        method: method.clone(),
        uri: uri.to_string(),
        auth: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    log.lock().unwrap().push(seen);

    match (method, uri.path()) {
        (Method::GET, "/tasks") => Json(json!([{"id": "1", "content": "milk"}])).into_response(),
        (Method::POST, "/tasks") => {
            let mut task: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
            task["id"] = json!("99");
            Json(task).into_response()
        }
        (Method::POST, p) if p.ends_with("/close") => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, "/projects") => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
        (_, p) if p.starts_with("/tasks/") => Json(json!({"updated": true})).into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct Harness {
    proxy: String,
    log: Log,
    client: reqwest::Client,
    _static_dir: tempfile::TempDir,
}

impl Harness {
    async fn start(server_token: Option<&str>) -> Self {
        let log: Log = Arc::default();
        let upstream_addr = serve(
            Router::new()
                .fallback(fake_todoist)
                .with_state(log.clone()),
        )
        .await;
        Self::with_upstream(format!("http://{}", upstream_addr), server_token, log).await
    }

    async fn with_upstream(base: String, server_token: Option<&str>, log: Log) -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("index.html"), "<h1>todoissimus</h1>").unwrap();

        let state = AppState::new(
            Upstream::new(base, server_token.map(str::to_string)),
            ServiceWorker::build(static_dir.path()),
        );
        let addr = serve(build_router(state, static_dir.path())).await;
        Self {
            proxy: format!("http://{}", addr),
            log,
            client: reqwest::Client::new(),
            _static_dir: static_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.proxy, path)
    }

    fn seen(&self) -> Vec<Seen> {
        self.log.lock().unwrap().clone()
    }
}

#[tokio::test]
async fn test_list_tasks_forwards_query_and_server_token() {
    let h = Harness::start(Some("server-secret")).await;

    let resp = h
        .client
        .get(h.url("/api/tasks?label=home&project_id=&filter="))
        .header("X-Auth-Token", "browser-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert!(resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("application/json"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body[0]["content"], "milk");

    let seen = h.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].uri, "/tasks?label=home");
    assert_eq!(seen[0].auth.as_deref(), Some("Bearer server-secret"));
}

#[tokio::test]
async fn test_browser_token_used_without_server_token() {
    let h = Harness::start(None).await;

    let resp = h
        .client
        .get(h.url("/api/tasks?filter=today"))
        .header("X-Auth-Token", "browser-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let seen = h.seen();
    assert_eq!(seen[0].uri, "/tasks?filter=today");
    assert_eq!(seen[0].auth.as_deref(), Some("Bearer browser-token"));
}

#[tokio::test]
async fn test_missing_token_fails_without_calling_upstream() {
    let h = Harness::start(None).await;

    let resp = h.client.get(h.url("/api/projects")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "missing server token (TODOIST_TOKEN)");
    assert!(h.seen().is_empty());
}

#[tokio::test]
async fn test_create_forwards_json_body() {
    let h = Harness::start(Some("t")).await;

    let resp = h
        .client
        .post(h.url("/api/tasks"))
        .json(&json!({"content": "eggs", "labels": ["home"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], "99");
    assert_eq!(created["labels"][0], "home");

    let seen = h.seen();
    assert_eq!(seen[0].method, Method::POST);
    let forwarded: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(forwarded["content"], "eggs");
}

#[tokio::test]
async fn test_close_relays_no_content() {
    let h = Harness::start(Some("t")).await;

    let resp = h
        .client
        .post(h.url("/api/tasks/42/close"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

    let seen = h.seen();
    assert_eq!(seen[0].uri, "/tasks/42/close");
    assert_eq!(seen[0].body, "{}");
}

#[tokio::test]
async fn test_patch_and_post_update_keep_method() {
    let h = Harness::start(Some("t")).await;

    for method in [reqwest::Method::PATCH, reqwest::Method::POST] {
        let resp = h
            .client
            .request(method, h.url("/api/tasks/7"))
            .json(&json!({"content": "renamed"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    let seen = h.seen();
    assert_eq!(seen[0].method, Method::PATCH);
    assert_eq!(seen[1].method, Method::POST);
    assert!(seen.iter().all(|s| s.uri == "/tasks/7"));
}

#[tokio::test]
async fn test_upstream_error_status_and_body_relayed() {
    let h = Harness::start(Some("t")).await;

    let resp = h.client.get(h.url("/api/projects")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(resp.text().await.unwrap(), "Forbidden");
}

#[tokio::test]
async fn test_comments_forward_task_id() {
    let h = Harness::start(Some("t")).await;

    let resp = h
        .client
        .get(h.url("/api/comments?task_id=12"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(h.seen()[0].uri, "/comments?task_id=12");
}

#[tokio::test]
async fn test_invalid_id_rejected() {
    let h = Harness::start(Some("t")).await;

    let resp = h
        .client
        .post(h.url("/api/tasks/a%20b/close"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(h.seen().is_empty());
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let h = Harness::with_upstream(format!("http://{}", dead), Some("t"), Log::default()).await;
    let resp = h.client.get(h.url("/api/tasks")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("upstream request failed"));
}

#[tokio::test]
async fn test_health_reports_token() {
    let h = Harness::start(None).await;
    let health: Health = h
        .client
        .get(h.url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
    assert!(!health.token_configured);
}

#[tokio::test]
async fn test_service_worker_and_spa_fallback() {
    let h = Harness::start(None).await;

    let resp = h.client.get(h.url("/service-worker.js")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let script = resp.text().await.unwrap();
    assert!(script.contains("todoissimus-"));
    assert!(script.contains("/index.html"));

    let page = h
        .client
        .get(h.url("/some/client/route"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(page, "<h1>todoissimus</h1>");
}
