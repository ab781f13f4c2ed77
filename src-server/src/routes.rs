//! `/api/*` handlers and the generated service worker

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::upstream::{json_body, Relayed};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub label: Option<String>,
    pub project_id: Option<String>,
    pub filter: Option<String>,
}

impl TaskQuery {
    /// Non-empty parameters in upstream order
    fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("label", self.label.as_deref()),
            ("project_id", self.project_id.as_deref()),
            ("filter", self.filter.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.filter(|v| !v.is_empty()).map(|v| (k, v)))
        .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub token_configured: bool,
}

/// Todoist ids are opaque but never need escaping
fn checked_id(id: &str) -> Result<&str, ProxyError> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        Ok(id)
    } else {
        Err(ProxyError::InvalidId(id.to_string()))
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Result<Relayed, ProxyError> {
    state
        .upstream
        .forward(Method::GET, "/tasks", &query.pairs(), None, &headers)
        .await
}

pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Relayed, ProxyError> {
    let body = json_body(&body)?;
    state
        .upstream
        .forward(Method::POST, "/tasks", &[], body, &headers)
        .await
}

pub async fn close_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Relayed, ProxyError> {
    let path = format!("/tasks/{}/close", checked_id(&id)?);
    state
        .upstream
        .forward(Method::POST, &path, &[], Some(serde_json::json!({})), &headers)
        .await
}

/// Serves both `POST` and `PATCH`; the method is forwarded as received.
pub async fn update_task(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Relayed, ProxyError> {
    let path = format!("/tasks/{}", checked_id(&id)?);
    let body = json_body(&body)?;
    state
        .upstream
        .forward(method, &path, &[], body, &headers)
        .await
}

pub async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Relayed, ProxyError> {
    state
        .upstream
        .forward(Method::GET, "/projects", &[], None, &headers)
        .await
}

pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CommentQuery>,
) -> Result<Relayed, ProxyError> {
    let task_id = query.task_id.unwrap_or_default();
    let pairs = [("task_id", task_id.as_str())];
    state
        .upstream
        .forward(Method::GET, "/comments", &pairs, None, &headers)
        .await
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        token_configured: state.upstream.has_token(),
    })
}

pub async fn service_worker(State(state): State<AppState>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        state.service_worker.script.clone(),
    )
}
