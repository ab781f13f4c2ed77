//! Todoissimus server
//!
//! Serves the built front-end, a generated service worker, and a
//! same-origin proxy to the Todoist REST API under `/api`.

pub mod assets;
pub mod config;
pub mod error;
pub mod routes;
pub mod tls;
pub mod upstream;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::assets::ServiceWorker;
use crate::config::Config;
use crate::upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Upstream,
    pub service_worker: Arc<ServiceWorker>,
}

impl AppState {
    pub fn new(upstream: Upstream, service_worker: ServiceWorker) -> Self {
        Self {
            upstream,
            service_worker: Arc::new(service_worker),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let upstream = Upstream::new(
            config.api_base.clone(),
            config.server_token().map(str::to_string),
        );
        let worker = ServiceWorker::build(&config.static_dir);
        tracing::info!("service worker cache {}", worker.cache_name);
        Self::new(upstream, worker)
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health))
        .route("/tasks", get(routes::list_tasks).post(routes::create_task))
        .route(
            "/tasks/{id}",
            post(routes::update_task).patch(routes::update_task),
        )
        .route("/tasks/{id}/close", post(routes::close_task))
        .route("/projects", get(routes::list_projects))
        .route("/comments", get(routes::list_comments));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .route("/service-worker.js", get(routes::service_worker))
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
