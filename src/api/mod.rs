//! Todoist REST Client
//!
//! Talks to the Todoist API directly when the user supplied a token, and to
//! the same-origin proxy (`/api`) otherwise. Endpoints are grouped by
//! resource.

mod projects;
mod tasks;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const TODOIST_API_BASE: &str = "https://api.todoist.com/rest/v2";
pub const PROXY_PREFIX: &str = "/api";

fn log(msg: &str) {
    web_sys::console::log_1(&format!("[API] {}", msg).into());
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("API {method} {path} failed {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Where requests go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiMode {
    /// Straight to Todoist with the user's token
    Direct { token: String },
    /// Through the proxy served from `origin`, which holds the token
    Proxy { origin: String },
}

impl ApiMode {
    /// Direct when a token is given, otherwise the proxy at `origin`
    pub fn choose(token: &str, origin: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            ApiMode::Proxy {
                origin: origin.trim_end_matches('/').to_string(),
            }
        } else {
            ApiMode::Direct {
                token: token.to_string(),
            }
        }
    }

    pub fn base(&self) -> String {
        match self {
            ApiMode::Direct { .. } => TODOIST_API_BASE.to_string(),
            ApiMode::Proxy { origin } => format!("{}{}", origin, PROXY_PREFIX),
        }
    }
}

#[derive(Clone)]
pub struct TodoistClient {
    http: reqwest::Client,
    mode: ApiMode,
}

impl TodoistClient {
    pub fn new(mode: ApiMode) -> Self {
        Self {
            http: reqwest::Client::new(),
            mode,
        }
    }

    /// Client for the token in the settings, relative to the page origin
    pub fn for_token(token: &str) -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::new(ApiMode::choose(token, &origin))
    }

    pub fn mode(&self) -> &ApiMode {
        &self.mode
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.mode.base(), path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .query(query);
        if let ApiMode::Direct { token } = &self.mode {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            };
            log(&err.to_string());
            return Err(err);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST whose answer carries nothing of interest (usually 204)
    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send::<()>(Method::POST, path, &[], None).await?;
        if response.status() != StatusCode::NO_CONTENT {
            log(&format!("{} answered {}", path, response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_selects_direct_mode() {
        let mode = ApiMode::choose(" secret ", "http://localhost:5173");
        assert_eq!(
            mode,
            ApiMode::Direct {
                token: "secret".into()
            }
        );
        assert_eq!(mode.base(), TODOIST_API_BASE);
    }

    #[test]
    fn test_empty_token_selects_proxy() {
        let mode = ApiMode::choose("  ", "http://localhost:5173/");
        assert_eq!(mode.base(), "http://localhost:5173/api");

        let client = TodoistClient::new(mode);
        assert_eq!(client.url("/tasks"), "http://localhost:5173/api/tasks");
    }

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            method: "POST".into(),
            path: "/tasks/1/close".into(),
            status: 403,
            body: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "API POST /tasks/1/close failed 403: Forbidden");
    }
}
