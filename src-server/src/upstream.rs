//! Forwarding of `/api/*` requests to the Todoist REST API

use axum::{
    body::Bytes,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::ProxyError;

/// Header the browser uses to pass its own token through the proxy
pub const AUTH_HEADER: &str = "x-auth-token";

/// Upstream API endpoint plus the server-side token
#[derive(Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

/// Upstream response relayed verbatim to the caller
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl Upstream {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Server token first, then the caller's `X-Auth-Token`
    pub fn resolve_token(&self, headers: &HeaderMap) -> Result<String, ProxyError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(ProxyError::MissingToken)
    }

    /// Send `method path?query` upstream and hand back whatever it answers.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
        headers: &HeaderMap,
    ) -> Result<Relayed, ProxyError> {
        let token = self.resolve_token(headers)?;
        let url = format!("{}{}", self.base, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        if !status.is_success() {
            tracing::warn!("upstream {} answered {}", path, status);
        }
        Ok(Relayed {
            status,
            content_type,
            body,
        })
    }
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Parse a request body for forwarding; empty bodies and `{}` forward nothing.
pub fn json_body(raw: &[u8]) -> Result<Option<Value>, ProxyError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(raw)?;
    match &value {
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => Ok(Some(value)),
    }
}
