use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failure of a proxied request.
///
/// Rendered as `{"error": "<message>"}` with a status matching the cause.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing server token (TODOIST_TOKEN)")]
    MissingToken,

    #[error("invalid task id: {0}")]
    InvalidId(String),

    #[error("invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingToken => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidId(_) | ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("{self}");
        }
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}
