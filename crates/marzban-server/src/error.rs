//! Server and API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marzban_config::ConfigError;
use marzban_core::{ERROR_INVALID_INPUT, ERROR_IO};
use marzban_lifecycle::NormalizeError;
use marzban_panel::PanelError;
use serde_json::{Value, json};
use tracing::debug;

/// Error returned by a gateway operation.
///
/// Rendered as `{"error": <body>}` where the body is the panel's response
/// verbatim for upstream failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] PanelError),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl ApiError {
    /// HTTP status for the caller.
    ///
    /// Upstream error statuses pass through. Failures without a usable
    /// upstream status become 502, local client failures 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(PanelError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(err) => err
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        }
    }

    /// Error kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream(err) => err.kind(),
            Self::InvalidInput(_) => ERROR_INVALID_INPUT,
        }
    }

    /// Body placed under `"error"` in the response.
    pub fn body(&self) -> Value {
        match self {
            Self::Upstream(err) => err.body(),
            Self::InvalidInput(msg) => Value::String(msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        debug!(kind = self.kind(), status = status.as_u16(), "request failed");
        (status, Json(json!({ "error": self.body() }))).into_response()
    }
}

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("panel: {0}")]
    Panel(#[from] PanelError),
}

impl ServerError {
    /// Error kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => ERROR_IO,
            Self::Config(err) => err.kind(),
            Self::Panel(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use marzban_core::{ERROR_CLIENT, ERROR_UPSTREAM_AUTH, ERROR_UPSTREAM_REQUEST};

    use super::*;

    fn request(status: Option<u16>) -> ApiError {
        ApiError::Upstream(PanelError::Request {
            status,
            body: json!({"detail": "x"}),
        })
    }

    #[test]
    fn upstream_status_passes_through() {
        assert_eq!(request(Some(404)).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(request(Some(409)).status_code(), StatusCode::CONFLICT);
        assert_eq!(request(Some(422)).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(request(Some(503)).status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_or_successful_status_is_bad_gateway() {
        assert_eq!(request(None).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(request(Some(200)).status_code(), StatusCode::BAD_GATEWAY);
        let auth = ApiError::Upstream(PanelError::Auth {
            status: Some(200),
            body: json!({}),
        });
        assert_eq!(auth.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn kinds_and_bodies() {
        assert_eq!(request(Some(404)).kind(), ERROR_UPSTREAM_REQUEST);
        assert_eq!(request(Some(404)).body(), json!({"detail": "x"}));

        let auth = ApiError::Upstream(PanelError::Auth {
            status: Some(401),
            body: json!({"detail": "Incorrect username or password"}),
        });
        assert_eq!(auth.kind(), ERROR_UPSTREAM_AUTH);
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);

        let client = ApiError::Upstream(PanelError::client("bad url"));
        assert_eq!(client.kind(), ERROR_CLIENT);
        assert_eq!(client.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid = ApiError::InvalidInput("username is required".into());
        assert_eq!(invalid.kind(), ERROR_INVALID_INPUT);
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.body(), json!("username is required"));
    }

    #[test]
    fn server_error_kinds() {
        let io = ServerError::from(std::io::Error::other("address in use"));
        assert_eq!(io.kind(), ERROR_IO);

        let config = ServerError::from(ConfigError::Validation("bad listen".into()));
        assert_eq!(config.kind(), marzban_core::ERROR_CONFIG);

        let panel = ServerError::from(PanelError::client("bad url"));
        assert_eq!(panel.kind(), ERROR_CLIENT);
    }

    #[test]
    fn normalize_error_is_invalid_input() {
        let err = ApiError::from(NormalizeError::NonPositiveMonths(0));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
