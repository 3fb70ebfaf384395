//! Panel error types.

use marzban_core::{ERROR_CLIENT, ERROR_UPSTREAM_AUTH, ERROR_UPSTREAM_REQUEST};
use serde_json::Value;

/// Error talking to the panel.
///
/// `status` is the upstream HTTP status when a response was received.
/// `body` is the upstream response body (JSON when it parses, a string
/// otherwise), or the transport error message when there was no response.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Admin token acquisition failed.
    #[error("upstream auth failed ({}): {body}", status_label(.status))]
    Auth { status: Option<u16>, body: Value },

    /// A user operation was rejected or could not be delivered.
    #[error("upstream request failed ({}): {body}", status_label(.status))]
    Request { status: Option<u16>, body: Value },

    /// The HTTP client could not be built or a URL could not be formed.
    #[error("client: {0}")]
    Client(String),
}

impl PanelError {
    /// Create a client error from any error type.
    #[inline]
    pub fn client<E: std::fmt::Display>(err: E) -> Self {
        Self::Client(err.to_string())
    }

    pub(crate) fn auth_transport(err: reqwest::Error) -> Self {
        Self::Auth {
            status: err.status().map(|s| s.as_u16()),
            body: Value::String(err.to_string()),
        }
    }

    pub(crate) fn request_transport(err: reqwest::Error) -> Self {
        Self::Request {
            status: err.status().map(|s| s.as_u16()),
            body: Value::String(err.to_string()),
        }
    }

    /// Upstream HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Request { status, .. } => *status,
            Self::Client(_) => None,
        }
    }

    /// Upstream body or transport message, suitable for returning to callers.
    pub fn body(&self) -> Value {
        match self {
            Self::Auth { body, .. } | Self::Request { body, .. } => body.clone(),
            Self::Client(msg) => Value::String(msg.clone()),
        }
    }

    /// Whether the panel rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Error kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => ERROR_UPSTREAM_AUTH,
            Self::Request { .. } => ERROR_UPSTREAM_REQUEST,
            Self::Client(_) => ERROR_CLIENT,
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "no response".to_string(), |s| format!("HTTP {s}"))
}

/// Decode a response body: JSON when possible, text otherwise, null when empty.
pub(crate) fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_json_text_and_empty() {
        assert_eq!(decode_body(br#"{"detail":"User not found"}"#), json!({"detail": "User not found"}));
        assert_eq!(decode_body(b"Bad Gateway"), json!("Bad Gateway"));
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b" \n"), Value::Null);
    }

    #[test]
    fn accessors() {
        let err = PanelError::Request {
            status: Some(404),
            body: json!({"detail": "User not found"}),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), json!({"detail": "User not found"}));
        assert_eq!(err.kind(), ERROR_UPSTREAM_REQUEST);
        assert!(!err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            r#"upstream request failed (HTTP 404): {"detail":"User not found"}"#
        );

        let err = PanelError::Auth {
            status: None,
            body: json!("connection refused"),
        };
        assert_eq!(err.kind(), ERROR_UPSTREAM_AUTH);
        assert_eq!(
            err.to_string(),
            r#"upstream auth failed (no response): "connection refused""#
        );

        let err = PanelError::client("bad url");
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), json!("bad url"));
        assert_eq!(err.kind(), ERROR_CLIENT);
    }

    #[test]
    fn unauthorized() {
        let err = PanelError::Request {
            status: Some(401),
            body: json!({"detail": "Could not validate credentials"}),
        };
        assert!(err.is_unauthorized());
    }
}
