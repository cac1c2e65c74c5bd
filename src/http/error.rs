//! Relay error type and its client-visible envelope.
//!
//! Every failure on the relay path ends up here. Backend, decode and encode
//! failures share the `proxy_error` envelope with status 502; problems with
//! the inbound body are reported as 400/413 before anything is forwarded.

use std::error::Error as _;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors produced while relaying one request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("invalid backend target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("backend request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read backend response: {0}")]
    UpstreamBody(#[source] axum::Error),

    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("failed to inflate backend response: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("backend returned invalid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProxyError {
    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::RequestBody(_) | ProxyError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Machine-readable `error` field of the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::PayloadTooLarge { .. } => "payload_too_large",
            ProxyError::RequestBody(_) | ProxyError::MalformedBody(_) => "bad_request",
            _ => "proxy_error",
        }
    }

    /// True for failures caused by the inbound request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// The error and all of its sources, joined with `": "`.
    pub fn message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[tokio::test]
    async fn test_envelope_shape() {
        let err = ProxyError::Timeout(Duration::from_secs(3));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "proxy_error");
        assert_eq!(value["message"], "backend did not answer within 3s");
    }

    #[test]
    fn test_decode_error_is_proxy_error() {
        let source = serde_json::from_slice::<Value>(b"{oops").unwrap_err();
        let err = ProxyError::Decode(source);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "proxy_error");
        assert!(err.message().starts_with("backend returned invalid JSON"));
    }

    #[test]
    fn test_inbound_errors() {
        let too_large = ProxyError::PayloadTooLarge { limit: 10 };
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.code(), "payload_too_large");
        assert!(too_large.is_client_error());

        let malformed = ProxyError::MalformedBody("expected object".into());
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.code(), "bad_request");
    }
}
