//! Per-request spans.
//!
//! Each request runs inside a span carrying a fresh UUID v4 `request_id`.
//! The id lives in the span only; it is never added to forwarded headers.

use axum::http::Request;
use tracing::Span;
use uuid::Uuid;

/// Span factory for `tower_http::trace::TraceLayer::make_span_with`.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}
