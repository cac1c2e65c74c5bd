//! Backend response handling.
//!
//! # Responsibilities
//! - Branch on the backend `content-type`
//! - JSON: decode, run the fee normalizer, re-encode
//! - Anything else: relay status, headers and bytes untouched
//!
//! # Design Decisions
//! - The JSON test is a literal substring match on `application/json`, not a
//!   parsed media type
//! - A `gzip` or `deflate` JSON body is inflated before decoding; the reply is
//!   sent uncompressed
//! - The JSON branch replies with `content-type: application/json` only; the
//!   other backend headers are dropped (see DESIGN.md, open questions)
//! - A failed normalization pass is logged and the value is sent as it stands

use std::borrow::Cow;
use std::io::Read;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use axum::BoxError;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::http::error::ProxyError;
use crate::http::request::JSON_MEDIA_TYPE;
use crate::normalize::Normalizer;
use crate::observability::metrics;

/// True when the backend declared a JSON body.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .map(|v| contains_json(v.as_bytes()))
        .unwrap_or(false)
}

fn contains_json(value: &[u8]) -> bool {
    value
        .windows(JSON_MEDIA_TYPE.len())
        .any(|window| window == JSON_MEDIA_TYPE.as_bytes())
}

/// Turn a backend response into the reply for the client.
///
/// `normalizer` is `None` when the fee pass is disabled.
pub async fn relay_response<B>(
    response: Response<B>,
    normalizer: Option<&Normalizer>,
) -> Result<Response<Body>, ProxyError>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();
    let bytes = Body::new(body)
        .collect()
        .await
        .map_err(ProxyError::UpstreamBody)?
        .to_bytes();

    if is_json(&parts.headers) {
        let decoded = decode_content(&parts.headers, &bytes)?;
        json_reply(parts.status, &decoded, normalizer)
    } else {
        Ok(passthrough_reply(parts.status, parts.headers, bytes))
    }
}

/// Undo the backend's `content-encoding`, if it is one we can inflate.
///
/// Unknown encodings are left alone and surface as a decode error.
pub fn decode_content<'a>(
    headers: &HeaderMap,
    bytes: &'a [u8],
) -> Result<Cow<'a, [u8]>, ProxyError> {
    let encoding = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase());

    let mut inflated = Vec::new();
    let result = match encoding.as_deref() {
        Some("gzip") | Some("x-gzip") => GzDecoder::new(bytes).read_to_end(&mut inflated),
        // zlib-wrapped per RFC 9110, though some servers send raw deflate
        Some("deflate") if bytes.first().is_some_and(|b| b & 0x0f == 0x08) => {
            ZlibDecoder::new(bytes).read_to_end(&mut inflated)
        }
        Some("deflate") => DeflateDecoder::new(bytes).read_to_end(&mut inflated),
        _ => return Ok(Cow::Borrowed(bytes)),
    };
    result.map_err(ProxyError::Inflate)?;
    Ok(Cow::Owned(inflated))
}

/// Decode, normalize and re-encode a JSON body.
pub fn json_reply(
    status: StatusCode,
    bytes: &[u8],
    normalizer: Option<&Normalizer>,
) -> Result<Response<Body>, ProxyError> {
    let mut value: Value = serde_json::from_slice(bytes).map_err(ProxyError::Decode)?;

    if let Some(normalizer) = normalizer {
        match normalizer.normalize(&mut value) {
            Ok(report) if report.patched() > 0 => {
                tracing::debug!(
                    inserted = report.inserted,
                    completed = report.completed,
                    "Normalized transaction fees"
                );
                metrics::record_normalized(report.patched());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Fee normalization failed, sending response as is");
                metrics::record_normalize_failure();
            }
        }
    }

    let encoded = serde_json::to_vec(&value).map_err(ProxyError::Encode)?;

    let mut reply = Response::new(Body::from(encoded));
    *reply.status_mut() = status;
    reply
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    Ok(reply)
}

/// Relay a non-JSON body with the backend status and every backend header.
pub fn passthrough_reply(status: StatusCode, headers: HeaderMap, bytes: Bytes) -> Response<Body> {
    let mut reply = Response::new(Body::from(bytes));
    *reply.status_mut() = status;
    *reply.headers_mut() = headers;
    reply
}
