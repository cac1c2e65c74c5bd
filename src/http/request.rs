//! Inbound request parsing and outbound request construction.
//!
//! # Responsibilities
//! - Read the inbound body under the configured size ceiling
//! - Parse JSON and URL-encoded bodies into a JSON value (see [`crate::http::form`])
//! - Copy headers (minus `host`) and rebuild the target URI on the backend
//! - Decide whether a body is forwarded at all
//!
//! # Design Decisions
//! - Only `application/json` and `application/x-www-form-urlencoded` bodies are
//!   parsed; any other payload yields no body and is not forwarded
//! - GET never forwards a body; other methods forward a non-empty parsed body
//!   re-serialized as JSON
//! - `content-length` and `transfer-encoding` describe the inbound framing and
//!   are recomputed for the outbound body instead of copied

use axum::body::{Body, Bytes};
use axum::http::{header, request::Parts, HeaderMap, HeaderValue, Method, Request, Uri};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;

use crate::http::error::ProxyError;
use crate::http::form::parse_form;

/// Media type of JSON bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";
/// Media type of URL-encoded form bodies.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// A request as received from the client, with its body parsed.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Path plus query, exactly as received.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl InboundRequest {
    /// Read the body (at most `limit` bytes) and parse it.
    pub async fn read(request: Request<Body>, limit: usize) -> Result<Self, ProxyError> {
        let (parts, body) = request.into_parts();
        let bytes = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return Err(ProxyError::PayloadTooLarge { limit });
            }
            Err(e) => return Err(ProxyError::RequestBody(e.to_string())),
        };
        Self::from_parts(parts, &bytes)
    }

    pub fn from_parts(parts: Parts, bytes: &[u8]) -> Result<Self, ProxyError> {
        let body = parse_body(&parts.headers, bytes)?;
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Self {
            method: parts.method,
            path_and_query,
            headers: parts.headers,
            body,
        })
    }

    /// The body to forward, if any.
    pub fn forwarded_body(&self) -> Option<&Value> {
        if self.method == Method::GET {
            return None;
        }
        self.body.as_ref().filter(|body| has_fields(body))
    }
}

/// The request sent to the backend.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Derive the backend request from an inbound one.
    ///
    /// The target is `origin` with the inbound path-plus-query appended as is.
    pub fn build(origin: &str, inbound: &InboundRequest) -> Result<Self, ProxyError> {
        let target = format!("{}{}", origin, inbound.path_and_query);
        let uri: Uri = target.parse().map_err(|e: axum::http::uri::InvalidUri| {
            ProxyError::InvalidTarget {
                target: target.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut headers = copy_headers(&inbound.headers);

        let body = match inbound.forwarded_body() {
            Some(value) => {
                let encoded = serde_json::to_vec(value).map_err(ProxyError::Encode)?;
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
                Some(Bytes::from(encoded))
            }
            None => None,
        };

        Ok(Self {
            method: inbound.method.clone(),
            uri,
            headers,
            body,
        })
    }

    pub fn into_request(self) -> Request<Body> {
        let mut request = Request::new(match self.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        });
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Copy every header except `host` and the inbound framing headers.
///
/// `HeaderMap` keys are case-insensitive, so `Host` and `HOST` are dropped too.
pub fn copy_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if name == header::HOST || name == header::CONTENT_LENGTH || name == header::TRANSFER_ENCODING
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Parse a request body according to its declared media type.
pub fn parse_body(headers: &HeaderMap, bytes: &[u8]) -> Result<Option<Value>, ProxyError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some(JSON_MEDIA_TYPE) => {
            let value: Value = serde_json::from_slice(bytes)
                .map_err(|e| ProxyError::MalformedBody(e.to_string()))?;
            match value {
                Value::Object(_) | Value::Array(_) => Ok(Some(value)),
                _ => Err(ProxyError::MalformedBody(
                    "JSON body must be an object or an array".to_string(),
                )),
            }
        }
        Some(FORM_MEDIA_TYPE) => Ok(Some(parse_form(bytes))),
        _ => Ok(None),
    }
}

/// True for a non-empty object or array.
fn has_fields(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}
