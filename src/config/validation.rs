//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the backend origin can have a path appended to it
//! - Validate value ranges (timeouts > 0, ports valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.url `{url}` is not a valid URL: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("backend.url `{0}` must use the http or https scheme")]
    UnsupportedScheme(String),

    #[error("backend.url `{0}` must be a bare origin without query or fragment")]
    BackendNotOrigin(String),

    #[error("listener.port must be non-zero")]
    ZeroPort,

    #[error("limits.max_body_bytes must be non-zero")]
    ZeroBodyLimit,

    #[error("{0} must be greater than zero when set")]
    ZeroTimeout(&'static str),

    #[error("normalizer.max_depth must be non-zero")]
    ZeroDepth,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("adapter.rpc_url `{0}` is not a valid URL")]
    InvalidRpcUrl(String),

    #[error("adapter.bind_address `{0}` is not a socket address")]
    InvalidAdapterAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.url) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::UnsupportedScheme(config.backend.url.clone()));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::InvalidBackendUrl {
                    url: config.backend.url.clone(),
                    reason: "missing host".to_string(),
                });
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::BackendNotOrigin(config.backend.url.clone()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBackendUrl {
            url: config.backend.url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.normalizer.max_depth == 0 {
        errors.push(ValidationError::ZeroDepth);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if Url::parse(&config.adapter.rpc_url).is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.adapter.rpc_url.clone()));
    }
    if config.adapter.socket_addr().is_none() {
        errors.push(ValidationError::InvalidAdapterAddress(
            config.adapter.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
