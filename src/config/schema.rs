//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy
//! and the wallet adapter. All types derive Serde traits for deserialization
//! from config files, and every section falls back to its defaults.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Default backend origin (the daemon's HTTP API).
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:17081";

/// Default proxy listening port.
pub const DEFAULT_PORT: u16 = 18081;

/// Default request body ceiling (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single upstream the proxy forwards to.
    pub backend: BackendConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Fee normalization settings.
    pub normalizer: NormalizerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Wallet adapter service settings.
    pub adapter: AdapterConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Backend origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin the received path-plus-query is appended to, verbatim.
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Timeout configuration. Nothing is bounded unless set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for a proxied request, in seconds.
    pub request_secs: Option<u64>,

    /// Backend connection establishment timeout, in seconds.
    pub connect_secs: Option<u64>,
}

/// Fee normalization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Run the fee pass on JSON responses.
    pub enabled: bool,

    /// Nesting depth after which the walk gives up.
    pub max_depth: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth: 256,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log line format.
    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address of the scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Wallet adapter (REST → JSON-RPC) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Address the adapter listens on.
    pub bind_address: String,

    /// The daemon's JSON-RPC endpoint.
    pub rpc_url: String,
}

impl AdapterConfig {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_address.parse().ok()
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:18082".to_string(),
            rpc_url: format!("{}/json_rpc", DEFAULT_BACKEND_URL),
        }
    }
}
