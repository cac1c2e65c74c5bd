//! Mevacoin JSON proxy library.
//!
//! A transparent reverse proxy for the daemon's HTTP API that guarantees a
//! `fee.amount` on every transaction-like object in JSON responses, plus a
//! small REST → JSON-RPC wallet adapter.

pub mod adapter;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod normalize;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use normalize::Normalizer;
