//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional)
//!     → environment (BACKEND_URL, PORT, ...)
//!     → command-line flags
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AdapterConfig, BackendConfig, LimitsConfig, ListenerConfig, LogFormat, NormalizerConfig,
    ObservabilityConfig, ProxyConfig, TimeoutConfig,
};
