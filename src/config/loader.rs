//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Environment variable overriding `listener.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `adapter.rpc_url`.
pub const ENV_RPC_URL: &str = "MEVACOIND_RPC_URL";
/// Environment variable overriding `adapter.bind_address`.
pub const ENV_ADAPTER_BIND: &str = "ADAPTER_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: `{value}`")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file. Missing sections fall back to their defaults.
pub fn load_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build a configuration from an optional file and the process environment.
///
/// The result is not validated yet: callers layer CLI flags on top and then
/// call [`finalize`].
pub fn load_layered(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => ProxyConfig::default(),
    };
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.is_empty()) {
        config.backend.url = url;
    }
    if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }
    if let Some(rpc_url) = lookup(ENV_RPC_URL).filter(|v| !v.is_empty()) {
        config.adapter.rpc_url = rpc_url;
    }
    if let Some(bind) = lookup(ENV_ADAPTER_BIND).filter(|v| !v.is_empty()) {
        config.adapter.bind_address = bind;
    }
    Ok(())
}

/// Validate a fully layered configuration.
pub fn finalize(config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("BACKEND_URL", "http://daemon:9000"), ("PORT", "8080")]),
        )
        .unwrap();

        assert_eq!(config.backend.url, "http://daemon:9000");
        assert_eq!(config.listener.port, 8080);
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, env(&[("BACKEND_URL", ""), ("PORT", "")])).unwrap();

        assert_eq!(config.backend.url, "http://127.0.0.1:17081");
        assert_eq!(config.listener.port, 18081);
    }

    #[test]
    fn test_bad_port_env() {
        let mut config = ProxyConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "PORT", .. }));
    }

    #[test]
    fn test_load_file_then_finalize() {
        let path = std::env::temp_dir().join(format!("proxy-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[listener]\nport = 19000\n").unwrap();

        let config = finalize(load_file(&path).unwrap()).unwrap();
        assert_eq!(config.listener.port, 19000);

        fs::write(&path, "[backend]\nurl = \"ftp://x\"\n").unwrap();
        let err = finalize(load_file(&path).unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("http or https scheme"));

        fs::write(&path, "[listener\n").unwrap();
        assert!(matches!(load_file(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_file(&path);
    }
}
