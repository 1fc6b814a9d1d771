//! Startup configuration
//!
//! Values are read once from the process environment (after `.env` is
//! loaded) and handed to the components that need them.

use std::env;
use std::net::SocketAddr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const STORE_URL_VAR: &str = "SUPABASE_URL";
const STORE_KEY_VAR: &str = "SUPABASE_ANON_KEY";
const BIND_ADDR_VAR: &str = "TRACKER_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid configuration for {name}: {reason}")]
  Invalid { name: String, reason: String },
}

/// ---------------------------------------------------------------------------
/// Data Store Connection
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Base URL of the hosted store, without trailing slash
  pub base_url: String,
  pub anon_key: String,
}

impl StoreConfig {
  pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      anon_key: anon_key.into(),
    }
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let base_url = required_var(STORE_URL_VAR)?;
    let anon_key = required_var(STORE_KEY_VAR)?;

    url::Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
      name: STORE_URL_VAR.into(),
      reason: e.to_string(),
    })?;

    Ok(Self::new(base_url, anon_key))
  }
}

/// ---------------------------------------------------------------------------
/// HTTP Server
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_addr: SocketAddr,
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let raw = env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let bind_addr = raw.parse().map_err(|_| ConfigError::Invalid {
      name: BIND_ADDR_VAR.into(),
      reason: format!("'{}' is not a socket address", raw),
    })?;
    Ok(Self { bind_addr })
  }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
  env::var(name)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| ConfigError::MissingConfig(name.into()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
