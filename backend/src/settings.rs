//! Process settings loaded via OrthoConfig.
//!
//! Values come from `--flags`, `LOVELIO_*` environment variables or a
//! configuration file; every field is optional and falls back to a default
//! suitable for local development.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::ws::OriginPolicy;
use crate::outbound::store::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_POOL_MAX_SIZE: u32 = 16;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// An allowed origin is not an absolute URL.
    #[error("invalid allowed origin: {0}")]
    Origin(#[from] url::ParseError),
    /// The pool must hold at least one connection.
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Server, store and WebSocket settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOVELIO")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Redis connection URL for the counter store.
    pub redis_url: Option<String>,
    /// Maximum number of pooled Redis connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub pool_timeout_secs: Option<u64>,
    /// Comma-separated origins allowed to open WebSockets; empty allows any.
    pub allowed_origins: Option<String>,
}

impl AppSettings {
    /// Parse the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the Redis URL, falling back to a local instance.
    pub fn redis_url(&self) -> &str {
        self.redis_url.as_deref().unwrap_or(DEFAULT_REDIS_URL)
    }

    /// Build the connection pool configuration.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        if max_size == 0 {
            return Err(SettingsError::EmptyPool);
        }
        let timeout = self.pool_timeout_secs.unwrap_or(DEFAULT_POOL_TIMEOUT_SECS);
        Ok(PoolConfig::new(self.redis_url())
            .with_max_size(max_size)
            .with_connection_timeout(Duration::from_secs(timeout)))
    }

    /// Build the WebSocket origin policy.
    pub fn origin_policy(&self) -> Result<OriginPolicy, SettingsError> {
        let origins: Vec<&str> = self
            .allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();
        if origins.is_empty() {
            return Ok(OriginPolicy::any());
        }
        Ok(OriginPolicy::allow(origins)?)
    }
}
