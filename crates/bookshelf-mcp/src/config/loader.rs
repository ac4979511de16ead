//! Server configuration: TOML file, defaults, and catalog resolution.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use bookshelf::Catalog;

use crate::transport::adapter::DEFAULT_HIGH_WATER_MARK;
use crate::transport::sse::{DEFAULT_POST_PATH, SSE_PATH};
use crate::types::{McpError, McpResult};

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Server configuration. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: String,
    /// Path clients POST requests to; announced in the `endpoint` event.
    pub post_path: String,
    /// Outbound bytes per stream above which the peer's input is paused.
    pub high_water_mark: usize,
    /// Seconds between keep-alive comments; 0 disables them.
    pub keep_alive_secs: u64,
    /// JSON catalog file; the built-in sample catalog when unset.
    pub catalog: Option<String>,
    /// Log level when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            post_path: DEFAULT_POST_PATH.to_string(),
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            keep_alive_secs: 0,
            catalog: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Keep-alive period, if enabled.
    pub fn keep_alive(&self) -> Option<Duration> {
        (self.keep_alive_secs > 0).then(|| Duration::from_secs(self.keep_alive_secs))
    }

    /// Reject values the router cannot serve.
    pub fn validate(&self) -> McpResult<()> {
        if !self.post_path.starts_with('/') {
            return Err(McpError::Config(format!(
                "post_path must start with '/': {}",
                self.post_path
            )));
        }
        if self.post_path == SSE_PATH || self.post_path == "/health" {
            return Err(McpError::Config(format!(
                "post_path collides with a reserved route: {}",
                self.post_path
            )));
        }
        if self.high_water_mark == 0 {
            return Err(McpError::Config(
                "high_water_mark must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file, or defaults when no path is given.
pub fn load_config(path: Option<&str>) -> McpResult<ServerConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                McpError::Config(format!("Failed to read config file {path}: {e}"))
            })?;
            toml::from_str::<ServerConfig>(&raw)
                .map_err(|e| McpError::Config(format!("Invalid config file {path}: {e}")))?
        }
        None => ServerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load the catalog at `path`, or the built-in sample catalog.
pub fn resolve_catalog(path: Option<&str>) -> McpResult<Catalog> {
    match path {
        Some(path) => {
            tracing::info!("Loading catalog: {}", Path::new(path).display());
            Ok(Catalog::load(path)?)
        }
        None => {
            tracing::info!("Using built-in sample catalog");
            Ok(Catalog::sample())
        }
    }
}
