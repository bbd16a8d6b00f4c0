//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::loader::ConfigLoader;

/// Origin value that allows cross-origin requests from anywhere.
pub const ANY_ORIGIN: &str = "*";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Cross-origin resource sharing configuration.
///
/// The default allows any origin, which suits local development. Production
/// deployments should list their front-end origins explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. `["*"]` allows every origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Whether credentialed requests are allowed. Requires explicit origins.
    #[serde(default)]
    pub allow_credentials: bool,
}

impl CorsConfig {
    /// Whether the wildcard origin is configured.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: false,
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![ANY_ORIGIN.to_string()]
}

/// Background job executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum number of simulations running at the same time.
    #[serde(default = "default_max_workers")]
    pub max_workers: u32,

    /// Maximum number of scheduled jobs waiting to fire (0 = unlimited).
    #[serde(default)]
    pub max_queue_size: u64,

    /// Move jobs whose simulation fails to the `failed` status instead of
    /// leaving them pending.
    #[serde(default)]
    pub mark_failed: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            max_queue_size: 0,
            mark_failed: false,
        }
    }
}

fn default_max_workers() -> u32 {
    4
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write a daily rolling log file in addition to the console.
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Log directory. Defaults to `~/.simjobs/logs`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolved log directory, with `~` expanded.
    pub fn log_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
            None => data_dir().join("logs"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: default_true(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The `~/.simjobs` directory, or `.simjobs` when no home directory is known.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".simjobs"))
        .unwrap_or_else(|| PathBuf::from(".simjobs"))
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
