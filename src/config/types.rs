// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub shutdown: ShutdownConfig,
    pub storage: StorageConfig,
    pub app: AppInfoConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Shutdown behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct ShutdownConfig {
    /// Seconds to wait for in-flight requests before forcing exit
    pub drain_timeout_secs: u64,
}

/// Document store location
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_file: String,
}

/// Identity reported by `GET /info`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppInfoConfig {
    pub name: String,
    pub version: String,
}
