// Configuration module entry point
// Loads layered configuration and owns the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{AppInfoConfig, Config, LoggingConfig, ServerConfig, ShutdownConfig, StorageConfig};

/// Default config file (without extension) when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the specified file path (without extension),
    /// honouring the `PORT` environment variable
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::load_with(config_path, std::env::var("PORT").ok())
    }

    /// Load configuration with an explicit port override
    ///
    /// Sources, lowest priority first: built-in defaults, the optional config
    /// file, `APP_*` environment variables, then `port_override`.
    pub fn load_with(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("shutdown.drain_timeout_secs", 5)?
            .set_default("storage.data_file", "data.json")?
            .set_default("app.name", "example")?
            .set_default("app.version", "1.0.0")?
            .set_override_option("server.port", port_override)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub const fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown.drain_timeout_secs)
    }
}
