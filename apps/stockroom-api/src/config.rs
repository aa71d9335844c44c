//! Stockroom API configuration module.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file
//! (`stockroom.toml`, or the path in `STOCKROOM_CONFIG`), then environment
//! variables prefixed with `STOCKROOM_` (e.g. `STOCKROOM_PORT=9000`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use stockroom_core::MAX_STOCK_PAGE_SIZE;
use stockroom_db::DbConfig;

/// Config file read when `STOCKROOM_CONFIG` is not set.
const DEFAULT_CONFIG_FILE: &str = "stockroom.toml";

/// Stockroom API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Title shown on rendered pages
    pub app_name: String,

    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// Page size used when a listing request doesn't pass `size`
    pub default_page_size: i64,

    /// Default log filter; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            app_name: "Stockroom".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_path: "stockroom.db".to_string(),
            max_connections: 5,
            default_page_size: stockroom_core::DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("STOCKROOM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("STOCKROOM").try_parsing(true));

        Self::from_builder(builder)
    }

    /// Builds and validates a configuration from prepared sources.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        if !(1..=MAX_STOCK_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(ConfigError::InvalidValue("default_page_size".to_string()));
        }

        Ok(())
    }

    /// Address the server listens on.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(&self.database_path);
        if config.is_in_memory() {
            return DbConfig::in_memory();
        }
        config.max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
