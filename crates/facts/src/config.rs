//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/facts.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! max_page_size = 100
//! cors_allow_origins = []
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Only `[db]` is required. See [`load_config`] for validation rules.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest `size` accepted by the autocomplete endpoint.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_page_size: default_max_page_size(),
            cors_allow_origins: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Tracing filter directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// A configuration using defaults everywhere except the database path.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db: DbConfig { path: path.into() },
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.db.path.as_os_str().is_empty() {
        anyhow::bail!("db.path must not be empty");
    }

    config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("server.bind is not a socket address: '{}'", config.server.bind))?;

    if config.server.max_page_size < 1 {
        anyhow::bail!("server.max_page_size must be >= 1");
    }

    for origin in &config.server.cors_allow_origins {
        HeaderValue::from_str(origin)
            .with_context(|| format!("server.cors_allow_origins has invalid origin: '{}'", origin))?;
    }

    EnvFilter::try_new(&config.logging.level)
        .with_context(|| format!("logging.level is not a valid filter: '{}'", config.logging.level))?;

    Ok(())
}
