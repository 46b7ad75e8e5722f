use crate::error::Result;
use crate::messaging::amqp::DEFAULT_AMQP_URL;
use crate::messaging::DEFAULT_DB_PATH;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bus: BusConfig,
    pub log: LogConfig,
    pub logging: LoggingConfig,
    /// Agents registered on startup. A list rather than a table so agent
    /// names keep their case.
    #[serde(default)]
    pub agents: Vec<AgentRegistration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRegistration {
    pub name: String,
    pub queue: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusBackend {
    Memory,
    Amqp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    pub backend: BusBackend,
    pub amqp_url: String,
    /// Ends a broker receive loop after this long without a delivery
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
    pub publisher_confirms: bool,
    /// Unacknowledged deliveries the broker may push to one consumer
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: u16,
}

fn default_prefetch_count() -> u16 {
    1
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            backend: BusBackend::Memory,
            amqp_url: DEFAULT_AMQP_URL.to_string(),
            idle_timeout_ms: None,
            publisher_confirms: true,
            prefetch_count: default_prefetch_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Self::defaults()?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Defaults overlaid with an inline TOML document
    pub fn from_toml(document: &str) -> Result<Self> {
        let config = Self::defaults()?
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("bus.backend", "memory")?
            .set_default("bus.amqp_url", DEFAULT_AMQP_URL)?
            .set_default("bus.publisher_confirms", true)?
            .set_default("bus.prefetch_count", 1)?
            .set_default("log.db_path", DEFAULT_DB_PATH)?
            .set_default("logging.level", "info")?)
    }
}
