use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// Idle connections get a synthetic `keep-alive` event at this cadence.
pub const KEEP_ALIVE_INTERVAL_SECS: u64 = 60;
/// Per-subscriber frame buffer. A subscriber that falls this far behind is
/// treated as failed and pruned.
pub const SUBSCRIBER_BUFFER: usize = 32;

/// Top-level config (comanda.toml + COMANDA_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComandaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// SSE subscription tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: KEEP_ALIVE_INTERVAL_SECS,
            subscriber_buffer: SUBSCRIBER_BUFFER,
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_keep_alive_secs() -> u64 {
    KEEP_ALIVE_INTERVAL_SECS
}
fn default_subscriber_buffer() -> usize {
    SUBSCRIBER_BUFFER
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.comanda/comanda.db", home)
}

impl ComandaConfig {
    /// Load config from a TOML file with COMANDA_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.comanda/comanda.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ComandaConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("COMANDA_").split("_"))
            .extract()
            .map_err(|e| crate::error::ComandaError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.comanda/comanda.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_section() {
        let config = ComandaConfig::default();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.events.keep_alive_secs, 60);
        assert!(config.database.path.ends_with("comanda.db"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let config: ComandaConfig = Figment::new()
            .merge(Toml::string("[server]\nport = 8080"))
            .extract()
            .expect("extract failed");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.events.subscriber_buffer, SUBSCRIBER_BUFFER);
    }
}
