//! API configuration

use serde::Deserialize;

use core_kernel::{TemporalError, Timezone};

/// Where claims are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Claim storage backend
    pub storage: StorageBackend,
    /// IANA timezone used for "today's claims"
    pub timezone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/claims".to_string(),
            log_level: "info".to_string(),
            storage: StorageBackend::Postgres,
            timezone: "Asia/Shanghai".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables over the defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("storage", "postgres")?
            .set_default("timezone", defaults.timezone)?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured timezone
    pub fn timezone(&self) -> Result<Timezone, TemporalError> {
        Timezone::from_name(&self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.timezone().unwrap().name(), "Asia/Shanghai");
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let config = ApiConfig {
            timezone: "Mars/Olympus".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.timezone().is_err());
    }

    #[test]
    fn test_storage_names() {
        let storage: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(storage, StorageBackend::Memory);
    }
}
