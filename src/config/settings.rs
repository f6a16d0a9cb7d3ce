//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Event360 REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Where sessions and conversation state live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Event listing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    pub page_size: usize,
    pub featured_count: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub admin_tools: bool,
    pub image_uploads: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit TOML file, still honouring environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("EVENT360")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::Event360Error> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            api: ApiConfig {
                base_url: "https://event-360-kca7.onrender.com".to_string(),
                timeout_seconds: 30,
                user_agent: "Event360-Bot/1.0".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis_url: "redis://localhost:6379".to_string(),
                prefix: "event360:".to_string(),
                ttl_seconds: 7 * 24 * 3600,
            },
            listing: ListingConfig {
                page_size: 12,
                featured_count: 3,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                json: false,
            },
            features: FeaturesConfig {
                admin_tools: false,
                image_uploads: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.timeout_seconds, 30);
        assert_eq!(settings.listing.page_size, 12);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[bot]\ntoken = \"123:abc\"\n\n[storage]\nbackend = \"redis\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.bot.token, "123:abc");
        assert_eq!(settings.storage.backend, StorageBackend::Redis);
        assert_eq!(settings.storage.prefix, "event360:");
        assert_eq!(settings.api.base_url, "https://event-360-kca7.onrender.com");
    }
}
