//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{Event360Error, Result};
use super::{Settings, StorageBackend};

/// Longest TTL accepted for stored state (one year)
pub const MAX_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_api_config(&settings.api)?;
    validate_storage_config(&settings.storage)?;
    validate_listing_config(&settings.listing)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(Event360Error::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(Event360Error::Config(
            "API base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| Event360Error::Config(format!("Invalid API base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(Event360Error::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.backend == StorageBackend::Redis && config.redis_url.is_empty() {
        return Err(Event360Error::Config(
            "Redis URL is required for the redis storage backend".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(Event360Error::Config(
            "Session TTL must be greater than 0".to_string()
        ));
    }

    if config.ttl_seconds > MAX_TTL_SECONDS {
        return Err(Event360Error::Config(
            format!("Session TTL must be at most {} seconds", MAX_TTL_SECONDS)
        ));
    }

    Ok(())
}

/// Validate listing configuration
fn validate_listing_config(config: &super::ListingConfig) -> Result<()> {
    if config.page_size == 0 {
        return Err(Event360Error::Config(
            "Page size must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(Event360Error::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(Event360Error::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123:abc".to_string();
        settings
    }

    #[test]
    fn test_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_token() {
        let settings = Settings::default();
        assert_matches!(validate_settings(&settings), Err(Event360Error::Config(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut settings = valid_settings();
        settings.api.base_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        let mut settings = valid_settings();
        settings.storage.ttl_seconds = u64::MAX;
        assert_matches!(validate_settings(&settings), Err(Event360Error::Config(_)));

        settings.storage.ttl_seconds = MAX_TTL_SECONDS;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_zero_page_size() {
        let mut settings = valid_settings();
        settings.listing.page_size = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
