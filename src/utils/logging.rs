//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Event360 storefront.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer and must be held for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "event360.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(non_blocking).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking).boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(chat_id: i64, action: &str, details: Option<&str>) {
    info!(
        chat_id = chat_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log login, logout and session expiry
pub fn log_auth_event(chat_id: i64, action: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            chat_id = chat_id,
            action = action,
            details = details,
            "Authentication event: success"
        );
    } else {
        warn!(
            chat_id = chat_id,
            action = action,
            details = details,
            "Authentication event: failure"
        );
    }
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log a completed REST call
pub fn log_api_call(method: &str, path: &str, status: u16, duration_ms: u64) {
    if status < 400 {
        debug!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call completed"
        );
    } else {
        warn!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call failed"
        );
    }
}
