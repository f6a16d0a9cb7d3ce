//! Error handling for Event360
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Event360 storefront
#[derive(Error, Debug)]
pub enum Event360Error {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Event360 API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors reported by the Event360 REST API or the transport underneath it
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for Event360 operations
pub type Result<T> = std::result::Result<T, Event360Error>;

/// Result type alias for raw API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl Event360Error {
    /// True when the backend rejected the session token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Event360Error::Api(ApiError::Unauthorized(_)))
    }

    /// HTTP status reported by the backend, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Event360Error::Api(ApiError::Unauthorized(_)) => Some(401),
            Event360Error::Api(ApiError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Map a failed `/api/events/<id>` lookup, turning a 404 into [`Event360Error::EventNotFound`]
    pub fn event_lookup(event_id: i64, error: ApiError) -> Self {
        match error {
            ApiError::Status { status: 404, .. } => Event360Error::EventNotFound { event_id },
            other => Event360Error::Api(other),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Event360Error::Telegram(_) => true,
            Event360Error::Api(ApiError::Timeout) => true,
            Event360Error::Api(ApiError::ServiceUnavailable) => true,
            Event360Error::Api(ApiError::RequestFailed(_)) => true,
            Event360Error::Api(_) => false,
            Event360Error::Config(_) => false,
            Event360Error::NotAuthenticated => false,
            Event360Error::AuthFailed(_) => false,
            Event360Error::PermissionDenied(_) => false,
            Event360Error::Validation(_) => false,
            Event360Error::EventNotFound { .. } => false,
            Event360Error::InvalidStateTransition { .. } => false,
            Event360Error::Redis(_) => true,
            Event360Error::Http(_) => true,
            Event360Error::Serialization(_) => false,
            Event360Error::Io(_) => true,
            Event360Error::UrlParse(_) => false,
            Event360Error::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Event360Error::Config(_) => ErrorSeverity::Critical,
            Event360Error::NotAuthenticated => ErrorSeverity::Info,
            Event360Error::AuthFailed(_) => ErrorSeverity::Info,
            Event360Error::PermissionDenied(_) => ErrorSeverity::Warning,
            Event360Error::Api(ApiError::Unauthorized(_)) => ErrorSeverity::Warning,
            Event360Error::Api(ApiError::Status { status, .. }) if *status < 500 => ErrorSeverity::Info,
            Event360Error::Validation(_) => ErrorSeverity::Info,
            Event360Error::InvalidInput(_) => ErrorSeverity::Info,
            Event360Error::EventNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Text shown inline to the user when a call fails
    pub fn user_message(&self) -> String {
        match self {
            Event360Error::Api(ApiError::Unauthorized(_)) | Event360Error::NotAuthenticated => {
                "Your session has ended. Please /login to continue.".to_string()
            }
            Event360Error::Api(ApiError::Status { message, .. }) => message.clone(),
            Event360Error::Api(ApiError::Timeout) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Event360Error::Api(ApiError::ServiceUnavailable) => {
                "The Event360 service is unavailable right now.".to_string()
            }
            Event360Error::PermissionDenied(_) => {
                "You don't have permission to access this page.".to_string()
            }
            Event360Error::Validation(message)
            | Event360Error::InvalidInput(message)
            | Event360Error::AuthFailed(message) => message.clone(),
            Event360Error::EventNotFound { .. } => "Event not found.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        let err = Event360Error::from(ApiError::Unauthorized("Token has expired".to_string()));
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert!(err.user_message().contains("/login"));
    }

    #[test]
    fn test_backend_message_is_surfaced() {
        let err = Event360Error::from(ApiError::Status {
            status: 400,
            message: "Event is not pending approval".to_string(),
        });
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "Event is not pending approval");
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_missing_event_lookup() {
        let missing = Event360Error::event_lookup(
            99,
            ApiError::Status { status: 404, message: "Not Found".to_string() },
        );
        assert!(matches!(missing, Event360Error::EventNotFound { event_id: 99 }));
        assert_eq!(missing.user_message(), "Event not found.");
        assert_eq!(missing.severity(), ErrorSeverity::Info);

        let outage = Event360Error::event_lookup(99, ApiError::ServiceUnavailable);
        assert!(matches!(outage, Event360Error::Api(ApiError::ServiceUnavailable)));
    }

    #[test]
    fn test_recoverability() {
        assert!(Event360Error::Api(ApiError::Timeout).is_recoverable());
        assert!(!Event360Error::Validation("x".to_string()).is_recoverable());
        assert_eq!(Event360Error::Config("x".to_string()).severity(), ErrorSeverity::Critical);
    }
}
