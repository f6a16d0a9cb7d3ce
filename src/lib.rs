//! Event360 Telegram Bot
//!
//! A Telegram front end for the Event360 ticketing platform. Attendees browse
//! and filter events, buy tickets and manage orders; organizers submit events
//! and check in guests; admins approve events and manage users. Every chat
//! keeps its own session against the Event360 REST API.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod api;
pub mod state;
pub mod listing;
pub mod forms;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Event360Error, Result};

// Re-export main components for easy access
pub use api::ApiClient;
pub use services::ServiceFactory;
pub use state::{ScenarioManager, StateStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
