//! Test helpers
//!
//! A wiremock stand-in for the Event360 REST API plus canned payloads.

pub mod api_mock;
pub mod test_data;

pub use api_mock::*;
pub use test_data::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}
