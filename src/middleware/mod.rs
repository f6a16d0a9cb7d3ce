//! Middleware module
//!
//! Access control applied before a page is rendered.

pub mod auth;

pub use auth::{authorize, check, guard, Access, Route};
