//! Event360 REST API
//!
//! [`ApiClient`] owns the HTTP transport; each endpoint group is a thin
//! borrowed view over it (`client.events().list(..)`).

pub mod client;
pub mod auth;
pub mod events;
pub mod orders;
pub mod payments;
pub mod registrations;
pub mod tickets;
pub mod users;
pub mod admin;
pub mod uploads;

pub use client::ApiClient;
pub use auth::AuthApi;
pub use events::EventsApi;
pub use orders::OrdersApi;
pub use payments::PaymentsApi;
pub use registrations::RegistrationsApi;
pub use tickets::TicketsApi;
pub use users::UsersApi;
pub use admin::AdminApi;
pub use uploads::{UploadsApi, UploadResponse};
