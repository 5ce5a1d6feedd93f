//! Lead unit client - data access for risk focal unit records.
//!
//! Wraps the backend REST endpoints behind [`services::LeadUnitService`],
//! normalizes errors and dates, and builds the payloads the edit screen
//! sends back.

pub mod config;
pub mod http_client;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use http_client::{ApiError, HttpClient};
pub use models::EntityId;
pub use services::LeadUnitService;
