//! Staffdesk Backend Library
//!
//! Employee-directory backend: JWT-authenticated REST API over a pooled
//! SQLite store, with file-backed profile-picture uploads and a static
//! single-page client.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod uploads;

// Re-export commonly used types
pub use crate::core::Config;
pub use api::ApiServer;
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
