//! Database layer: connection pool, migrations, models, and repositories

pub mod manager;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::DatabaseManager;
