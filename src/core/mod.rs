//! Core infrastructure: configuration, logging, and the error type system

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Result, StaffdeskError};
pub use logging::Logger;
