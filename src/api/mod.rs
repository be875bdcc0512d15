//! HTTP API: server, routes, handlers, and request/response models

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
