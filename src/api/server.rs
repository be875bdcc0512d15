//! HTTP Server implementation
//!
//! Axum server wiring: repositories and upload store into shared state,
//! routes behind CORS/trace layers, static file serving for the SPA and
//! the uploads directory, graceful shutdown on Ctrl+C or SIGTERM.

use crate::api::handlers::AppState;
use crate::api::routes::build_api_routes;
use crate::core::config::{Config, ServerConfig};
use crate::db::manager::DatabaseManager;
use crate::db::repository::{EmployeeRepository, UserRepository};
use crate::uploads::{UploadStore, PUBLIC_PREFIX};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let server_config = config.server.clone();
        let router = Self::build_router(config, db)?;

        Ok(Self {
            router,
            config: server_config,
        })
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Router> {
        let employee_repo = Arc::new(EmployeeRepository::new(db.clone()));
        let user_repo = Arc::new(UserRepository::new(db));

        let uploads = Arc::new(
            UploadStore::new(&config.storage.upload_dir, config.storage.max_upload_bytes)
                .map_err(|e| anyhow::anyhow!("Failed to create upload store: {}", e))?,
        );

        let app_state = AppState {
            employee_repo,
            user_repo,
            uploads: uploads.clone(),
            jwt_secret: Arc::new(config.security.jwt_secret.clone()),
            token_ttl_days: config.security.token_ttl_days,
        };

        let api_router = build_api_routes(app_state);

        // Uploaded profile pictures are served statically under /uploads
        let uploads_service = ServeDir::new(uploads.root());

        // Static file serving for the SPA client
        let static_dir = config.storage.static_dir.clone();
        let serve_dir = ServeDir::new(&static_dir)
            .not_found_service(ServeFile::new(static_dir.join("index.html")));

        let router = api_router
            .nest_service(PUBLIC_PREFIX, uploads_service)
            .fallback_service(serve_dir)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::build_cors_layer(&config.security.allowed_origins)),
            );

        Ok(router)
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        use tower_http::cors::Any;

        let cors = CorsLayer::new();

        if allowed_origins.contains(&"*".to_string()) {
            cors.allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            cors.allow_origin(parse_origins(allowed_origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }
}

/// Parse configured origins into header values, warning on each entry
/// that cannot be used instead of dropping it silently
fn parse_origins(allowed_origins: &[String]) -> Vec<axum::http::HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable allowed origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_keeps_valid_and_drops_unparseable() {
        let configured = vec![
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
            "https://staff.example.com".to_string(),
        ];

        let origins = parse_origins(&configured);

        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "https://staff.example.com");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
