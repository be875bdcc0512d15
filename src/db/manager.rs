//! Database manager implementation
//!
//! SQLite connection pool (r2d2) with an async wrapper that moves work
//! onto the blocking thread pool, plus an in-memory constructor for tests.

use crate::core::error::{Result, StaffdeskError};
use crate::db::migrations;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tokio::task;

/// Database manager with connection pool
pub struct DatabaseManager {
    pool: Pool<SqliteConnectionManager>,
}

impl DatabaseManager {
    /// Create a new DatabaseManager with the specified database path and pool size
    pub fn new(db_path: &Path, pool_size: u32, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(StaffdeskError::IoError)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(busy_timeout)?;
            // WAL mode for concurrent readers during writes
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .map_err(|e| StaffdeskError::InitializationError(format!(
                "Failed to build connection pool: {}",
                e
            )))?;

        let manager = Self { pool };

        manager.migrate()?;

        Ok(manager)
    }

    /// Create a new DatabaseManager with an in-memory database for testing
    pub fn new_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        // In-memory databases are per-connection, so the pool must hold one
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_secs(30))
            .build(manager)
            .map_err(|e| StaffdeskError::InitializationError(format!(
                "Failed to build connection pool: {}",
                e
            )))?;

        let manager = Self { pool };

        manager.migrate()?;

        Ok(manager)
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StaffdeskError::TaskError(format!("Failed to get database connection: {}", e))
        })
    }

    /// Run schema migrations to the current version
    pub fn migrate(&self) -> Result<()> {
        let conn = self.get_connection()?;
        migrations::run(&conn)
    }

    /// Execute a database operation asynchronously
    ///
    /// Wraps synchronous database access in `tokio::task::spawn_blocking`
    /// to avoid blocking the async runtime.
    pub async fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| {
                StaffdeskError::TaskError(format!("Failed to get database connection: {}", e))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| StaffdeskError::TaskError(format!("Database task panicked: {}", e)))?
    }
}
