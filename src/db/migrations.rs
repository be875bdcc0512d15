//! Database migrations
//!
//! Versioned, forward-only schema migrations tracked in a
//! `schema_migrations` table.

use crate::core::error::{Result, StaffdeskError};
use rusqlite::Connection;
use tracing::info;

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1)
///
/// The UNIQUE constraints on email are the only concurrency guard against
/// duplicate registrations and duplicate employee creates.
const MIGRATION_V1: &str = r#"
-- Users table (authentication)
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Employees table
CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    phone TEXT NOT NULL,
    employee_type TEXT NOT NULL,
    profile_pic TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_employees_name ON employees(name);
"#;

/// All migrations in order; index + 1 is the schema version
const MIGRATIONS: &[&str] = &[MIGRATION_V1];

/// Run all pending migrations on the given connection
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)
        .map_err(StaffdeskError::DatabaseError)?;

    let current = current_version(conn)?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let version = (idx + 1) as i64;
        if version <= current {
            continue;
        }

        info!(version, "Applying database migration");
        conn.execute_batch(sql).map_err(StaffdeskError::DatabaseError)?;
        conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?)",
            [version],
        )
        .map_err(StaffdeskError::DatabaseError)?;
    }

    Ok(())
}

/// Highest applied migration version, 0 if none
fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(StaffdeskError::DatabaseError)
}
