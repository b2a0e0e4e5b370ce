//! # matchfeed-store
//!
//! SQLite persistence behind the pipeline's gateway trait. An `r2d2` pool
//! with WAL-mode connections feeds stateless repositories (games, windows,
//! snapshots); [`SqliteGateway`] composes them into the
//! [`matchfeed_pipeline::PersistenceGateway`] contract. Schema changes run
//! through the embedded migration runner.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;

mod gateway;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection};
pub use errors::{Result, StoreError};
pub use gateway::SqliteGateway;

/// Open a file-backed store: build the pool and run migrations.
pub fn open(path: &str, config: &ConnectionConfig) -> Result<SqliteGateway> {
    let pool = connection::new_file(path, config)?;
    let conn = pool.get()?;
    let _ = migrations::run_migrations(&conn)?;
    drop(conn);
    Ok(SqliteGateway::new(pool))
}

/// Open an in-memory store (for tests and demos).
pub fn open_in_memory() -> Result<SqliteGateway> {
    let pool = connection::new_in_memory(&ConnectionConfig::default())?;
    let conn = pool.get()?;
    let _ = migrations::run_migrations(&conn)?;
    drop(conn);
    Ok(SqliteGateway::new(pool))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
