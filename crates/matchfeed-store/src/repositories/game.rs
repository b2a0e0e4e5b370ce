//! Game repository — upserts into the `games` table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;

/// Game repository — stateless, every method takes `&Connection`.
pub struct GameRepo;

impl GameRepo {
    /// Register or refresh a game. Idempotent by id: an existing row gets
    /// its metadata replaced and `updated_at` bumped.
    pub fn upsert(conn: &Connection, game_id: &str, metadata_json: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO games (id, metadata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(id) DO UPDATE SET metadata = ?2, updated_at = ?3",
            params![game_id, metadata_json, now],
        )?;
        Ok(())
    }

    /// Make sure a game row exists without touching existing metadata.
    ///
    /// Window writes reference `games(id)`, and a game may see its first
    /// flush before any explicit registration.
    pub fn ensure(conn: &Connection, game_id: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT OR IGNORE INTO games (id, metadata, created_at, updated_at)
             VALUES (?1, '{}', ?2, ?2)",
            params![game_id, now],
        )?;
        Ok(())
    }

    /// Fetch a game's metadata JSON, if registered.
    pub fn metadata(conn: &Connection, game_id: &str) -> Result<Option<String>> {
        let metadata = conn
            .query_row(
                "SELECT metadata FROM games WHERE id = ?1",
                params![game_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(metadata)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
