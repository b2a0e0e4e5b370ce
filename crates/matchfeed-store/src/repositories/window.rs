//! Window repository — id assignment for `(game_id, start_sec, end_sec)`.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::errors::Result;

/// Window repository — stateless, every method takes `&Connection`.
pub struct WindowRepo;

impl WindowRepo {
    /// Register or look up a window, returning its durable id.
    ///
    /// Idempotent by the bounds triple: the first call mints a `win_` id,
    /// later calls return the same one.
    pub fn upsert(
        conn: &Connection,
        game_id: &str,
        start_sec: u64,
        end_sec: u64,
    ) -> Result<String> {
        if let Some(id) = Self::find_id(conn, game_id, start_sec, end_sec)? {
            return Ok(id);
        }
        let id = format!("win_{}", Uuid::now_v7());
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO windows (id, game_id, start_sec, end_sec, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, game_id, start_sec, end_sec, now],
        )?;
        Ok(id)
    }

    /// Look up a window id by its bounds triple.
    pub fn find_id(
        conn: &Connection,
        game_id: &str,
        start_sec: u64,
        end_sec: u64,
    ) -> Result<Option<String>> {
        let id = conn
            .query_row(
                "SELECT id FROM windows
                 WHERE game_id = ?1 AND start_sec = ?2 AND end_sec = ?3",
                params![game_id, start_sec, end_sec],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::repositories::GameRepo;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        GameRepo::upsert(&conn, "game_1", "{}").unwrap();
        conn
    }

    #[test]
    fn upsert_mints_prefixed_id() {
        let conn = setup();
        let id = WindowRepo::upsert(&conn, "game_1", 0, 300).unwrap();
        assert!(id.starts_with("win_"));
    }

    #[test]
    fn upsert_same_triple_returns_same_id() {
        let conn = setup();
        let first = WindowRepo::upsert(&conn, "game_1", 0, 300).unwrap();
        let second = WindowRepo::upsert(&conn, "game_1", 0, 300).unwrap();
        assert_eq!(first, second);
        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM windows", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn distinct_windows_get_distinct_ids() {
        let conn = setup();
        let first = WindowRepo::upsert(&conn, "game_1", 0, 300).unwrap();
        let second = WindowRepo::upsert(&conn, "game_1", 300, 600).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn find_id_missing_window() {
        let conn = setup();
        assert!(
            WindowRepo::find_id(&conn, "game_1", 600, 900)
                .unwrap()
                .is_none()
        );
    }
}
