//! Snapshot repository — one payload per `(window_id, kind)`.

use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::errors::Result;

/// Snapshot repository — stateless, every method takes `&Connection`.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Write one artifact. Idempotent by `(window_id, kind)`: a re-flush
    /// replaces the stored payload, never appends.
    pub fn upsert(
        conn: &Connection,
        window_id: &str,
        kind: &str,
        payload_json: &str,
    ) -> Result<()> {
        let hash = payload_hash(payload_json);
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO snapshots (window_id, kind, payload, payload_hash, written_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(window_id, kind)
             DO UPDATE SET payload = ?3, payload_hash = ?4, written_at = ?5",
            params![window_id, kind, payload_json, hash, now],
        )?;
        Ok(())
    }

    /// Fetch the stored payload for `(window_id, kind)`, if any.
    pub fn fetch(conn: &Connection, window_id: &str, kind: &str) -> Result<Option<String>> {
        let payload = conn
            .query_row(
                "SELECT payload FROM snapshots WHERE window_id = ?1 AND kind = ?2",
                params![window_id, kind],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// Fetch the stored payload hash for `(window_id, kind)`, if any.
    pub fn fetch_hash(conn: &Connection, window_id: &str, kind: &str) -> Result<Option<String>> {
        let hash = conn
            .query_row(
                "SELECT payload_hash FROM snapshots WHERE window_id = ?1 AND kind = ?2",
                params![window_id, kind],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }
}

/// Content hash recorded next to each payload.
fn payload_hash(payload_json: &str) -> String {
    let hash = Sha256::digest(payload_json.as_bytes());
    format!("sha256:{}", hex::encode(hash))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::repositories::{GameRepo, WindowRepo};

    fn setup() -> (Connection, String) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        GameRepo::upsert(&conn, "game_1", "{}").unwrap();
        let window_id = WindowRepo::upsert(&conn, "game_1", 0, 300).unwrap();
        (conn, window_id)
    }

    #[test]
    fn upsert_then_fetch() {
        let (conn, window_id) = setup();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1,2,3]").unwrap();
        let payload = SnapshotRepo::fetch(&conn, &window_id, "raw").unwrap();
        assert_eq!(payload.as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn upsert_replaces_payload() {
        let (conn, window_id) = setup();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1]").unwrap();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1,2]").unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let payload = SnapshotRepo::fetch(&conn, &window_id, "raw").unwrap();
        assert_eq!(payload.as_deref(), Some("[1,2]"));
    }

    #[test]
    fn kinds_stored_independently() {
        let (conn, window_id) = setup();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1]").unwrap();
        SnapshotRepo::upsert(&conn, &window_id, "compressed", "{}").unwrap();

        assert_eq!(
            SnapshotRepo::fetch(&conn, &window_id, "raw")
                .unwrap()
                .as_deref(),
            Some("[1]")
        );
        assert_eq!(
            SnapshotRepo::fetch(&conn, &window_id, "compressed")
                .unwrap()
                .as_deref(),
            Some("{}")
        );
    }

    #[test]
    fn identical_payload_identical_hash() {
        let (conn, window_id) = setup();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1,2]").unwrap();
        let first = SnapshotRepo::fetch_hash(&conn, &window_id, "raw").unwrap();
        SnapshotRepo::upsert(&conn, &window_id, "raw", "[1,2]").unwrap();
        let second = SnapshotRepo::fetch_hash(&conn, &window_id, "raw").unwrap();
        assert_eq!(first, second);
        assert!(first.unwrap().starts_with("sha256:"));
    }

    #[test]
    fn fetch_missing_snapshot() {
        let (conn, window_id) = setup();
        assert!(
            SnapshotRepo::fetch(&conn, &window_id, "raw")
                .unwrap()
                .is_none()
        );
    }
}
