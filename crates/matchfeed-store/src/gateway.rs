//! [`PersistenceGateway`] implementation over the connection pool.

use serde_json::Value;
use tracing::instrument;

use matchfeed_core::{CanonicalEvent, CompressedSnapshot, WindowBounds};
use matchfeed_pipeline::{GatewayError, PersistenceGateway, SnapshotKind};

use crate::connection::ConnectionPool;
use crate::errors::StoreError;
use crate::repositories::{GameRepo, SnapshotRepo, WindowRepo};

/// SQLite-backed gateway. Cheap to clone; all state lives in the pool.
#[derive(Clone)]
pub struct SqliteGateway {
    pool: ConnectionPool,
}

impl SqliteGateway {
    /// Wrap an already-migrated pool.
    #[must_use]
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

fn backend(err: StoreError) -> GatewayError {
    GatewayError::Backend(err.to_string())
}

impl PersistenceGateway for SqliteGateway {
    #[instrument(skip(self, metadata))]
    fn upsert_game(&self, game_id: &str, metadata: &Value) -> Result<(), GatewayError> {
        let conn = self.pool.get().map_err(|e| backend(e.into()))?;
        let json = serde_json::to_string(metadata)?;
        GameRepo::upsert(&conn, game_id, &json).map_err(backend)
    }

    #[instrument(skip(self))]
    fn upsert_window(&self, bounds: &WindowBounds) -> Result<String, GatewayError> {
        let conn = self.pool.get().map_err(|e| backend(e.into()))?;
        // A flush can precede explicit registration; the FK needs the row.
        GameRepo::ensure(&conn, &bounds.game_id).map_err(backend)?;
        WindowRepo::upsert(&conn, &bounds.game_id, bounds.start_sec, bounds.end_sec)
            .map_err(backend)
    }

    #[instrument(skip(self, payload))]
    fn upsert_snapshot(
        &self,
        window_id: &str,
        kind: SnapshotKind,
        payload: &Value,
    ) -> Result<(), GatewayError> {
        let conn = self.pool.get().map_err(|e| backend(e.into()))?;
        let json = serde_json::to_string(payload)?;
        SnapshotRepo::upsert(&conn, window_id, kind.as_str(), &json).map_err(backend)
    }

    fn fetch_raw_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<Vec<CanonicalEvent>>, GatewayError> {
        let conn = self.pool.get().map_err(|e| backend(e.into()))?;
        let Some(window_id) =
            WindowRepo::find_id(&conn, &bounds.game_id, bounds.start_sec, bounds.end_sec)
                .map_err(backend)?
        else {
            return Ok(None);
        };
        let Some(payload) =
            SnapshotRepo::fetch(&conn, &window_id, SnapshotKind::Raw.as_str()).map_err(backend)?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&payload)?))
    }

    fn fetch_compressed_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<CompressedSnapshot>, GatewayError> {
        let conn = self.pool.get().map_err(|e| backend(e.into()))?;
        let Some(window_id) =
            WindowRepo::find_id(&conn, &bounds.game_id, bounds.start_sec, bounds.end_sec)
                .map_err(backend)?
        else {
            return Ok(None);
        };
        let Some(payload) = SnapshotRepo::fetch(&conn, &window_id, SnapshotKind::Compressed.as_str())
            .map_err(backend)?
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&payload)?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
