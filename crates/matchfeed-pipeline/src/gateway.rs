//! Persistence gateway contract.
//!
//! The durable store for games, windows, and per-window payloads is an
//! external collaborator. The pipeline only depends on this trait; the
//! SQLite implementation lives in `matchfeed-store`, and
//! [`crate::MemoryGateway`] backs tests.

use serde_json::Value;

use matchfeed_core::{CanonicalEvent, CompressedSnapshot, WindowBounds};

use crate::errors::GatewayError;

/// Which per-window artifact a snapshot row holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// Ordered raw canonical events.
    Raw,
    /// Compressed summary (STKM).
    Compressed,
}

impl SnapshotKind {
    /// Stable storage discriminator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Compressed => "compressed",
        }
    }
}

/// Durable store for games, windows, and per-window payloads.
///
/// All upserts are idempotent: `upsert_game` by id, `upsert_window` by the
/// `(game_id, start_sec, end_sec)` triple, `upsert_snapshot` by
/// `(window_id, kind)` — a re-flush replaces, never appends. There is no
/// transactionality between the raw and compressed writes of one flush;
/// the accumulator treats the flush as an atomic unit at the retry level.
pub trait PersistenceGateway: Send + Sync {
    /// Register or refresh a game. Idempotent by `game_id`.
    fn upsert_game(&self, game_id: &str, metadata: &Value) -> Result<(), GatewayError>;

    /// Register or look up a window, returning its durable identifier.
    /// Idempotent by the bounds triple.
    fn upsert_window(&self, bounds: &WindowBounds) -> Result<String, GatewayError>;

    /// Write one per-window artifact. Idempotent by `(window_id, kind)`.
    fn upsert_snapshot(
        &self,
        window_id: &str,
        kind: SnapshotKind,
        payload: &Value,
    ) -> Result<(), GatewayError>;

    /// Read back the raw snapshot stored for an exact window, if any.
    fn fetch_raw_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<Vec<CanonicalEvent>>, GatewayError>;

    /// Read back the compressed snapshot stored for an exact window, if any.
    fn fetch_compressed_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<CompressedSnapshot>, GatewayError>;
}
