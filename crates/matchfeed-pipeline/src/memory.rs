//! In-memory persistence gateway.
//!
//! Backs unit tests and local development runs that do not need a durable
//! store. Semantics mirror the SQLite gateway: idempotent upserts keyed the
//! same way, replace-not-append snapshot writes.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

use matchfeed_core::{CanonicalEvent, CompressedSnapshot, WindowBounds};

use crate::errors::GatewayError;
use crate::gateway::{PersistenceGateway, SnapshotKind};

#[derive(Default)]
struct Inner {
    games: HashMap<String, Value>,
    /// `(game_id, start_sec, end_sec)` → window id.
    windows: HashMap<(String, u64, u64), String>,
    /// `(window_id, kind)` → payload.
    snapshots: HashMap<(String, &'static str), Value>,
    /// `(window_id, kind)` → number of writes, for idempotence assertions.
    write_counts: HashMap<(String, &'static str), u32>,
    next_window: u64,
}

/// Thread-safe in-memory [`PersistenceGateway`].
#[derive(Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered games.
    #[must_use]
    pub fn game_count(&self) -> usize {
        self.inner.lock().games.len()
    }

    /// Number of registered windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.inner.lock().windows.len()
    }

    /// How many times a given artifact has been written.
    #[must_use]
    pub fn write_count(&self, window_id: &str, kind: SnapshotKind) -> u32 {
        self.inner
            .lock()
            .write_counts
            .get(&(window_id.to_string(), kind.as_str()))
            .copied()
            .unwrap_or(0)
    }

    fn window_id(&self, bounds: &WindowBounds) -> Option<String> {
        self.inner
            .lock()
            .windows
            .get(&(bounds.game_id.clone(), bounds.start_sec, bounds.end_sec))
            .cloned()
    }

    fn snapshot(&self, window_id: &str, kind: SnapshotKind) -> Option<Value> {
        self.inner
            .lock()
            .snapshots
            .get(&(window_id.to_string(), kind.as_str()))
            .cloned()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn upsert_game(&self, game_id: &str, metadata: &Value) -> Result<(), GatewayError> {
        let _ = self
            .inner
            .lock()
            .games
            .insert(game_id.to_string(), metadata.clone());
        Ok(())
    }

    fn upsert_window(&self, bounds: &WindowBounds) -> Result<String, GatewayError> {
        let mut inner = self.inner.lock();
        let key = (bounds.game_id.clone(), bounds.start_sec, bounds.end_sec);
        if let Some(existing) = inner.windows.get(&key) {
            return Ok(existing.clone());
        }
        inner.next_window += 1;
        let id = format!("win_{}", inner.next_window);
        let _ = inner.windows.insert(key, id.clone());
        Ok(id)
    }

    fn upsert_snapshot(
        &self,
        window_id: &str,
        kind: SnapshotKind,
        payload: &Value,
    ) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock();
        let key = (window_id.to_string(), kind.as_str());
        let _ = inner.snapshots.insert(key.clone(), payload.clone());
        *inner.write_counts.entry(key).or_insert(0) += 1;
        Ok(())
    }

    fn fetch_raw_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<Vec<CanonicalEvent>>, GatewayError> {
        let Some(id) = self.window_id(bounds) else {
            return Ok(None);
        };
        let Some(payload) = self.snapshot(&id, SnapshotKind::Raw) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(payload)?))
    }

    fn fetch_compressed_snapshot(
        &self,
        bounds: &WindowBounds,
    ) -> Result<Option<CompressedSnapshot>, GatewayError> {
        let Some(id) = self.window_id(bounds) else {
            return Ok(None);
        };
        let Some(payload) = self.snapshot(&id, SnapshotKind::Compressed) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(payload)?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
