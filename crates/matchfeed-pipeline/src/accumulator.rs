//! Window accumulator: per-game, per-window event buckets and flush
//! orchestration.
//!
//! State is sharded by game: a `DashMap` of per-game mutexes. Ingest and
//! flush for one game serialize on that game's lock; different games never
//! contend. An event racing a flush is either recorded before the bucket is
//! cleared or lands in a fresh bucket for the same key.
//!
//! INVARIANT: a bucket is discarded only after the gateway accepted both
//! artifacts. On persistence failure the bucket (and the previous-snapshot
//! baseline) are untouched, so retrying the identical flush reproduces the
//! identical raw and compressed snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use matchfeed_core::{CanonicalEvent, CompressedSnapshot, Roster, WindowBounds, window_start};

use crate::compressor::compress;
use crate::errors::PipelineError;
use crate::gateway::{PersistenceGateway, SnapshotKind};

/// Counter: events buffered into window buckets.
pub const INGESTS_TOTAL: &str = "accumulator_ingests_total";
/// Counter: windows flushed through the gateway.
pub const FLUSHES_TOTAL: &str = "accumulator_flushes_total";
/// Counter: flush requests rejected for ordering.
pub const OUT_OF_ORDER_FLUSHES_TOTAL: &str = "accumulator_out_of_order_flushes_total";

/// Result of a single-window flush.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The window was compressed and persisted.
    Flushed {
        /// Durable window identifier.
        window_id: String,
    },
    /// The bucket was empty or absent; nothing was persisted.
    Empty,
}

#[derive(Default)]
struct GameState {
    roster: Option<Roster>,
    /// Window start → ordered events. `BTreeMap` keeps ascending flush
    /// order cheap for full-game flushes.
    buckets: BTreeMap<u64, Vec<CanonicalEvent>>,
    /// Baseline for the next window's deltas and running score.
    last_snapshot: Option<CompressedSnapshot>,
    last_flushed_start: Option<u64>,
}

/// Buckets canonical events into fixed-duration windows per game and
/// flushes them through a [`PersistenceGateway`].
pub struct WindowAccumulator {
    duration_sec: u64,
    gateway: Arc<dyn PersistenceGateway>,
    games: DashMap<String, Arc<Mutex<GameState>>>,
}

impl WindowAccumulator {
    /// Create an accumulator with the given window duration.
    #[must_use]
    pub fn new(gateway: Arc<dyn PersistenceGateway>, duration_sec: u64) -> Self {
        Self {
            duration_sec,
            gateway,
            games: DashMap::new(),
        }
    }

    /// Configured window duration in seconds.
    #[must_use]
    pub fn duration_sec(&self) -> u64 {
        self.duration_sec
    }

    /// Attach the resolved roster for a game's side-scoped compression.
    pub fn set_roster(&self, game_id: &str, roster: Roster) {
        let state = self.game(game_id);
        state.lock().roster = Some(roster);
    }

    /// The roster attached at stream start, if any. Side-scoped consumers
    /// must use this one so every window agrees on home/away.
    #[must_use]
    pub fn roster(&self, game_id: &str) -> Option<Roster> {
        self.games
            .get(game_id)
            .and_then(|state| state.lock().roster.clone())
    }

    /// Buffer one event into its window bucket, creating the bucket if
    /// absent. Accepts out-of-order timestamps; insertion order within a
    /// bucket is preserved. Does not guarantee durability.
    pub fn ingest(&self, game_id: &str, timestamp_sec: u64, event: CanonicalEvent) {
        let key = window_start(timestamp_sec, self.duration_sec);
        let state = self.game(game_id);
        state.lock().buckets.entry(key).or_default().push(event);
        counter!(INGESTS_TOTAL).increment(1);
    }

    /// Number of currently buffered (unflushed) windows for a game.
    #[must_use]
    pub fn buffered_windows(&self, game_id: &str) -> usize {
        self.games
            .get(game_id)
            .map_or(0, |state| state.lock().buckets.len())
    }

    /// Flush one window: compress its bucket against the game's previous
    /// snapshot, persist window + raw + compressed, then discard the
    /// bucket.
    ///
    /// Flushing an empty or absent bucket is a silent no-op. A malformed
    /// range is rejected with no state mutation. Flushing a window older
    /// than the game's last flushed one is rejected as
    /// [`PipelineError::OutOfOrderFlush`].
    #[instrument(skip(self), fields(game_id, start_sec, end_sec))]
    pub fn flush_window(
        &self,
        game_id: &str,
        start_sec: u64,
        end_sec: u64,
    ) -> Result<FlushOutcome, PipelineError> {
        self.check_range(start_sec, end_sec)?;

        let Some(state) = self.games.get(game_id).map(|s| Arc::clone(&s)) else {
            return Ok(FlushOutcome::Empty);
        };
        let mut state = state.lock();
        self.flush_locked(game_id, &mut state, start_sec)
    }

    /// Flush every buffered window for a game in ascending `start_sec`
    /// order (required for correct deltas and running score). Returns the
    /// number of windows flushed.
    ///
    /// Buckets older than the game's last flushed window can never be
    /// flushed without breaking ordering, so the drain discards them with
    /// a warning instead of failing; the hard [`PipelineError::OutOfOrderFlush`]
    /// is reserved for explicit single-window flushes. Stops at the first
    /// persistence failure; the failed window's bucket and all later
    /// buckets are retained for retry.
    #[instrument(skip(self), fields(game_id))]
    pub fn flush_game(&self, game_id: &str) -> Result<usize, PipelineError> {
        let Some(state) = self.games.get(game_id).map(|s| Arc::clone(&s)) else {
            return Ok(0);
        };
        let mut state = state.lock();
        let starts: Vec<u64> = state.buckets.keys().copied().collect();
        let mut flushed = 0;
        for start in starts {
            match self.flush_locked(game_id, &mut state, start) {
                Ok(FlushOutcome::Flushed { .. }) => flushed += 1,
                Ok(FlushOutcome::Empty) => {}
                Err(PipelineError::OutOfOrderFlush { .. }) => {
                    warn!(game_id, start_sec = start, "discarding stale bucket");
                    let _ = state.buckets.remove(&start);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(flushed)
    }

    /// Flush a single bucket while holding the game lock.
    fn flush_locked(
        &self,
        game_id: &str,
        state: &mut GameState,
        start_sec: u64,
    ) -> Result<FlushOutcome, PipelineError> {
        if state.buckets.get(&start_sec).is_none_or(Vec::is_empty) {
            debug!(game_id, start_sec, "flush of empty bucket is a no-op");
            return Ok(FlushOutcome::Empty);
        }

        if let Some(last) = state.last_flushed_start
            && start_sec < last
        {
            counter!(OUT_OF_ORDER_FLUSHES_TOTAL).increment(1);
            warn!(game_id, start_sec, last, "rejecting out-of-order flush");
            return Err(PipelineError::OutOfOrderFlush {
                game_id: game_id.to_string(),
                requested_start_sec: start_sec,
                last_flushed_start_sec: last,
            });
        }

        let bounds = WindowBounds {
            game_id: game_id.to_string(),
            start_sec,
            end_sec: start_sec + self.duration_sec,
        };
        // Bucket stays in place until persistence succeeds.
        let events = &state.buckets[&start_sec];
        let snapshot = compress(
            &bounds,
            events,
            state.roster.as_ref(),
            state.last_snapshot.as_ref(),
        );

        let window_id = self.gateway.upsert_window(&bounds)?;
        let raw_payload = serde_json::to_value(events).map_err(crate::GatewayError::from)?;
        self.gateway
            .upsert_snapshot(&window_id, SnapshotKind::Raw, &raw_payload)?;
        let compressed_payload =
            serde_json::to_value(&snapshot).map_err(crate::GatewayError::from)?;
        self.gateway
            .upsert_snapshot(&window_id, SnapshotKind::Compressed, &compressed_payload)?;

        let event_count = state
            .buckets
            .remove(&start_sec)
            .map_or(0, |bucket| bucket.len());
        state.last_snapshot = Some(snapshot);
        state.last_flushed_start = Some(start_sec);
        counter!(FLUSHES_TOTAL).increment(1);
        debug!(game_id, start_sec, window_id, event_count, "flushed window");
        Ok(FlushOutcome::Flushed { window_id })
    }

    fn check_range(&self, start_sec: u64, end_sec: u64) -> Result<(), PipelineError> {
        let valid = start_sec % self.duration_sec == 0
            && end_sec == start_sec + self.duration_sec;
        if valid {
            Ok(())
        } else {
            Err(PipelineError::MalformedRange {
                start_sec,
                end_sec,
                duration_sec: self.duration_sec,
            })
        }
    }

    fn game(&self, game_id: &str) -> Arc<Mutex<GameState>> {
        Arc::clone(
            &self
                .games
                .entry(game_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(GameState::default()))),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
