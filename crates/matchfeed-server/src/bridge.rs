//! Replay → accumulator bridge.
//!
//! An in-process subscriber that feeds every replayed tick into the window
//! accumulator, flushes a window as soon as a tick crosses into a later
//! one, and performs the final full-game flush on the terminal signal. The
//! bridge channel is deep enough that the emitter never drops its messages
//! under normal pacing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use matchfeed_core::window_start;
use matchfeed_pipeline::WindowAccumulator;
use matchfeed_replay::{ReplayEmitter, ReplayMessage};

/// Bridge channel depth.
const BRIDGE_CAPACITY: usize = 1024;

/// Subscribe the bridge to an emitter and spawn its pump task.
pub fn spawn(accumulator: Arc<WindowAccumulator>, emitter: &ReplayEmitter) {
    let game_id = emitter.game_id().to_string();
    let (tx, mut rx) = mpsc::channel(BRIDGE_CAPACITY);
    let _listener = emitter.subscribe(format!("bridge_{game_id}"), tx);

    let _handle = tokio::spawn(async move {
        let duration = accumulator.duration_sec();
        let mut current_window: Option<u64> = None;
        while let Some(raw) = rx.recv().await {
            match serde_json::from_str::<ReplayMessage>(raw.as_str()) {
                Ok(ReplayMessage::Tick {
                    timestamp_sec,
                    event,
                    ..
                }) => {
                    let key = window_start(timestamp_sec, duration);
                    // Ticks arrive in timestamp order, so entering a later
                    // window means the previous one is complete.
                    if let Some(prev) = current_window
                        && key > prev
                        && let Err(e) = accumulator.flush_window(&game_id, prev, prev + duration)
                    {
                        warn!(game_id, start_sec = prev, error = %e, "boundary flush failed");
                    }
                    if current_window.is_none_or(|prev| key > prev) {
                        current_window = Some(key);
                    }
                    accumulator.ingest(&game_id, timestamp_sec, event);
                }
                Ok(ReplayMessage::Done) => {
                    match accumulator.flush_game(&game_id) {
                        Ok(flushed) => {
                            info!(game_id, flushed, "replay finished, game flushed");
                        }
                        Err(e) => error!(game_id, error = %e, "final flush failed"),
                    }
                    break;
                }
                Ok(ReplayMessage::Hello { .. }) => {}
                Err(e) => warn!(game_id, error = %e, "unparseable replay message"),
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
