//! The timed replay loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use matchfeed_core::CanonicalEvent;

use crate::listener::ReplayListener;
use crate::message::ReplayMessage;

/// Floor on the wait between ticks.
pub const MIN_DELAY_MS: u64 = 30;
/// Ceiling on the wait between ticks.
pub const MAX_DELAY_MS: u64 = 5000;

/// Counter: ticks broadcast across all replays.
pub const REPLAY_TICKS_TOTAL: &str = "replay_ticks_total";
/// Counter: messages dropped on full listener channels.
pub const REPLAY_DROPPED_MESSAGES_TOTAL: &str = "replay_dropped_messages_total";

/// Replay lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Speed factor must be positive.
    #[error("invalid replay speed {speed}")]
    InvalidSpeed {
        /// The rejected factor.
        speed: f64,
    },
}

/// Where the emitter is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayState {
    /// Loaded, not yet started.
    Idle,
    /// Ticking.
    Running,
    /// Terminal `done` sent; no further messages.
    Done,
}

/// Wait between two consecutive events at the given speed factor.
///
/// The match-clock gap is compressed by `speed` and clamped so bursts still
/// render as distinct ticks and long lulls do not stall the stream.
#[must_use]
pub fn inter_event_delay(prev_sec: u64, next_sec: u64, speed: f64) -> Duration {
    let gap_ms = next_sec.saturating_sub(prev_sec) as f64 * 1000.0 / speed;
    Duration::from_millis((gap_ms as u64).clamp(MIN_DELAY_MS, MAX_DELAY_MS))
}

/// Rebroadcasts one game's normalized event log in compressed real time.
///
/// A single emitter drives a single pass over its log: `Idle` until
/// [`run`](Self::run) is called, `Running` while ticking, `Done` forever
/// after. There is no pause, rewind, or per-listener backfill; subscribers
/// joining mid-stream pick up from the next tick.
#[derive(Debug)]
pub struct ReplayEmitter {
    game_id: String,
    speed: f64,
    events: Vec<CanonicalEvent>,
    state: Mutex<ReplayState>,
    listeners: RwLock<HashMap<String, Arc<ReplayListener>>>,
}

impl ReplayEmitter {
    /// Create an emitter over a normalized, timestamp-ordered log.
    pub fn new(
        game_id: impl Into<String>,
        events: Vec<CanonicalEvent>,
        speed: f64,
    ) -> Result<Self, ReplayError> {
        if speed.is_nan() || speed <= 0.0 {
            return Err(ReplayError::InvalidSpeed { speed });
        }
        Ok(Self {
            game_id: game_id.into(),
            speed,
            events,
            state: Mutex::new(ReplayState::Idle),
            listeners: RwLock::new(HashMap::new()),
        })
    }

    /// Game this emitter replays.
    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReplayState {
        *self.state.lock()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Register a subscriber.
    ///
    /// Before the run starts the subscriber will receive the handshake with
    /// the first tick batch. Joining mid-run delivers the handshake
    /// immediately and then live ticks, with no backfill. Joining after the
    /// run delivers only the terminal `done`.
    pub fn subscribe(
        &self,
        id: impl Into<String>,
        tx: mpsc::Sender<Arc<String>>,
    ) -> Arc<ReplayListener> {
        let listener = Arc::new(ReplayListener::new(id.into(), tx));
        match self.state() {
            ReplayState::Done => {
                send_to(&listener, &ReplayMessage::Done);
                debug!(listener_id = %listener.id, game_id = %self.game_id, "subscribe after done");
            }
            state => {
                if state == ReplayState::Running {
                    send_to(&listener, &self.hello());
                }
                let _ = self
                    .listeners
                    .write()
                    .insert(listener.id.clone(), Arc::clone(&listener));
                debug!(
                    listener_id = %listener.id,
                    game_id = %self.game_id,
                    "listener subscribed"
                );
            }
        }
        listener
    }

    /// Drop a subscriber by ID.
    pub fn unsubscribe(&self, id: &str) {
        let _ = self.listeners.write().remove(id);
    }

    /// Drive the replay to completion.
    ///
    /// Sends the handshake, ticks every event with the clamped inter-event
    /// wait (the first wait is measured from kickoff, previous timestamp
    /// zero), then sends `done` and closes every listener. A second call
    /// while running or finished is a no-op.
    pub async fn run(&self) {
        {
            let mut state = self.state.lock();
            if *state != ReplayState::Idle {
                debug!(game_id = %self.game_id, "replay already started, ignoring start");
                return;
            }
            *state = ReplayState::Running;
        }
        info!(
            game_id = %self.game_id,
            events = self.events.len(),
            speed = self.speed,
            "replay started"
        );

        self.broadcast(&self.hello());

        let mut prev_sec = 0;
        for (seq, event) in self.events.iter().enumerate() {
            tokio::time::sleep(inter_event_delay(prev_sec, event.timestamp_sec, self.speed))
                .await;
            prev_sec = event.timestamp_sec;
            self.broadcast(&ReplayMessage::Tick {
                seq: seq as u64,
                timestamp_sec: event.timestamp_sec,
                event: event.clone(),
            });
            counter!(REPLAY_TICKS_TOTAL).increment(1);
        }

        self.broadcast(&ReplayMessage::Done);
        *self.state.lock() = ReplayState::Done;
        self.listeners.write().clear();
        info!(game_id = %self.game_id, "replay finished");
    }

    fn hello(&self) -> ReplayMessage {
        ReplayMessage::Hello {
            game_id: self.game_id.clone(),
            speed: self.speed,
            total_events: self.events.len() as u64,
        }
    }

    /// Fan a message out to every listener, pruning dead transports.
    fn broadcast(&self, message: &ReplayMessage) {
        let json = match serde_json::to_string(message) {
            Ok(j) => Arc::new(j),
            Err(e) => {
                warn!(game_id = %self.game_id, error = %e, "failed to serialize replay message");
                return;
            }
        };
        let disconnected: Vec<String> = {
            let listeners = self.listeners.read();
            listeners
                .values()
                .filter_map(|listener| {
                    if !listener.send(Arc::clone(&json)) {
                        counter!(REPLAY_DROPPED_MESSAGES_TOTAL).increment(1);
                    }
                    listener.is_closed().then(|| listener.id.clone())
                })
                .collect()
        };
        if !disconnected.is_empty() {
            let mut listeners = self.listeners.write();
            for id in disconnected {
                debug!(listener_id = %id, game_id = %self.game_id, "listener disconnected");
                let _ = listeners.remove(&id);
            }
        }
    }
}

fn send_to(listener: &ReplayListener, message: &ReplayMessage) {
    match serde_json::to_string(message) {
        Ok(json) => {
            let _ = listener.send(Arc::new(json));
        }
        Err(e) => warn!(listener_id = %listener.id, error = %e, "failed to serialize replay message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use matchfeed_core::{EventAttributes, EventKind};

    fn event(ts: u64, kind: EventKind) -> CanonicalEvent {
        CanonicalEvent {
            timestamp_sec: ts,
            kind,
            team: Some("A".into()),
            player: Some("X".into()),
            attributes: EventAttributes::default(),
        }
    }

    fn message_type(raw: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        value["type"].as_str().unwrap().to_string()
    }

    #[test]
    fn delay_clamps_to_ceiling() {
        // 50s gap at 5x is 10s of wall clock, capped at 5s.
        assert_eq!(
            inter_event_delay(0, 50, 5.0),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn delay_clamps_to_floor() {
        assert_eq!(inter_event_delay(10, 10, 60.0), Duration::from_millis(30));
    }

    #[test]
    fn delay_compresses_by_speed() {
        assert_eq!(inter_event_delay(0, 60, 60.0), Duration::from_millis(1000));
    }

    #[test]
    fn nonpositive_speed_rejected() {
        assert_matches!(
            ReplayEmitter::new("game_1", vec![], 0.0),
            Err(ReplayError::InvalidSpeed { .. })
        );
        assert_matches!(
            ReplayEmitter::new("game_1", vec![], -2.0),
            Err(ReplayError::InvalidSpeed { .. })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_stream_in_order() {
        let emitter = ReplayEmitter::new(
            "game_1",
            vec![event(0, EventKind::KeyPass), event(50, EventKind::Shot)],
            5.0,
        )
        .unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("lst_1", tx);

        emitter.run().await;
        assert_eq!(emitter.state(), ReplayState::Done);

        let kinds: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|m| message_type(&m))
            .collect();
        assert_eq!(kinds, vec!["hello", "tick", "tick", "done"]);
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_carries_stream_metadata() {
        let emitter =
            ReplayEmitter::new("game_1", vec![event(0, EventKind::Shot)], 60.0).unwrap();
        let (tx, mut rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("lst_1", tx);

        emitter.run().await;

        let hello: serde_json::Value =
            serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(hello["type"], "hello");
        assert_eq!(hello["gameId"], "game_1");
        assert_eq!(hello["speed"], 60.0);
        assert_eq!(hello["totalEvents"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_event_waits_from_kickoff() {
        // First tick at ts=120 with speed 60 must wait 2s, not fire at once.
        let emitter =
            ReplayEmitter::new("game_1", vec![event(120, EventKind::Shot)], 60.0).unwrap();
        let started = tokio::time::Instant::now();
        emitter.run().await;
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_is_noop() {
        let emitter =
            ReplayEmitter::new("game_1", vec![event(0, EventKind::Shot)], 60.0).unwrap();
        emitter.run().await;
        assert_eq!(emitter.state(), ReplayState::Done);

        // A repeated start emits nothing and leaves the state terminal.
        let (tx, mut rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("late", tx);
        assert_eq!(message_type(&rx.try_recv().unwrap()), "done");
        emitter.run().await;
        assert_eq!(emitter.state(), ReplayState::Done);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_after_done_gets_done_only() {
        let emitter =
            ReplayEmitter::new("game_1", vec![event(0, EventKind::Shot)], 60.0).unwrap();
        emitter.run().await;

        let (tx, mut rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("late", tx);
        assert_eq!(emitter.listener_count(), 0);

        assert_eq!(message_type(&rx.try_recv().unwrap()), "done");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_listener_does_not_stall_others() {
        let events = vec![
            event(0, EventKind::KeyPass),
            event(10, EventKind::Shot),
            event(20, EventKind::Corner),
        ];
        let emitter = ReplayEmitter::new("game_1", events, 60.0).unwrap();

        let (slow_tx, _slow_rx) = mpsc::channel(1);
        let slow = emitter.subscribe("slow", slow_tx);
        let (fast_tx, mut fast_rx) = mpsc::channel(16);
        let _fast = emitter.subscribe("fast", fast_tx);

        emitter.run().await;

        // Fast listener saw the whole stream.
        let count = std::iter::from_fn(|| fast_rx.try_recv().ok()).count();
        assert_eq!(count, 5);
        // Slow listener took one message, dropped the rest.
        assert_eq!(slow.drop_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnected_listener_pruned() {
        let emitter = ReplayEmitter::new(
            "game_1",
            vec![event(0, EventKind::Shot), event(10, EventKind::Shot)],
            60.0,
        )
        .unwrap();
        let (tx, rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("gone", tx);
        drop(rx);

        emitter.run().await;
        assert_eq!(emitter.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_delivery() {
        let emitter = ReplayEmitter::new("game_1", vec![], 60.0).unwrap();
        let (tx, _rx) = mpsc::channel(16);
        let _listener = emitter.subscribe("lst_1", tx);
        assert_eq!(emitter.listener_count(), 1);
        emitter.unsubscribe("lst_1");
        assert_eq!(emitter.listener_count(), 0);
    }
}
