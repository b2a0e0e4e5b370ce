//! Window math: fixed-duration, half-open buckets of match clock.

use serde::{Deserialize, Serialize};

/// Default window duration in seconds (5 minutes of match clock).
pub const DEFAULT_WINDOW_SECS: u64 = 300;

/// Bucket start for a timestamp: `floor(ts / duration) * duration`.
///
/// An event exactly on a boundary belongs to the window it opens, so with
/// duration 300 a `ts` of 300 lands in `[300, 600)`.
#[must_use]
pub fn window_start(timestamp_sec: u64, duration_sec: u64) -> u64 {
    (timestamp_sec / duration_sec) * duration_sec
}

/// One fixed-duration window of one game's match clock.
///
/// The interval is half-open: `start_sec <= ts < end_sec`. Windows are
/// unique per `(game_id, start_sec, end_sec)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowBounds {
    /// Game this window belongs to.
    pub game_id: String,
    /// Inclusive start of the interval.
    pub start_sec: u64,
    /// Exclusive end of the interval.
    pub end_sec: u64,
}

impl WindowBounds {
    /// Build the bounds for the window containing `timestamp_sec`.
    #[must_use]
    pub fn containing(game_id: impl Into<String>, timestamp_sec: u64, duration_sec: u64) -> Self {
        let start_sec = window_start(timestamp_sec, duration_sec);
        Self {
            game_id: game_id.into(),
            start_sec,
            end_sec: start_sec + duration_sec,
        }
    }

    /// Whether a timestamp falls inside this window.
    #[must_use]
    pub fn contains(&self, timestamp_sec: u64) -> bool {
        timestamp_sec >= self.start_sec && timestamp_sec < self.end_sec
    }

    /// Window duration in seconds.
    #[must_use]
    pub fn duration_sec(&self) -> u64 {
        self.end_sec - self.start_sec
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_event_opens_next_window() {
        assert_eq!(window_start(299, 300), 0);
        assert_eq!(window_start(300, 300), 300);
        assert_eq!(window_start(301, 300), 300);
    }

    #[test]
    fn zero_timestamp_first_window() {
        assert_eq!(window_start(0, 300), 0);
    }

    #[test]
    fn containing_builds_half_open_interval() {
        let w = WindowBounds::containing("g1", 450, 300);
        assert_eq!(w.start_sec, 300);
        assert_eq!(w.end_sec, 600);
        assert!(w.contains(300));
        assert!(w.contains(599));
        assert!(!w.contains(600));
        assert!(!w.contains(299));
    }

    #[test]
    fn duration() {
        let w = WindowBounds::containing("g1", 10, 300);
        assert_eq!(w.duration_sec(), 300);
    }

    proptest! {
        #[test]
        fn every_timestamp_lands_in_its_own_window(ts in 0u64..100_000, dur in 1u64..3600) {
            let w = WindowBounds::containing("g", ts, dur);
            prop_assert!(w.contains(ts));
            prop_assert_eq!(w.start_sec % dur, 0);
            prop_assert_eq!(w.end_sec - w.start_sec, dur);
        }

        #[test]
        fn window_start_is_idempotent(ts in 0u64..100_000, dur in 1u64..3600) {
            let start = window_start(ts, dur);
            prop_assert_eq!(window_start(start, dur), start);
        }
    }
}
