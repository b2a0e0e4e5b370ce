//! Compressed per-window summary types (STKM).
//!
//! A [`CompressedSnapshot`] is derived at flush time from one window's raw
//! events plus the immediately preceding snapshot of the same game. Deltas
//! and the running score are only correct when a game's windows are flushed
//! in non-decreasing `start_sec` order; that ordering is enforced by the
//! accumulator, not here.

use serde::{Deserialize, Serialize};

use crate::event::{CardColor, EventKind};

/// Maximum key moments retained per snapshot.
pub const KEY_MOMENT_CAP: usize = 8;

/// Per-side one-hot counters over a window's raw events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideCounters {
    /// Shot attempts, goals included.
    pub shots: u32,
    /// Goals.
    pub goals: u32,
    /// Goals plus shots flagged on target.
    pub shots_on_target: u32,
    /// Passes ending inside the box zone.
    pub box_entries: u32,
    /// Corners won.
    pub corners: u32,
    /// Fouls committed.
    pub fouls: u32,
    /// Cards shown.
    pub cards: u32,
}

impl SideCounters {
    /// Trend deltas versus a previous window's counters.
    #[must_use]
    pub fn delta_from(&self, prev: &SideCounters) -> CounterDeltas {
        let diff = |a: u32, b: u32| i64::from(a) - i64::from(b);
        CounterDeltas {
            shots: diff(self.shots, prev.shots),
            goals: diff(self.goals, prev.goals),
            shots_on_target: diff(self.shots_on_target, prev.shots_on_target),
            box_entries: diff(self.box_entries, prev.box_entries),
            corners: diff(self.corners, prev.corners),
            fouls: diff(self.fouls, prev.fouls),
            cards: diff(self.cards, prev.cards),
        }
    }
}

/// Signed per-counter differences versus the previous window.
///
/// All zero when there is no previous snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterDeltas {
    /// Shot attempt delta.
    pub shots: i64,
    /// Goal delta.
    pub goals: i64,
    /// On-target delta.
    pub shots_on_target: i64,
    /// Box entry delta.
    pub box_entries: i64,
    /// Corner delta.
    pub corners: i64,
    /// Foul delta.
    pub fouls: i64,
    /// Card delta.
    pub cards: i64,
}

/// Cumulative running score carried across a game's flushes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Home goals so far.
    pub home: u32,
    /// Away goals so far.
    pub away: u32,
}

/// One impactful event projected into the key-moment list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoment {
    /// Absolute match-clock timestamp.
    pub timestamp_sec: u64,
    /// Event type.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Provider team name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Player involved. Always present — moments without a known player are
    /// filtered out before projection.
    pub player: String,
    /// On-target annotation for shot moments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_target: Option<bool>,
    /// Card color for card moments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardColor>,
}

/// Fixed-capacity, most-recent-first key-moment buffer.
///
/// Pushing when full evicts the oldest entry, so the structure stays bounded
/// instead of growing and being sliced at read time.
#[derive(Clone, Debug)]
pub struct KeyMomentBuffer {
    cap: usize,
    // Most recent first.
    items: Vec<KeyMoment>,
}

impl KeyMomentBuffer {
    /// Create a buffer holding at most `cap` moments.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            items: Vec::with_capacity(cap),
        }
    }

    /// Record a moment as the most recent entry.
    pub fn push(&mut self, moment: KeyMoment) {
        self.items.insert(0, moment);
        self.items.truncate(self.cap);
    }

    /// Number of retained moments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the buffer, yielding moments most-recent-first.
    #[must_use]
    pub fn into_vec(self) -> Vec<KeyMoment> {
        self.items
    }
}

impl Default for KeyMomentBuffer {
    fn default() -> Self {
        Self::new(KEY_MOMENT_CAP)
    }
}

/// The compressed per-window summary (STKM).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedSnapshot {
    /// Game this window belongs to.
    pub game_id: String,
    /// Window start (inclusive).
    pub start_sec: u64,
    /// Window end (exclusive).
    pub end_sec: u64,
    /// Home-side counters for this window only.
    pub home: SideCounters,
    /// Away-side counters for this window only.
    pub away: SideCounters,
    /// Cumulative score through this window.
    pub score: Score,
    /// Most-recent-first impactful moments, at most [`KEY_MOMENT_CAP`].
    pub key_moments: Vec<KeyMoment>,
    /// Home-side trend deltas versus the previous window.
    pub home_deltas: CounterDeltas,
    /// Away-side trend deltas versus the previous window.
    pub away_deltas: CounterDeltas,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(ts: u64) -> KeyMoment {
        KeyMoment {
            timestamp_sec: ts,
            kind: EventKind::Shot,
            team: Some("A".into()),
            player: "X".into(),
            on_target: None,
            card: None,
        }
    }

    #[test]
    fn deltas_subtract_previous() {
        let prev = SideCounters {
            shots: 3,
            goals: 1,
            shots_on_target: 2,
            box_entries: 4,
            corners: 2,
            fouls: 5,
            cards: 1,
        };
        let cur = SideCounters {
            shots: 1,
            goals: 0,
            shots_on_target: 1,
            box_entries: 6,
            corners: 2,
            fouls: 3,
            cards: 2,
        };
        let d = cur.delta_from(&prev);
        assert_eq!(d.shots, -2);
        assert_eq!(d.goals, -1);
        assert_eq!(d.shots_on_target, -1);
        assert_eq!(d.box_entries, 2);
        assert_eq!(d.corners, 0);
        assert_eq!(d.fouls, -2);
        assert_eq!(d.cards, 1);
    }

    #[test]
    fn default_deltas_are_zero() {
        let d = CounterDeltas::default();
        assert_eq!(d, SideCounters::default().delta_from(&SideCounters::default()));
    }

    #[test]
    fn buffer_keeps_most_recent_first() {
        let mut buf = KeyMomentBuffer::new(3);
        for ts in [10, 20, 30] {
            buf.push(moment(ts));
        }
        let out = buf.into_vec();
        let stamps: Vec<u64> = out.iter().map(|m| m.timestamp_sec).collect();
        assert_eq!(stamps, vec![30, 20, 10]);
    }

    #[test]
    fn buffer_evicts_oldest_when_full() {
        let mut buf = KeyMomentBuffer::new(2);
        for ts in [1, 2, 3, 4] {
            buf.push(moment(ts));
        }
        assert_eq!(buf.len(), 2);
        let stamps: Vec<u64> = buf.into_vec().iter().map(|m| m.timestamp_sec).collect();
        assert_eq!(stamps, vec![4, 3]);
    }

    #[test]
    fn default_buffer_uses_cap_constant() {
        let mut buf = KeyMomentBuffer::default();
        for ts in 0..20 {
            buf.push(moment(ts));
        }
        assert_eq!(buf.len(), KEY_MOMENT_CAP);
    }

    #[test]
    fn snapshot_wire_shape() {
        let snap = CompressedSnapshot {
            game_id: "g1".into(),
            start_sec: 0,
            end_sec: 300,
            home: SideCounters::default(),
            away: SideCounters::default(),
            score: Score { home: 1, away: 0 },
            key_moments: vec![moment(42)],
            home_deltas: CounterDeltas::default(),
            away_deltas: CounterDeltas::default(),
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["gameId"], "g1");
        assert_eq!(json["score"]["home"], 1);
        assert_eq!(json["keyMoments"][0]["timestampSec"], 42);
        assert_eq!(json["keyMoments"][0]["type"], "shot");
        let back: CompressedSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }
}
