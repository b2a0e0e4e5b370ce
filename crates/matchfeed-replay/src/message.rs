//! Wire messages pushed to replay subscribers.

use serde::{Deserialize, Serialize};

use matchfeed_core::CanonicalEvent;

/// A message on the replay stream.
///
/// Every subscriber sees, in order: one `hello`, zero or more `tick`s, and
/// exactly one terminal `done`, after which the stream is closed from the
/// source side. Late joiners skip the ticks already emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayMessage {
    /// Stream handshake.
    #[serde(rename_all = "camelCase")]
    Hello {
        /// Game the stream replays.
        game_id: String,
        /// Wall-clock compression factor.
        speed: f64,
        /// Events the full stream will carry.
        total_events: u64,
    },
    /// One replayed event.
    #[serde(rename_all = "camelCase")]
    Tick {
        /// Zero-based position in the stream.
        seq: u64,
        /// Match-clock timestamp of the event.
        timestamp_sec: u64,
        /// The event itself.
        event: CanonicalEvent,
    },
    /// Terminal marker.
    Done,
}
