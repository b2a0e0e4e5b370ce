//! Pipeline and gateway error types.

use thiserror::Error;

/// Errors surfaced by a [`crate::PersistenceGateway`] implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backing store rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A payload could not be serialized for storage.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by the window accumulator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The flush range does not describe a valid window for the configured
    /// duration. Rejected synchronously with no state mutation.
    #[error(
        "malformed flush range [{start_sec}, {end_sec}) for window duration {duration_sec}"
    )]
    MalformedRange {
        /// Requested start.
        start_sec: u64,
        /// Requested end.
        end_sec: u64,
        /// Configured window duration.
        duration_sec: u64,
    },

    /// A window older than the game's last flushed window was requested.
    ///
    /// Deltas and the running score are computed against the previous
    /// snapshot, so per-game flush order must be non-decreasing. The
    /// violation is reported instead of silently corrupting baselines.
    #[error(
        "out-of-order flush for game {game_id}: window {requested_start_sec} after {last_flushed_start_sec} was already flushed"
    )]
    OutOfOrderFlush {
        /// Game whose ordering was violated.
        game_id: String,
        /// Start of the requested window.
        requested_start_sec: u64,
        /// Start of the most recently flushed window.
        last_flushed_start_sec: u64,
    },

    /// Persistence failed; the in-memory bucket was retained for retry.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
