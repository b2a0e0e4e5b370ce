//! # matchfeed-core
//!
//! Canonical match-event model shared by every other crate.
//!
//! Three vocabularies live here:
//!
//! - **[`CanonicalEvent`]**: a normalized, immutable match event on the wire.
//! - **[`WindowBounds`]**: fixed-duration, half-open time buckets of match
//!   clock, scoped to one game.
//! - **[`CompressedSnapshot`]**: the per-window summary (counters, key
//!   moments, deltas, running score) derived at flush time.
//!
//! Everything in this crate is pure data — no I/O, no clocks, no locks.

#![deny(unsafe_code)]

pub mod event;
pub mod roster;
pub mod snapshot;
pub mod window;

pub use event::{CanonicalEvent, CardColor, EventAttributes, EventKind};
pub use roster::{Roster, RosterBuilder, TeamSide};
pub use snapshot::{
    CompressedSnapshot, CounterDeltas, KEY_MOMENT_CAP, KeyMoment, KeyMomentBuffer, Score,
    SideCounters,
};
pub use window::{DEFAULT_WINDOW_SECS, WindowBounds, window_start};
