//! # matchfeed-replay
//!
//! Timed rebroadcast of a normalized event log. One [`ReplayEmitter`] per
//! game drives a single cooperative loop: it sleeps the clamped, speed-
//! compressed gap between consecutive events and fans each one out to every
//! subscriber as a `tick`, bracketed by a `hello` handshake and a terminal
//! `done`. Delivery is non-blocking per listener so a slow subscriber only
//! loses its own messages.

#![deny(unsafe_code)]

mod emitter;
mod listener;
mod message;

pub use emitter::{
    MAX_DELAY_MS, MIN_DELAY_MS, ReplayEmitter, ReplayError, ReplayState, inter_event_delay,
};
pub use listener::ReplayListener;
pub use message::ReplayMessage;
