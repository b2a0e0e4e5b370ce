//! # matchfeed-server
//!
//! HTTP + WebSocket surface over the matchfeed pipeline. Registers games,
//! drives timed replays, exposes the accumulator's ingest/flush operations,
//! computes facets on demand, and rebroadcasts replay streams to WebSocket
//! clients.

#![deny(unsafe_code)]

pub mod bridge;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod service;
pub mod state;
pub mod websocket;

pub use errors::ApiError;
pub use server::router;
pub use state::AppState;
