//! # matchfeed-pipeline
//!
//! The windowed-compression pipeline: buckets canonical events into
//! fixed-duration windows per game, and flushes each window into a durable
//! raw snapshot plus a compressed summary (STKM).
//!
//! Concurrency model: bucket state is sharded per game — a [`dashmap`] of
//! per-game mutexes, no global lock. An event racing a flush is either
//! fully recorded before the bucket is cleared or lands in a fresh bucket;
//! it is never lost or double-counted.
//!
//! Flush durability: a bucket is only discarded after the persistence
//! gateway accepted both artifacts. On failure the bucket is retained, so
//! retrying the identical flush reproduces the identical snapshots.

#![deny(unsafe_code)]

pub mod accumulator;
pub mod compressor;
pub mod errors;
pub mod gateway;
pub mod memory;

pub use accumulator::{FlushOutcome, WindowAccumulator};
pub use compressor::compress;
pub use errors::{GatewayError, PipelineError};
pub use gateway::{PersistenceGateway, SnapshotKind};
pub use memory::MemoryGateway;
