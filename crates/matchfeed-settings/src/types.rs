//! Typed settings sections.
//!
//! Wire format is camelCase JSON so the same file can be read by dashboard
//! tooling. Every section has compiled defaults; [`MatchfeedSettings::normalize`]
//! pulls out-of-range values back to them.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Windowing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowSettings {
    /// Fixed window duration in match-clock seconds.
    pub duration_sec: u64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { duration_sec: 300 }
    }
}

/// Replay emitter parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplaySettings {
    /// Wall-clock compression factor.
    pub speed: f64,
    /// Per-listener outbound channel capacity.
    pub channel_capacity: usize,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            speed: 60.0,
            channel_capacity: 64,
        }
    }
}

/// Store parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Maximum connection pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: "matchfeed.db".into(),
            pool_size: 8,
            busy_timeout_ms: 30_000,
        }
    }
}

/// HTTP server parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// Root settings document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchfeedSettings {
    /// Windowing parameters.
    pub window: WindowSettings,
    /// Replay emitter parameters.
    pub replay: ReplaySettings,
    /// Store parameters.
    pub store: StoreSettings,
    /// HTTP server parameters.
    pub server: ServerSettings,
}

impl MatchfeedSettings {
    /// Pull out-of-range values back to their defaults, logging each fix.
    pub fn normalize(&mut self) {
        if self.window.duration_sec == 0 {
            warn!("window.durationSec must be positive, using default");
            self.window.duration_sec = WindowSettings::default().duration_sec;
        }
        if self.replay.speed.is_nan() || self.replay.speed <= 0.0 {
            warn!(speed = self.replay.speed, "replay.speed must be positive, using default");
            self.replay.speed = ReplaySettings::default().speed;
        }
        if self.replay.channel_capacity == 0 {
            warn!("replay.channelCapacity must be positive, using default");
            self.replay.channel_capacity = ReplaySettings::default().channel_capacity;
        }
        if self.store.pool_size == 0 {
            warn!("store.poolSize must be positive, using default");
            self.store.pool_size = StoreSettings::default().pool_size;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
