//! Shared state accessible from axum handlers.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use metrics_exporter_prometheus::PrometheusHandle;

use matchfeed_pipeline::{PersistenceGateway, WindowAccumulator};
use matchfeed_replay::ReplayEmitter;
use matchfeed_settings::MatchfeedSettings;

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Window accumulator, shared across all games.
    pub accumulator: Arc<WindowAccumulator>,
    /// Durable store behind the pipeline.
    pub gateway: Arc<dyn PersistenceGateway>,
    /// One replay emitter per registered game.
    pub emitters: Arc<DashMap<String, Arc<ReplayEmitter>>>,
    /// Loaded settings.
    pub settings: Arc<MatchfeedSettings>,
    /// When the server started.
    pub start_time: Instant,
    /// Renders the `/metrics` endpoint.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Build state around a gateway and settings.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        settings: MatchfeedSettings,
        metrics: PrometheusHandle,
    ) -> Self {
        let accumulator = Arc::new(WindowAccumulator::new(
            Arc::clone(&gateway),
            settings.window.duration_sec,
        ));
        Self {
            accumulator,
            gateway,
            emitters: Arc::new(DashMap::new()),
            settings: Arc::new(settings),
            start_time: Instant::now(),
            metrics,
        }
    }

    /// Look up a game's emitter.
    #[must_use]
    pub fn emitter(&self, game_id: &str) -> Option<Arc<ReplayEmitter>> {
        self.emitters.get(game_id).map(|e| Arc::clone(&e))
    }
}
