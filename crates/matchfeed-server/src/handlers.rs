//! HTTP request handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use matchfeed_core::{CanonicalEvent, Roster, RosterBuilder, WindowBounds};
use matchfeed_facets::FacetKind;
use matchfeed_pipeline::FlushOutcome;
use matchfeed_replay::ReplayState;

use crate::bridge;
use crate::errors::ApiError;
use crate::service::{self, RegisterGameRequest, RegisteredGame};
use crate::state::AppState;

/// POST /games
pub async fn register_game(
    State(state): State<AppState>,
    Json(request): Json<RegisterGameRequest>,
) -> Result<Json<RegisteredGame>, ApiError> {
    service::register_game(&state, request).map(Json)
}

/// POST /games/{game_id}/replay
///
/// Starting an already-running or finished replay is a no-op that reports
/// the current state.
pub async fn start_replay(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(emitter) = state.emitter(&game_id) else {
        return Err(ApiError::NotFound(format!("game {game_id} not registered")));
    };
    match emitter.state() {
        ReplayState::Running => {
            return Ok(Json(json!({"gameId": game_id, "status": "running"})));
        }
        ReplayState::Done => {
            return Ok(Json(json!({"gameId": game_id, "status": "done"})));
        }
        ReplayState::Idle => {}
    }

    bridge::spawn(state.accumulator.clone(), &emitter);
    let run_emitter = emitter.clone();
    let _handle = tokio::spawn(async move { run_emitter.run().await });

    info!(game_id, "replay started");
    Ok(Json(json!({"gameId": game_id, "status": "running"})))
}

/// Ingestion request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    /// Game to buffer into.
    pub game_id: String,
    /// Bucket-assignment timestamp.
    pub timestamp_sec: u64,
    /// The event itself.
    pub event: CanonicalEvent,
}

/// POST /ingest — buffer one event. Acknowledges buffering only, not
/// durability.
pub async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.game_id.is_empty() {
        return Err(ApiError::BadRequest("gameId must not be empty".into()));
    }
    state
        .accumulator
        .ingest(&request.game_id, request.timestamp_sec, request.event);
    Ok(Json(json!({"buffered": true})))
}

/// Flush request body. Omitting the range flushes every buffered window
/// for the game in ascending order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushRequest {
    /// Game to flush.
    pub game_id: String,
    /// Window start (paired with `end_sec`).
    #[serde(default)]
    pub start_sec: Option<u64>,
    /// Window end (paired with `start_sec`).
    #[serde(default)]
    pub end_sec: Option<u64>,
}

/// Flush response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlushResponse {
    /// Windows actually persisted.
    pub flushed: usize,
    /// Durable window id when a single non-empty window was flushed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
}

/// POST /flush
pub async fn flush(
    State(state): State<AppState>,
    Json(request): Json<FlushRequest>,
) -> Result<Json<FlushResponse>, ApiError> {
    if request.game_id.is_empty() {
        return Err(ApiError::BadRequest("gameId must not be empty".into()));
    }
    match (request.start_sec, request.end_sec) {
        (Some(start), Some(end)) => {
            let outcome = state.accumulator.flush_window(&request.game_id, start, end)?;
            let response = match outcome {
                FlushOutcome::Flushed { window_id } => FlushResponse {
                    flushed: 1,
                    window_id: Some(window_id),
                },
                FlushOutcome::Empty => FlushResponse {
                    flushed: 0,
                    window_id: None,
                },
            };
            Ok(Json(response))
        }
        (None, None) => {
            let flushed = state.accumulator.flush_game(&request.game_id)?;
            Ok(Json(FlushResponse {
                flushed,
                window_id: None,
            }))
        }
        _ => Err(ApiError::BadRequest(
            "startSec and endSec must be provided together".into(),
        )),
    }
}

/// GET /games/{game_id}/windows/{start_sec}/{end_sec}/facets/{facet}
///
/// Computes the facet on demand from the stored raw snapshot. A window
/// with no stored raw snapshot is a 404, distinct from a bad facet name.
pub async fn facet(
    State(state): State<AppState>,
    Path((game_id, start_sec, end_sec, facet)): Path<(String, u64, u64, String)>,
) -> Result<Json<matchfeed_facets::Facet>, ApiError> {
    let Some(kind) = FacetKind::parse(&facet) else {
        return Err(ApiError::BadRequest(format!("unknown facet kind: {facet}")));
    };
    let bounds = WindowBounds {
        game_id,
        start_sec,
        end_sec,
    };
    let Some(events) = state.gateway.fetch_raw_snapshot(&bounds)? else {
        return Err(ApiError::NotFound(format!(
            "no raw snapshot for game {} window [{start_sec}, {end_sec})",
            bounds.game_id
        )));
    };

    // Home/away are assigned once at stream start; every window must see
    // the same roster the compressor saw. Only a game that was never
    // registered falls back to deriving slots from the stored events.
    let roster = state
        .accumulator
        .roster(&bounds.game_id)
        .unwrap_or_else(|| roster_from_events(&events));
    Ok(Json(matchfeed_facets::extract(kind, &events, &roster)))
}

/// Fallback roster for games with no registration: first two distinct
/// team names in the stored snapshot fill the slots.
fn roster_from_events(events: &[CanonicalEvent]) -> Roster {
    let mut builder = RosterBuilder::new();
    for event in events {
        builder.observe(event.team.as_deref());
        if builder.is_complete() {
            break;
        }
    }
    builder.build().unwrap_or_else(|| Roster::new("", ""))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let active_replays = state
        .emitters
        .iter()
        .filter(|e| e.value().state() == ReplayState::Running)
        .count();
    Json(json!({
        "status": "ok",
        "uptimeSec": state.start_time.elapsed().as_secs(),
        "registeredGames": state.emitters.len(),
        "activeReplays": active_replays,
    }))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}
