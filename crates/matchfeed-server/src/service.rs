//! Game registration shared by the HTTP handler and fixture loading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use matchfeed_core::Roster;
use matchfeed_normalize::{ProviderRecord, normalize_log};
use matchfeed_replay::{ReplayEmitter, ReplayState};

use crate::errors::ApiError;
use crate::state::AppState;

/// A game registration request: metadata plus the provider log to replay.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGameRequest {
    /// Game identifier.
    pub game_id: String,
    /// Opaque metadata stored with the game.
    #[serde(default)]
    pub metadata: Value,
    /// Provider-native records, in feed order.
    #[serde(default)]
    pub records: Vec<ProviderRecord>,
}

/// What registration produced.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredGame {
    /// Game identifier.
    pub game_id: String,
    /// Canonical events that survived normalization.
    pub total_events: usize,
    /// Provider records dropped as unmappable.
    pub dropped: usize,
    /// Resolved roster, when the stream named two teams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Roster>,
}

/// Normalize the provider log, persist the game, and seed its emitter.
///
/// Re-registering an idle game replaces its emitter; a game whose replay is
/// running or finished cannot be re-registered.
pub fn register_game(
    state: &AppState,
    request: RegisterGameRequest,
) -> Result<RegisteredGame, ApiError> {
    if request.game_id.is_empty() {
        return Err(ApiError::BadRequest("gameId must not be empty".into()));
    }
    if let Some(existing) = state.emitter(&request.game_id)
        && existing.state() != ReplayState::Idle
    {
        return Err(ApiError::Conflict(format!(
            "game {} replay already started",
            request.game_id
        )));
    }

    let (events, roster) = normalize_log(&request.records);
    let dropped = request.records.len() - events.len();

    state.gateway.upsert_game(&request.game_id, &request.metadata)?;
    if let Some(ref roster) = roster {
        state.accumulator.set_roster(&request.game_id, roster.clone());
    }

    let total_events = events.len();
    let emitter = ReplayEmitter::new(
        request.game_id.clone(),
        events,
        state.settings.replay.speed,
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let _ = state
        .emitters
        .insert(request.game_id.clone(), Arc::new(emitter));

    info!(
        game_id = %request.game_id,
        total_events,
        dropped,
        "game registered"
    );
    Ok(RegisteredGame {
        game_id: request.game_id,
        total_events,
        dropped,
        roster,
    })
}
