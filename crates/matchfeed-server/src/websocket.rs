//! WebSocket rebroadcast of replay streams.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use matchfeed_replay::ReplayEmitter;

use crate::errors::ApiError;
use crate::state::AppState;

/// GET /ws/{game_id} — upgrade and stream the game's replay messages.
///
/// Subscribing to a finished replay yields a single terminal message.
pub async fn ws_handler(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let Some(emitter) = state.emitter(&game_id) else {
        return Err(ApiError::NotFound(format!("game {game_id} not registered")));
    };
    let capacity = state.settings.replay.channel_capacity;
    Ok(ws.on_upgrade(move |socket| stream_replay(socket, emitter, capacity)))
}

/// Pump replay messages into the socket until the stream ends or the
/// client goes away.
async fn stream_replay(socket: WebSocket, emitter: Arc<ReplayEmitter>, capacity: usize) {
    let listener_id = format!("ws_{}", Uuid::now_v7());
    let (tx, mut rx) = mpsc::channel(capacity);
    let _listener = emitter.subscribe(listener_id.clone(), tx);
    info!(game_id = emitter.game_id(), listener_id, "websocket client connected");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            message = rx.recv() => {
                match message {
                    Some(json) => {
                        if sink.send(Message::Text(json.as_str().into())).await.is_err() {
                            debug!(listener_id, "websocket send failed, dropping client");
                            break;
                        }
                    }
                    // Emitter finished and cleared its listeners.
                    None => break,
                }
            }
            incoming = stream.next() => {
                // Clients do not speak; anything but a clean frame ends the
                // session.
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    emitter.unsubscribe(&listener_id);
    info!(game_id = emitter.game_id(), listener_id, "websocket client disconnected");
}
