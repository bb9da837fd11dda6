//! WebSocket transport: one socket is one player identity for as long as it
//! stays open.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::{
    models::{ClientMessage, ServerMessage},
    state::PlayerId,
    worker::GameHandle,
};

pub async fn ws_handler(State(handle): State<GameHandle>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, handle))
}

async fn handle_socket(socket: WebSocket, handle: GameHandle) {
    let id = PlayerId::random();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut inbox = handle.connect(id);

    let forward = tokio::spawn(async move {
        while let Some(message) = inbox.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(err) => {
                    warn!("Failed to encode message for {}: {}", id, err);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = ws_rx.next().await {
        match frame {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => handle.act(id, message),
                Err(err) => {
                    debug!("Player {} sent a bad message: {}", id, err);
                    handle.reply(id, ServerMessage::bad_request(format!("Bad message: {}", err)));
                }
            },
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    handle.disconnect(id);
    forward.abort();
    debug!("Connection {} closed", id);
}
