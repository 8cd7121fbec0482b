//! WebSocket transport for the streaming protocol
//!
//! Each connection gets its own `StreamSessionHandler` and a
//! sequential receive loop. A transport-level close while a session is
//! active runs the same finalize path as an explicit `end_session`.

use super::handler::StreamSessionHandler;
use super::messages::{ClientMessage, ServerMessage};
use crate::http::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut handler = StreamSessionHandler::new(
        state.factory.clone(),
        state.repository.clone(),
        state.events.clone(),
    );

    let connection_id = handler.connection_id().to_string();
    info!("Stream connection established: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();

    if send(&mut sender, &handler.on_connect()).await.is_err() {
        return;
    }

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let replies = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => handler.handle_message(message).await,
                    Err(e) => vec![ServerMessage::Error {
                        message: format!("unrecognized message: {}", e),
                    }],
                };

                for reply in &replies {
                    if send(&mut sender, reply).await.is_err() {
                        // Writer gone; the post-loop cleanup still
                        // finalizes any active session.
                        handler.on_disconnect().await;
                        return;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = sender.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                warn!("Stream connection {} errored: {}", connection_id, e);
                break;
            }
            _ => {}
        }
    }

    handler.on_disconnect().await;

    info!("Stream connection closed: {}", connection_id);
}

async fn send(
    sender: &mut (impl SinkExt<Message> + Unpin),
    message: &ServerMessage,
) -> Result<(), ()> {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(_) => return Err(()),
    };

    sender.send(Message::Text(text)).await.map_err(|_| ())
}
