use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::extractors::auth::AuthUser;
use crate::state::AppState;

const APOLOGY_REPLY: &str =
    "Sorry, I could not come up with an answer right now. Please try again in a moment.";

const SYSTEM_PROMPT: &str = "You are the assistant for a college event ticketing platform. \
    Students ask about browsing events, booking tickets and their attendance; organizers ask \
    about publishing events and scanning tickets. Answer in plain text, briefly and concretely. \
    If a question is unrelated to the platform, say so politely.";

/// Wire envelope for the chat channel. One `Message` in, one `Reply` (or
/// `Error`) out per exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatEnvelope {
    Message { content: String },
    Reply { content: String },
    Error { message: String },
}

pub async fn chat_ws(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ws: WebSocketUpgrade,
) -> Response {
    info!("Chat connection requested by user {}", user.id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, user.id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: String) {
    let (mut sink, mut stream) = socket.split();

    // Prompts wait in a bounded queue; once it is full the client is told to
    // back off instead of the server buffering without limit.
    let (pending_tx, mut pending_rx) = mpsc::channel::<String>(state.config.chat_queue_depth);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ChatEnvelope>(16);

    let mut send_task = tokio::spawn(async move {
        while let Some(envelope) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&envelope) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize chat envelope: {:?}", e);
                    continue;
                }
            };

            if sink.send(Message::Text(json.into())).await.is_err() {
                // Client disconnected
                break;
            }
        }
    });

    let worker_outbound = outbound_tx.clone();
    let worker_state = state.clone();
    let mut worker_task = tokio::spawn(async move {
        while let Some(prompt) = pending_rx.recv().await {
            let timeout = Duration::from_secs(worker_state.config.ai_timeout_secs);
            let generated = tokio::time::timeout(
                timeout,
                worker_state.llm_service.generate(
                    &worker_state.config.gemini_api_key,
                    &prompt,
                    SYSTEM_PROMPT,
                ),
            )
            .await;

            let content = match generated {
                Ok(Ok(reply)) => reply,
                Ok(Err(e)) => {
                    warn!("Chat generation failed: {:?}", e);
                    APOLOGY_REPLY.to_string()
                }
                Err(_) => {
                    warn!("Chat generation timed out after {:?}", timeout);
                    APOLOGY_REPLY.to_string()
                }
            };

            if worker_outbound.send(ChatEnvelope::Reply { content }).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ChatEnvelope>(&text) {
                    Ok(ChatEnvelope::Message { content }) => {
                        match pending_tx.try_send(content) {
                            Ok(()) => {}
                            Err(mpsc::error::TrySendError::Full(_)) => {
                                let busy = ChatEnvelope::Error {
                                    message: "Too many pending messages, wait for a reply first"
                                        .to_string(),
                                };
                                if outbound_tx.send(busy).await.is_err() {
                                    break;
                                }
                            }
                            Err(mpsc::error::TrySendError::Closed(_)) => break,
                        }
                    }
                    Ok(other) => {
                        warn!(?other, "Unexpected chat message from client");
                    }
                    Err(e) => {
                        debug!("Failed to parse chat message: {:?}", e);
                        let invalid = ChatEnvelope::Error {
                            message: "Invalid message format".to_string(),
                        };
                        if outbound_tx.send(invalid).await.is_err() {
                            break;
                        }
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            worker_task.abort();
        },
        _ = (&mut recv_task) => {
            send_task.abort();
            worker_task.abort();
        },
        _ = (&mut worker_task) => {
            send_task.abort();
            recv_task.abort();
        },
    }

    info!("Chat connection closed for user {}", user_id);
}
