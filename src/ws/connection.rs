//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands to the [`RoomService`] and forwarding the
//! events of the joined room.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::RoomSubscription;
use crate::domain::{CallerIdentity, ConnectionId, Outcome, RoomEvent};
use crate::service::RoomService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events of the joined room from the [`broadcast::Receiver`].
/// - Disconnects the participant from its room when the socket closes.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<RoomEvent>,
    room_service: Arc<RoomService>,
    identity: CallerIdentity,
) {
    let connection_id = ConnectionId::new();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subscription = RoomSubscription::new();

    tracing::debug!(%connection_id, nickname = %identity.nickname, "ws connection opened");

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(
                            &text,
                            connection_id,
                            &identity,
                            &room_service,
                            &mut subscription,
                        )
                        .await;
                        if let Some(reply_json) = reply
                            && ws_tx.send(Message::text(reply_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(room_event) => {
                        if subscription.matches(room_event.room_id()) {
                            let Some(json) = WsMessage::event(&room_event).to_json() else {
                                continue;
                            };
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%connection_id, lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    let _ = room_service.disconnect(connection_id).await;
    if let Some(room_id) = subscription.leave() {
        tracing::debug!(%connection_id, %room_id, "ws connection closed");
    } else {
        tracing::debug!(%connection_id, "ws connection closed before joining");
    }
}

/// Handles a text message from the client.
///
/// Room actions have no reply; only transport-level problems (bad JSON,
/// unknown command) produce an error envelope for the sender.
async fn handle_text_message(
    text: &str,
    connection_id: ConnectionId,
    identity: &CallerIdentity,
    room_service: &RoomService,
    subscription: &mut RoomSubscription,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON").to_json();
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command").to_json();
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command").to_json();
    };

    let outcome = dispatch(&command, connection_id, identity, room_service).await;
    if let WsCommand::Join { room_id } = &command
        && outcome == Outcome::Applied
    {
        subscription.enter(room_id.clone());
    }
    tracing::trace!(
        %connection_id,
        room_id = %command.room_id(),
        outcome = outcome.as_str(),
        "ws command handled"
    );
    None
}

async fn dispatch(
    command: &WsCommand,
    connection_id: ConnectionId,
    identity: &CallerIdentity,
    room_service: &RoomService,
) -> Outcome {
    match command {
        WsCommand::Join { room_id } => room_service.join(connection_id, room_id, identity).await,
        WsCommand::Vote { room_id, vote } => room_service.vote(connection_id, room_id, vote).await,
        WsCommand::RescindVote { room_id } => {
            room_service.rescind_vote(connection_id, room_id).await
        }
        WsCommand::RevealVotes { room_id } => room_service.reveal_votes(room_id, identity).await,
        WsCommand::ResetVoting { room_id } => room_service.reset_voting(room_id, identity).await,
    }
}
