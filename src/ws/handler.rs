//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::CallerIdentity;
use crate::error::PokerError;

/// Identity a client binds to its socket when upgrading.
#[derive(Debug, Deserialize)]
pub struct WsConnectParams {
    /// Display name; required and non-blank.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Join as an observer.
    #[serde(default)]
    pub is_observer: bool,
    /// Claim creator rights (checked against the room's creator nickname).
    #[serde(default)]
    pub is_creator: bool,
}

impl WsConnectParams {
    /// Converts the query into a [`CallerIdentity`].
    ///
    /// # Errors
    ///
    /// Returns [`PokerError::NicknameRequired`] if the nickname is missing
    /// or blank.
    pub fn into_identity(self) -> Result<CallerIdentity, PokerError> {
        let identity = CallerIdentity::new(
            self.nickname.as_deref().unwrap_or_default(),
            self.is_observer,
            self.is_creator,
        );
        if identity.has_blank_nickname() {
            return Err(PokerError::NicknameRequired);
        }
        Ok(identity)
    }
}

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// # Errors
///
/// Returns [`PokerError::NicknameRequired`] before upgrading if no
/// nickname was supplied.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsConnectParams>,
) -> Result<impl IntoResponse, PokerError> {
    let identity = params.into_identity()?;
    let event_rx = state.event_bus.subscribe();
    tracing::debug!(
        nickname = %identity.nickname,
        connections = state.event_bus.receiver_count(),
        "ws upgrade accepted"
    );
    let room_service = std::sync::Arc::clone(&state.room_service);

    Ok(ws.on_upgrade(move |socket| run_connection(socket, event_rx, room_service, identity)))
}
