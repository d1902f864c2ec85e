//! Room DTOs for create, join and lookup operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{RoomId, SessionView};
use crate::service::RoomDetails;

/// Request body for `POST /rooms` and `POST /rooms/:id/join`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IdentityRequest {
    /// Display name; required and non-blank.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Join as an observer who does not vote.
    #[serde(default)]
    pub is_observer: bool,
}

/// Identity the client should bind to its WebSocket connection.
///
/// Returned by both create and join. The client connects to `ws_path`
/// and then sends a `join` command for `room_id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionIdentityResponse {
    /// Room to join.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Trimmed nickname.
    pub nickname: String,
    /// Observer flag.
    pub is_observer: bool,
    /// `true` only for the identity returned by room creation.
    pub is_creator: bool,
    /// WebSocket path with the identity encoded as query parameters.
    pub ws_path: String,
    /// Server timestamp.
    pub issued_at: DateTime<Utc>,
}

impl SessionIdentityResponse {
    /// Builds the response and the matching WebSocket path.
    #[must_use]
    pub fn new(room_id: RoomId, nickname: &str, is_observer: bool, is_creator: bool) -> Self {
        let ws_path = format!(
            "/ws?nickname={}&is_observer={is_observer}&is_creator={is_creator}",
            encode_query_value(nickname)
        );
        Self {
            room_id,
            nickname: nickname.to_string(),
            is_observer,
            is_creator,
            ws_path,
            issued_at: Utc::now(),
        }
    }
}

/// Response body for `GET /rooms/:id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDetailsResponse {
    /// Room identifier.
    #[schema(value_type = String)]
    pub room_id: RoomId,
    /// Nickname the room was created with.
    pub creator_nickname: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last state change.
    pub last_activity_at: DateTime<Utc>,
    /// Number of connected participants.
    pub participant_count: usize,
    /// Card values offered to voters.
    pub points: Vec<String>,
    /// Current session view.
    pub state: SessionView,
}

impl From<RoomDetails> for RoomDetailsResponse {
    fn from(details: RoomDetails) -> Self {
        Self {
            room_id: details.room_id,
            creator_nickname: details.creator_nickname,
            created_at: details.created_at,
            last_activity_at: details.last_activity_at,
            participant_count: details.participant_count,
            points: crate::domain::VOTE_POINTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            state: details.state,
        }
    }
}

/// Percent-encodes a query value (RFC 3986 unreserved characters pass).
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
