//! Room handlers: create, join, and look up.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{IdentityRequest, RoomDetailsResponse, SessionIdentityResponse};
use crate::app_state::AppState;
use crate::domain::{CallerIdentity, RoomId};
use crate::error::{ErrorResponse, PokerError};

/// `POST /rooms`: Create a new room.
///
/// # Errors
///
/// Returns [`PokerError::NicknameRequired`] if no nickname was supplied.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "Create a room",
    description = "Creates an empty room owned by the given nickname and returns the creator identity to bind to the WebSocket connection.",
    request_body = IdentityRequest,
    responses(
        (status = 201, description = "Room created", body = SessionIdentityResponse),
        (status = 400, description = "Nickname missing", body = ErrorResponse),
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<IdentityRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let identity = require_identity(req, true)?;
    let room_id = state.room_service.create_room(&identity.nickname).await?;

    let response = SessionIdentityResponse::new(
        room_id,
        &identity.nickname,
        identity.is_observer,
        identity.is_creator,
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /rooms/{id}/join`: Obtain a participant identity for a room.
///
/// # Errors
///
/// Returns [`PokerError::RoomNotFound`] for unknown rooms and
/// [`PokerError::NicknameRequired`] if no nickname was supplied.
#[utoipa::path(
    post,
    path = "/api/v1/rooms/{id}/join",
    tag = "Rooms",
    summary = "Join a room",
    description = "Validates the nickname and returns a non-creator identity to bind to the WebSocket connection.",
    params(
        ("id" = String, Path, description = "Room token"),
    ),
    request_body = IdentityRequest,
    responses(
        (status = 200, description = "Identity issued", body = SessionIdentityResponse),
        (status = 400, description = "Nickname missing", body = ErrorResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn join_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<IdentityRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let room_id = RoomId::from(id);
    state.room_service.ensure_room(&room_id).await?;
    let identity = require_identity(req, false)?;

    Ok(Json(SessionIdentityResponse::new(
        room_id,
        &identity.nickname,
        identity.is_observer,
        identity.is_creator,
    )))
}

/// `GET /rooms/{id}`: Get room details.
///
/// # Errors
///
/// Returns [`PokerError::RoomNotFound`] if the room does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    summary = "Get room details",
    description = "Returns the room metadata, the vote vocabulary and the current session view.",
    params(
        ("id" = String, Path, description = "Room token"),
    ),
    responses(
        (status = 200, description = "Room details", body = RoomDetailsResponse),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PokerError> {
    let details = state.room_service.room_details(&RoomId::from(id)).await?;
    Ok(Json(RoomDetailsResponse::from(details)))
}

/// Room routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/join", post(join_room))
}

fn require_identity(req: IdentityRequest, is_creator: bool) -> Result<CallerIdentity, PokerError> {
    let identity = CallerIdentity::new(
        req.nickname.as_deref().unwrap_or_default(),
        req.is_observer,
        is_creator,
    );
    if identity.has_blank_nickname() {
        return Err(PokerError::NicknameRequired);
    }
    Ok(identity)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::app_state::AppState;

    fn app() -> axum::Router {
        crate::router(AppState::new(64, false))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        let Ok(req) = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("invalid request");
        };
        req
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let Ok(bytes) = to_bytes(response.into_body(), 64 * 1024).await else {
            panic!("unreadable body");
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    #[tokio::test]
    async fn create_room_returns_creator_identity() {
        let Ok(response) = app()
            .oneshot(json_request("POST", "/api/v1/rooms", r#"{"nickname":"Alice"}"#))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json.get("nickname").and_then(Value::as_str), Some("Alice"));
        assert_eq!(json.get("is_creator").and_then(Value::as_bool), Some(true));
        let room_id = json.get("room_id").and_then(Value::as_str).unwrap_or_default();
        assert_eq!(room_id.len(), 8);
    }

    #[tokio::test]
    async fn create_room_without_nickname_is_rejected() {
        let Ok(response) = app()
            .oneshot(json_request("POST", "/api/v1/rooms", r#"{"nickname":""}"#))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        let code = json
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(Value::as_u64);
        assert_eq!(code, Some(1002));
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let router = app();
        let Ok(response) = router
            .clone()
            .oneshot(json_request("GET", "/api/v1/rooms/invalid-id", ""))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);

        let Ok(response) = router
            .oneshot(json_request(
                "POST",
                "/api/v1/rooms/invalid-id/join",
                r#"{"nickname":"Bob"}"#,
            ))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn join_and_lookup_existing_room() {
        let state = AppState::new(64, false);
        let Ok(room_id) = state.room_service.create_room("Alice").await else {
            panic!("room creation failed");
        };
        let router = crate::router(state);

        let Ok(response) = router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/rooms/{room_id}/join"),
                r#"{"nickname":"Bob","is_observer":true}"#,
            ))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.get("is_creator").and_then(Value::as_bool), Some(false));
        assert_eq!(json.get("is_observer").and_then(Value::as_bool), Some(true));

        let Ok(response) = router
            .oneshot(json_request("GET", &format!("/api/v1/rooms/{room_id}"), ""))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json.get("creator_nickname").and_then(Value::as_str),
            Some("Alice")
        );
        assert_eq!(
            json.get("points").and_then(Value::as_array).map(Vec::len),
            Some(9)
        );
        assert_eq!(
            json.get("state")
                .and_then(|s| s.get("revealed"))
                .and_then(Value::as_bool),
            Some(false)
        );
    }
}
