//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Room endpoints are mounted under `/api/v1`; system endpoints at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "planning-poker",
        description = "Room creation, joining and lookup for the planning poker coordinator. Voting itself happens over the `/ws` WebSocket."
    ),
    paths(
        handlers::room::create_room,
        handlers::room::join_room,
        handlers::room::get_room,
        handlers::system::health_handler,
        handlers::system::points_handler,
    ),
    components(schemas(
        dto::IdentityRequest,
        dto::SessionIdentityResponse,
        dto::RoomDetailsResponse,
        crate::domain::SessionView,
        crate::domain::ParticipantView,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        handlers::system::HealthResponse,
        handlers::system::PointsResponse,
    )),
    tags(
        (name = "Rooms", description = "Room lifecycle"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_room_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/rooms"));
        assert!(doc.paths.paths.contains_key("/api/v1/rooms/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/rooms/{id}/join"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
