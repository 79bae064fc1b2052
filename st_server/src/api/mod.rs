//! HTTP API for the tournament server.
//!
//! # Modules
//!
//! - [`tournaments`]: Tournament and event category CRUD
//! - [`players`]: Roster and seed management
//! - [`draws`]: Draw generation, match listing, scheduling and results
//! - [`request_id`]: Request correlation middleware
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health
//! GET    /api/v1/tournaments
//! POST   /api/v1/tournaments
//! GET    /api/v1/tournaments/{tournament_id}
//! PATCH  /api/v1/tournaments/{tournament_id}
//! DELETE /api/v1/tournaments/{tournament_id}
//! GET    /api/v1/public/tournaments
//! GET    /api/v1/public/tournaments/{tournament_id}
//! POST   /api/v1/tournaments/{tournament_id}/events
//! GET    /api/v1/tournaments/{tournament_id}/events/{event_id}
//! PATCH  /api/v1/tournaments/{tournament_id}/events/{event_id}
//! DELETE /api/v1/tournaments/{tournament_id}/events/{event_id}
//! POST   /api/v1/tournaments/{tournament_id}/events/{event_id}/players
//! PATCH  /api/v1/tournaments/{tournament_id}/events/{event_id}/players/{player_id}
//! DELETE /api/v1/tournaments/{tournament_id}/events/{event_id}/players/{player_id}
//! PUT    /api/v1/tournaments/{tournament_id}/events/{event_id}/seeds
//! POST   /api/v1/tournaments/{tournament_id}/events/{event_id}/draw?regenerate=true
//! GET    /api/v1/tournaments/{tournament_id}/events/{event_id}/matches
//! PUT    /api/v1/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/schedule
//! PUT    /api/v1/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/status
//! PUT    /api/v1/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/score
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod draws;
pub mod players;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post, put},
};
use serde::Serialize;
use serde_json::json;
use shuttle_tourney::{TournamentError, TournamentManager};
use tower_http::cors::CorsLayer;

use crate::logging;
use request_id::RequestId;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the manager shares its repository and generator.
#[derive(Clone)]
pub struct AppState {
    pub manager: TournamentManager,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rejection produced by the handlers
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Handler result with a JSON body
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// HTTP status for a tournament error
pub fn status_for(err: &TournamentError) -> StatusCode {
    match err {
        TournamentError::TournamentNotFound(_)
        | TournamentError::EventNotFound(_)
        | TournamentError::PlayerNotFound(_)
        | TournamentError::MatchNotFound(_) => StatusCode::NOT_FOUND,
        TournamentError::AlreadyGenerated(_) | TournamentError::RosterLocked(_) => {
            StatusCode::CONFLICT
        }
        TournamentError::InsufficientEntrants { .. }
        | TournamentError::InvalidSeedReference(_)
        | TournamentError::InvalidWinner(_)
        | TournamentError::ByeMatch(_)
        | TournamentError::ScoreMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        TournamentError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TournamentError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        TournamentError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a tournament error into a sanitized response and log it
pub fn api_error(request_id: &RequestId, err: TournamentError) -> ApiError {
    let status = status_for(&err);
    logging::log_api_error(request_id.as_str(), status.as_u16(), &err.to_string());

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// use shuttle_tourney::{TournamentManager, db::InMemoryTournamentRepository};
/// use st_server::api::{AppState, create_router};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = TournamentManager::new(Arc::new(InMemoryTournamentRepository::new()));
/// let app = create_router(AppState { manager });
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:6969").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API v1 routes
fn create_v1_router() -> Router<AppState> {
    let tournaments = Router::new()
        .route(
            "/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route(
            "/tournaments/{tournament_id}",
            get(tournaments::get_tournament)
                .patch(tournaments::update_tournament)
                .delete(tournaments::delete_tournament),
        )
        .route("/public/tournaments", get(tournaments::list_public_tournaments))
        .route(
            "/public/tournaments/{tournament_id}",
            get(tournaments::get_public_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/events",
            post(tournaments::create_event),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}",
            get(tournaments::get_event)
                .patch(tournaments::update_event)
                .delete(tournaments::delete_event),
        );

    let roster = Router::new()
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/players",
            post(players::add_player),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/players/{player_id}",
            patch(players::update_player).delete(players::remove_player),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/seeds",
            put(players::set_seeds),
        );

    let draw = Router::new()
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/draw",
            post(draws::generate_draw),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/matches",
            get(draws::list_matches),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/schedule",
            put(draws::schedule_match),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/status",
            put(draws::update_match_status),
        )
        .route(
            "/tournaments/{tournament_id}/events/{event_id}/matches/{match_id}/score",
            put(draws::set_match_score),
        );

    Router::new().merge(tournaments).merge(roster).merge(draw)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when storage is reachable, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"0.4.0","storage":true,"timestamp":"2024-09-15T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage_healthy = match state.manager.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            false
        }
    };

    let status_code = if storage_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if storage_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TournamentError::EventNotFound("e1".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&TournamentError::AlreadyGenerated("e1".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&TournamentError::InsufficientEntrants {
                needed: 2,
                current: 1
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&TournamentError::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_api_error_hides_internals() {
        let request_id = RequestId("req-1".to_string());
        let err = TournamentError::Timeout(std::time::Duration::from_secs(5));
        let (status, Json(body)) = api_error(&request_id, err);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "Internal server error");
    }
}
