//! Tournament and event category API handlers.
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Club Open", "start_date": "2024-09-15", "end_date": "2024-09-16",
//!        "organizer_name": "Badminton Club XYZ"}'
//! ```
//!
//! Add an event category:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments/TID/events \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Men'\''s Singles", "event_type": "Singles", "gender": "Men"}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shuttle_tourney::tournament::{
    EventCategory, EventCategoryUpdate, NewEventCategory, NewTournament, Tournament,
    TournamentUpdate,
};

use super::request_id::RequestId;
use super::{ApiError, ApiResult, AppState, api_error};

/// List all tournaments in creation order, event categories included.
pub async fn list_tournaments(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ApiResult<Vec<Tournament>> {
    state
        .manager
        .list_tournaments()
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// Create a draft tournament.
///
/// # Errors
///
/// - `400 Bad Request`: Blank name or organizer, or end date before start date
pub async fn create_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<NewTournament>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = state
        .manager
        .create_tournament(request)
        .await
        .map_err(|e| api_error(&request_id, e))?;

    tracing::info!(
        request_id = %request_id.as_str(),
        tournament_id = %tournament.id,
        "Tournament created"
    );
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(tournament_id): Path<String>,
) -> ApiResult<Tournament> {
    state
        .manager
        .get_tournament(&tournament_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// Published, in-progress and completed tournaments.
pub async fn list_public_tournaments(
    State(state): State<AppState>,
    request_id: RequestId,
) -> ApiResult<Vec<Tournament>> {
    state
        .manager
        .list_public_tournaments()
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// One tournament as players see it.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament, or a draft or canceled one
pub async fn get_public_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(tournament_id): Path<String>,
) -> ApiResult<Tournament> {
    state
        .manager
        .get_public_tournament(&tournament_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// Update header fields. Absent fields are left unchanged.
pub async fn update_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(tournament_id): Path<String>,
    Json(update): Json<TournamentUpdate>,
) -> ApiResult<Tournament> {
    state
        .manager
        .update_tournament(&tournament_id, update)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// Delete a tournament with all its events.
pub async fn delete_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(tournament_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .manager
        .delete_tournament(&tournament_id)
        .await
        .map_err(|e| api_error(&request_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_event(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(tournament_id): Path<String>,
    Json(request): Json<NewEventCategory>,
) -> Result<(StatusCode, Json<EventCategory>), ApiError> {
    let event = state
        .manager
        .add_event_category(&tournament_id, request)
        .await
        .map_err(|e| api_error(&request_id, e))?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event category with its roster, seeds and matches.
pub async fn get_event(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
) -> ApiResult<EventCategory> {
    state
        .manager
        .get_event_category(&tournament_id, &event_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

pub async fn update_event(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
    Json(update): Json<EventCategoryUpdate>,
) -> ApiResult<EventCategory> {
    state
        .manager
        .update_event_category(&tournament_id, &event_id, update)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

pub async fn delete_event(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .manager
        .delete_event_category(&tournament_id, &event_id)
        .await
        .map_err(|e| api_error(&request_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}
