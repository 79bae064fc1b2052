//! Roster and seed API handlers.
//!
//! Rosters and seeds can only change until the draw is generated; afterwards
//! these endpoints answer `409 Conflict`. Contact details stay editable.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shuttle_tourney::tournament::{EventCategory, NewPlayer, Player, PlayerId, PlayerUpdate};

use super::request_id::RequestId;
use super::{ApiError, ApiResult, AppState, api_error};

/// Replacement seed list, highest priority first
#[derive(Debug, Deserialize)]
pub struct SetSeedsRequest {
    pub seeds: Vec<PlayerId>,
}

/// Register a player in an event category.
///
/// # Errors
///
/// - `400 Bad Request`: Name shorter than two characters
/// - `404 Not Found`: Unknown tournament or event
/// - `409 Conflict`: Draw already generated
pub async fn add_player(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
    Json(request): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state
        .manager
        .add_player(&tournament_id, &event_id, request)
        .await
        .map_err(|e| api_error(&request_id, e))?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// Update player details. `seed_number: 0` removes the seed.
pub async fn update_player(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id, player_id)): Path<(String, String, String)>,
    Json(update): Json<PlayerUpdate>,
) -> ApiResult<Player> {
    state
        .manager
        .update_player(&tournament_id, &event_id, &player_id, update)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

pub async fn remove_player(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id, player_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .manager
        .remove_player(&tournament_id, &event_id, &player_id)
        .await
        .map_err(|e| api_error(&request_id, e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the seed list of an event.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: A seed is not on the roster
/// - `409 Conflict`: Draw already generated
pub async fn set_seeds(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
    Json(request): Json<SetSeedsRequest>,
) -> ApiResult<EventCategory> {
    state
        .manager
        .set_seeds(&tournament_id, &event_id, request.seeds)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}
