//! Draw and match API handlers.
//!
//! # Examples
//!
//! Generate (or regenerate) the first round:
//! ```bash
//! curl -X POST "http://localhost:6969/api/v1/tournaments/TID/events/EID/draw?regenerate=true"
//! ```
//!
//! Record a result:
//! ```bash
//! curl -X PUT http://localhost:6969/api/v1/tournaments/TID/events/EID/matches/MID/score \
//!   -H "Content-Type: application/json" \
//!   -d '{"score": {"set1_player1": 21, "set1_player2": 15,
//!                  "set2_player1": 21, "set2_player2": 18}, "winner_id": "PID"}'
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shuttle_tourney::{
    KnockoutDraw, TournamentError,
    tournament::{DrawRequest, Match, MatchSchedule, MatchStatus, PlayerId, Score},
};

use super::request_id::RequestId;
use super::{ApiResult, AppState, api_error};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: MatchStatus,
}

/// Match result. An omitted score records a walkover.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub score: Score,
    pub winner_id: PlayerId,
}

/// Metric label for a failed draw attempt
fn rejection_reason(err: &TournamentError) -> &'static str {
    match err {
        TournamentError::AlreadyGenerated(_) => "already_generated",
        TournamentError::InsufficientEntrants { .. } => "insufficient_entrants",
        TournamentError::TournamentNotFound(_) | TournamentError::EventNotFound(_) => "not_found",
        _ => "error",
    }
}

/// Generate the first-round knockout draw of an event.
///
/// # Errors
///
/// - `409 Conflict`: A draw exists and `regenerate` was not requested
/// - `422 Unprocessable Entity`: Fewer than two players registered
pub async fn generate_draw(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
    Query(request): Query<DrawRequest>,
) -> ApiResult<KnockoutDraw> {
    match state
        .manager
        .generate_draw(&tournament_id, &event_id, request)
        .await
    {
        Ok(draw) => {
            metrics::draw_generated(request.regenerate, draw.byes);
            tracing::info!(
                request_id = %request_id.as_str(),
                event_id = %event_id,
                bracket_size = draw.bracket_size,
                byes = draw.byes,
                "Draw generated"
            );
            Ok(Json(draw))
        }
        Err(e) => {
            metrics::draw_rejected(rejection_reason(&e));
            Err(api_error(&request_id, e))
        }
    }
}

/// List matches ordered by round and match number.
pub async fn list_matches(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id)): Path<(String, String)>,
) -> ApiResult<Vec<Match>> {
    state
        .manager
        .list_matches(&tournament_id, &event_id)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

pub async fn schedule_match(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id, match_id)): Path<(String, String, String)>,
    Json(schedule): Json<MatchSchedule>,
) -> ApiResult<Match> {
    state
        .manager
        .schedule_match(&tournament_id, &event_id, &match_id, schedule)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

pub async fn update_match_status(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id, match_id)): Path<(String, String, String)>,
    Json(request): Json<StatusRequest>,
) -> ApiResult<Match> {
    state
        .manager
        .update_match_status(&tournament_id, &event_id, &match_id, request.status)
        .await
        .map(Json)
        .map_err(|e| api_error(&request_id, e))
}

/// Record a match result and mark the match completed.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Winner is not an entrant, disagrees with the
///   score, or the match is a bye
pub async fn set_match_score(
    State(state): State<AppState>,
    request_id: RequestId,
    Path((tournament_id, event_id, match_id)): Path<(String, String, String)>,
    Json(request): Json<ScoreRequest>,
) -> ApiResult<Match> {
    let updated = state
        .manager
        .set_match_score(
            &tournament_id,
            &event_id,
            &match_id,
            request.score,
            request.winner_id,
        )
        .await
        .map_err(|e| api_error(&request_id, e))?;

    metrics::match_results_total();
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_reason_labels() {
        assert_eq!(
            rejection_reason(&TournamentError::AlreadyGenerated("e1".to_string())),
            "already_generated"
        );
        assert_eq!(
            rejection_reason(&TournamentError::InsufficientEntrants {
                needed: 2,
                current: 0
            }),
            "insufficient_entrants"
        );
        assert_eq!(
            rejection_reason(&TournamentError::EventNotFound("e1".to_string())),
            "not_found"
        );
        assert_eq!(rejection_reason(&TournamentError::ScoreMismatch), "error");
    }
}
