//! Tournament error types.

use std::time::Duration;
use thiserror::Error;

use super::models::{EventId, MatchId, PlayerId, TournamentId};
use crate::draw::DrawError;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Event category not found: {0}")]
    EventNotFound(EventId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Fewer than two entrants registered for a draw
    #[error("Not enough entrants: need at least {needed}, have {current}")]
    InsufficientEntrants { needed: usize, current: usize },

    /// Draw exists and regeneration was not requested
    #[error("Draw already generated for event {0}")]
    AlreadyGenerated(EventId),

    /// Roster or seed change after the draw was generated
    #[error("Roster is locked: draw already generated for event {0}")]
    RosterLocked(EventId),

    #[error("Seed references a player not in the roster: {0}")]
    InvalidSeedReference(PlayerId),

    #[error("Winner {0} is not an entrant of this match")]
    InvalidWinner(PlayerId),

    #[error("Match {0} is a bye and cannot be changed")]
    ByeMatch(MatchId),

    #[error("Selected winner does not match the entered score")]
    ScoreMismatch,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DrawError> for TournamentError {
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::InsufficientEntrants { needed, current } => {
                TournamentError::InsufficientEntrants { needed, current }
            }
            other => TournamentError::InvalidInput(other.to_string()),
        }
    }
}

impl TournamentError {
    /// Get a client-safe error message that doesn't leak storage internals
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Database(_) | TournamentError::Timeout(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_error_conversion() {
        let err: TournamentError = DrawError::InsufficientEntrants {
            needed: 2,
            current: 1,
        }
        .into();
        assert!(matches!(
            err,
            TournamentError::InsufficientEntrants {
                needed: 2,
                current: 1
            }
        ));

        let err: TournamentError = DrawError::DuplicateEntrant("p1".to_string()).into();
        assert!(matches!(err, TournamentError::InvalidInput(_)));
    }

    #[test]
    fn test_client_message_hides_database_errors() {
        let err = TournamentError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = TournamentError::AlreadyGenerated("ms-demo".to_string());
        assert_eq!(err.client_message(), "Draw already generated for event ms-demo");
    }
}
