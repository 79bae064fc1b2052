//! Draw generation error types.

use thiserror::Error;

use crate::tournament::models::PlayerId;

/// Draw generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Fewer than two real entrants
    #[error("Not enough entrants: need at least {needed}, have {current}")]
    InsufficientEntrants { needed: usize, current: usize },

    /// The same player ID appears twice in the roster
    #[error("Entrant {0} appears more than once in the roster")]
    DuplicateEntrant(PlayerId),

    /// A roster ID collides with the bye placeholder prefix
    #[error("Entrant ID {0} is reserved for byes")]
    ReservedEntrantId(PlayerId),
}

/// Result type for draw generation
pub type DrawResult<T> = Result<T, DrawError>;
