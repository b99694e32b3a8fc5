// Error type shared by the draft engine and the valuation layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("roster for team `{team}` is full ({capacity} players)")]
    RosterFull { team: String, capacity: usize },

    #[error("player `{player}` has no points entry for {year}")]
    MissingYear { player: String, year: u16 },

    #[error("validation error for `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("the draft is complete: all {total_picks} picks have been made")]
    DraftComplete { total_picks: usize },

    #[error("no position weight left to normalize at pick {pick_number}")]
    Normalization { pick_number: usize },
}

impl DraftError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DraftError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
