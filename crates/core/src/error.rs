use thiserror::Error;

use crate::types::{GameId, RangeInfo};

/// Errors raised while building or editing a grid from external data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A stored item has a negative or zero extent.
    #[error("item at {range} has an empty or inverted extent")]
    EmptyRange { range: RangeInfo },

    /// The same game appears twice in the stored tuples.
    #[error("game {id} is stored more than once")]
    DuplicateGame { id: GameId },

    /// A game referenced by the caller is not in the topology table.
    #[error("game {id} is not part of the bracket topology")]
    UnknownGame { id: GameId },

    /// Game ids are 1-based; a stored or requested `0` is rejected.
    #[error("game id {value} is invalid; ids start at 1")]
    InvalidGameId { value: u32 },

    /// A change could not be applied because its item is missing.
    #[error("no item matches {item} in the grid")]
    MissingItem { item: String },
}

impl GridError {
    pub fn code(&self) -> &'static str {
        match self {
            GridError::EmptyRange { .. } => "empty_range",
            GridError::DuplicateGame { .. } => "duplicate_game",
            GridError::UnknownGame { .. } => "unknown_game",
            GridError::InvalidGameId { .. } => "invalid_game_id",
            GridError::MissingItem { .. } => "missing_item",
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

/// Parse an external game id.
pub fn parse_game_id(value: u32) -> Result<GameId> {
    GameId::try_new(value).ok_or(GridError::InvalidGameId { value })
}
