use thiserror::Error;

/// Why a move produced no grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The requested box breaks the layout rules before any search runs.
    #[error("requested box is impossible: {reason}")]
    ImpossibleBox { reason: String },

    /// Every candidate produced by the search was disqualified.
    #[error("no valid placement: every candidate layout was disqualified")]
    NoValidPlacement,
}

impl MoveError {
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::ImpossibleBox { .. } => "impossible_box",
            MoveError::NoValidPlacement => "no_valid_placement",
        }
    }
}

/// Why a new game could not be inserted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// Placement geometry failed; the reason names the blocking region.
    #[error("{0}")]
    Placement(String),
}

impl InsertError {
    pub fn code(&self) -> &'static str {
        match self {
            InsertError::Placement(_) => "placement_failed",
        }
    }
}
