//! Insert a game that is not on the grid yet

use tracing::{debug, info};

use crate::adjusters::{run_adjusters, AdjustRequest};
use crate::core::{Grid, GridGameInsert, Topology};
use crate::error::InsertError;
use crate::types::{GameId, RangeInfo};

/// Grid after a successful insert
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub grid: Grid,
    pub placement: GridGameInsert,
    /// Adjusters that rearranged the grid before placement, in run order.
    pub adjustments: Vec<&'static str>,
}

/// Place `game` on a copy of `grid`.
///
/// Non-championship games first get the grid adjusters; then the placement
/// geometry decides the box and its lines. A placement failure is returned
/// with its reason unchanged and the input grid is left as it was.
pub fn insert_game(
    grid: &Grid,
    game: GameId,
    requested_anchor: RangeInfo,
    topology: &dyn Topology,
) -> Result<InsertOutcome, InsertError> {
    let mut working = grid.clone();
    let adjustments = if topology.game(game).is_some() && !grid.contains_game(game) {
        run_adjusters(&mut working, &AdjustRequest::new(game, requested_anchor, topology))
    } else {
        Vec::new()
    };

    let placement = working.grid_game_from_constraints(game, requested_anchor, topology);
    if let Some(reason) = &placement.fail_reason {
        debug!(game = %game, reason = %reason, "insert failed");
        return Err(InsertError::Placement(reason.clone()));
    }
    for item in placement.items(game) {
        working.push(item);
    }
    info!(
        game = %game,
        range = %placement.range_game,
        adjusted = adjustments.len(),
        "game inserted"
    );
    Ok(InsertOutcome {
        grid: working,
        placement,
        adjustments,
    })
}
