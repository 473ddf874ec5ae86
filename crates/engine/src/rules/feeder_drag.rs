//! Drag connected games along when a connection point moves
//!
//! A move that shifts the outgoing point drags the game it feeds; a move
//! that shifts an incoming point drags the game feeding it. Connector lines
//! in between are shifted in place. The connected game gets one option per
//! way of following the point, and the ranker picks among them later.

use tracing::debug;

use super::{fork_alternatives, moved_index, MovedGame, PropagationRule};
use crate::core::GridItem;
use crate::mover::Search;
use crate::option::OptionId;
use crate::types::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeederDrag {
    Outgoing,
    /// Incoming point on the given visual side.
    Incoming(Slot),
}

impl PropagationRule for FeederDrag {
    fn name(&self) -> &'static str {
        match self {
            FeederDrag::Outgoing => "feeder_drag_outgoing",
            FeederDrag::Incoming(Slot::Top) => "feeder_drag_top_incoming",
            FeederDrag::Incoming(Slot::Bottom) => "feeder_drag_bottom_incoming",
        }
    }

    fn apply(&self, search: &mut Search<'_>, branch: OptionId, moved: &MovedGame) -> Vec<OptionId> {
        let Some(idx) = moved_index(search, branch, moved, self.name()) else {
            return Vec::new();
        };
        match *self {
            FeederDrag::Outgoing => drag_outgoing(search, branch, idx, &moved.old),
            FeederDrag::Incoming(side) => drag_incoming(search, branch, idx, &moved.old, side),
        }
    }
}

fn drag_outgoing(
    search: &mut Search<'_>,
    branch: OptionId,
    idx: usize,
    old: &GridItem,
) -> Vec<OptionId> {
    let grid = search.grid(branch);
    let old_point = old.outgoing_feeder_point();
    let new_point = grid.item(idx).outgoing_feeder_point();
    let d_rows = new_point.row_start - old_point.row_start;
    if d_rows == 0 || new_point.col_start != old_point.col_start {
        return vec![branch];
    }
    if grid.game_at_incoming(&new_point).is_some() || grid.line_starting_at(&new_point).is_some() {
        return vec![branch];
    }

    let line = grid.line_starting_at(&old_point);
    let connected = match line {
        Some(line) => grid.item(line).line_end_point(),
        None => old_point,
    };
    if let Some(line) = line {
        shift_line(search, branch, line, d_rows);
    }

    let grid = search.grid(branch);
    let target = grid.game_at_incoming(&connected).filter(|(t, _)| *t != idx);
    let Some((target_idx, side)) = target else {
        return vec![branch];
    };
    let target = grid.item(target_idx).clone();
    let stretched = match side {
        Slot::Top => target.grown(d_rows, 0),
        Slot::Bottom => target.grown(0, d_rows),
    };
    debug!(option = %branch, target = %target, d_rows, "dragging fed game");
    fork_alternatives(
        search,
        branch,
        &target,
        vec![
            ("shift fed game", target.shifted(d_rows, 0)),
            ("stretch fed game", stretched),
        ],
    )
}

fn drag_incoming(
    search: &mut Search<'_>,
    branch: OptionId,
    idx: usize,
    old: &GridItem,
    side: Slot,
) -> Vec<OptionId> {
    let grid = search.grid(branch);
    let current = grid.item(idx);
    let old_point = old.incoming_point(side);
    let new_point = current.incoming_point(side);
    let d_rows = new_point.row_start - old_point.row_start;
    if d_rows == 0 || new_point.col_start != old_point.col_start {
        return vec![branch];
    }
    if Slot::BOTH.into_iter().any(|s| current.incoming_point(s) == old_point) {
        return vec![branch];
    }

    let line = grid.line_ending_at(&old_point);
    let source_point = match line {
        Some(line) => grid.item(line).range().top_left(),
        None => old_point,
    };
    if let Some(line) = line {
        shift_line(search, branch, line, d_rows);
    }

    let grid = search.grid(branch);
    let Some(source_idx) = grid.game_with_outgoing(&source_point).filter(|s| *s != idx) else {
        return vec![branch];
    };
    let source = grid.item(source_idx).clone();
    debug!(
        option = %branch,
        source = %source,
        d_rows,
        side = side.as_str(),
        "dragging feeding game"
    );
    fork_alternatives(
        search,
        branch,
        &source,
        vec![
            ("shift feeding game", source.shifted(d_rows, 0)),
            ("stretch feeding game down", source.grown(0, 2 * d_rows)),
            ("stretch feeding game up", source.grown(2 * d_rows, 0)),
        ],
    )
}

fn shift_line(search: &mut Search<'_>, branch: OptionId, line: usize, d_rows: i32) {
    let item = search.grid(branch).item(line).clone();
    search.grid_mut(branch).update_at(line, |l| l.shift(d_rows, 0));
    search.crumb(branch, format!("dragged {item} by {d_rows} rows"));
}
