//! Keep feeds attached by swapping slots instead of moving boxes

use tracing::debug;

use super::{moved_index, MovedGame, PropagationRule};
use crate::core::{Grid, GridItem, Topology};
use crate::mover::Search;
use crate::option::OptionId;
use crate::types::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBottomSwapper {
    /// Swap the moved game when a feeder now meets its opposite side.
    Sources,
    /// Swap the downstream game when the moved game's feed now meets its opposite side.
    Target,
}

impl PropagationRule for TopBottomSwapper {
    fn name(&self) -> &'static str {
        match self {
            TopBottomSwapper::Sources => "check_and_swap_top_bottom",
            TopBottomSwapper::Target => "check_outgoing_feed_swap_target",
        }
    }

    fn apply(&self, search: &mut Search<'_>, branch: OptionId, moved: &MovedGame) -> Vec<OptionId> {
        let Some(idx) = moved_index(search, branch, moved, self.name()) else {
            return Vec::new();
        };
        let topology = search.topology();
        let swap_at = match self {
            TopBottomSwapper::Sources => {
                source_swap_slot(search.grid(branch), idx, &moved.old, topology)
                    .map(|slot| (idx, slot))
            }
            TopBottomSwapper::Target => target_swap(search.grid(branch), idx, &moved.old, topology),
        };
        if let Some((target, slot)) = swap_at {
            let item = search.grid(branch).item(target).clone();
            debug!(option = %branch, item = %item, slot = slot.as_str(), "swapping top and bottom");
            search
                .grid_mut(branch)
                .update_at(target, GridItem::toggle_swap_top_bottom);
            let side = slot.as_str();
            let note = format!("swapped top and bottom of {item} to keep its {side} feed");
            search.crumb(branch, note);
        }
        vec![branch]
    }
}

/// Slot of the moved game whose feeder now meets the opposite side.
fn source_swap_slot(
    grid: &Grid,
    idx: usize,
    old: &GridItem,
    topology: &dyn Topology,
) -> Option<Slot> {
    let current = grid.item(idx);
    let id = current.game_id()?;
    Slot::BOTH.into_iter().find(|&slot| {
        let Some(point) = grid.source_point(id, slot, topology) else {
            return false;
        };
        let side = current.side_of(slot);
        old.incoming_point(old.side_of(slot)) == point
            && current.incoming_point(side) != point
            && current.incoming_point(side.opposite()) == point
            && grid.is_source_connected(idx, slot.opposite(), topology) != Some(true)
    })
}

/// Downstream game (and its slot) whose feed from the moved game flipped sides.
fn target_swap(
    grid: &Grid,
    idx: usize,
    old: &GridItem,
    topology: &dyn Topology,
) -> Option<(usize, Slot)> {
    let id = grid.item(idx).game_id()?;
    let target = topology.winner_target(id)?;
    let slot = topology.game(target)?.slot_fed_by(id)?;
    let target_idx = grid.index_of_game(target)?;

    let old_end = grid.follow_lines(old.outgoing_feeder_point());
    let new_end = grid.feeder_end_point(idx);
    if old_end == new_end {
        return None;
    }
    let item = grid.item(target_idx);
    let side = item.side_of(slot);
    let flipped = item.incoming_point(side) == old_end
        && item.incoming_point(side.opposite()) == new_end
        && grid.is_source_connected(target_idx, slot.opposite(), topology) != Some(true);
    flipped.then_some((target_idx, slot))
}
