//! Clear collisions around a moved game

use tracing::debug;

use super::{moved_index, MovedGame, PropagationRule};
use crate::core::{Grid, GridItem, Topology};
use crate::mover::Search;
use crate::option::OptionId;
use crate::types::{GameId, GAME_COLUMN_STRIDE};

/// Games that cannot move are passed over and the next victim is tried.
/// A feeder whose moved target no longer reaches it is pushed by the shift
/// that reattaches it, when that shift clears the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAway {
    /// Items within the buffer zone of the moved box, in its own columns.
    SameColumn,
    /// Games one stride left or right whose feeds cross the moved box.
    AdjacentColumn,
}

impl PropagationRule for PushAway {
    fn name(&self) -> &'static str {
        match self {
            PushAway::SameColumn => "push_away",
            PushAway::AdjacentColumn => "push_away_adjacent_column",
        }
    }

    fn apply(&self, search: &mut Search<'_>, branch: OptionId, moved: &MovedGame) -> Vec<OptionId> {
        let buffer = search.config().push_buffer_rows;
        let topology = search.topology();
        let mut settled = Vec::new();
        // Each pending option carries the games it has given up pushing.
        let mut pending: Vec<(OptionId, Vec<GameId>)> = vec![(branch, Vec::new())];

        while let Some((option, skipped)) = pending.pop() {
            if search.is_disqualified(option) {
                continue;
            }
            let Some(idx) = moved_index(search, option, moved, self.name()) else {
                continue;
            };
            let grid = search.grid(option);
            let push = match self {
                PushAway::SameColumn => same_column_push(grid, idx, buffer, &skipped),
                PushAway::AdjacentColumn => {
                    adjacent_column_push(grid, idx, buffer, topology, &skipped)
                }
            };
            let Some((victim, d_rows)) = push else {
                settled.push(option);
                continue;
            };

            let item = grid.item(victim).clone();
            let Some(id) = item.game_id() else {
                debug!(option = %option, item = %item, d_rows, rule = self.name(), "pushing line");
                search.grid_mut(option).update_at(victim, |line| line.shift(d_rows, 0));
                search.crumb(option, format!("pushed {item} by {d_rows} rows"));
                pending.push((option, skipped));
                continue;
            };

            if search.has_moved(option, id) || search.budget_exhausted() {
                if search.budget_exhausted() {
                    search.note_budget_exhausted();
                }
                debug!(option = %option, item = %item, "cannot push game, trying the next one");
                pending.push((option, with_skipped(&skipped, id)));
                continue;
            }
            let d_rows = match reconnecting_shift(search, option, victim) {
                Some(shift) if clears_as_far(shift, d_rows) => shift,
                _ => d_rows,
            };
            debug!(option = %option, item = %item, d_rows, rule = self.name(), "pushing game");
            for next in search.move_in_branch(option, item.clone(), item.shifted(d_rows, 0)) {
                if search.grid(next).find_box(&item).is_some() {
                    pending.push((next, with_skipped(&skipped, id)));
                } else {
                    pending.push((next, skipped.clone()));
                }
            }
        }
        settled
    }
}

fn with_skipped(skipped: &[GameId], id: GameId) -> Vec<GameId> {
    let mut skipped = skipped.to_vec();
    skipped.push(id);
    skipped
}

/// Shift that reattaches game `victim` to a target moved in this lineage.
///
/// Only for a feed drawn without connector lines. A pushed game is never
/// moved again, so this is its one chance to follow the target's slot.
fn reconnecting_shift(search: &Search<'_>, option: OptionId, victim: usize) -> Option<i32> {
    let topology = search.topology();
    let grid = search.grid(option);
    let item = grid.item(victim);
    let id = item.game_id()?;
    let target = topology.winner_target(id)?;
    if !search.has_moved(option, target) {
        return None;
    }
    let slot = topology.game(target)?.slot_fed_by(id)?;
    let target_item = grid.item_for_game(target)?;
    let wanted = target_item.incoming_point(target_item.side_of(slot));
    let feed = grid.feeder_end_point(victim);
    if feed != item.outgoing_feeder_point() || feed.col_start != wanted.col_start {
        return None;
    }
    Some(wanted.row_start - feed.row_start).filter(|shift| *shift != 0)
}

/// `shift` goes the same way as `push` and at least as far.
fn clears_as_far(shift: i32, push: i32) -> bool {
    shift.signum() == push.signum() && shift.abs() >= push.abs()
}

fn is_skipped(item: &GridItem, skipped: &[GameId]) -> bool {
    item.game_id().map_or(false, |id| skipped.contains(&id))
}

/// First item inside the buffer zone of game `idx`, with the push that clears it.
fn same_column_push(
    grid: &Grid,
    idx: usize,
    buffer: i32,
    skipped: &[GameId],
) -> Option<(usize, i32)> {
    let anchor = grid.item(idx).range();
    let zone = anchor.grow_rows(-buffer, buffer);
    let victim = (0..grid.len()).find(|&i| {
        let item = grid.item(i);
        i != idx && !is_skipped(item, skipped) && item.range().intersects(&zone)
    })?;
    let r = grid.item(victim).range();
    let d_rows = if r.row_start >= anchor.row_start {
        anchor.row_end() + buffer + 1 - r.row_start
    } else {
        anchor.row_start - buffer - 1 - r.row_end()
    };
    Some((victim, d_rows))
}

/// First neighbouring game whose feed crosses game `idx`, or whose box the
/// feed of `idx` runs into.
fn adjacent_column_push(
    grid: &Grid,
    idx: usize,
    buffer: i32,
    topology: &dyn Topology,
    skipped: &[GameId],
) -> Option<(usize, i32)> {
    let moved = grid.item(idx);
    let anchor = moved.range();
    let id = moved.game_id()?;
    let entry = topology.game(id);
    let target = topology.winner_target(id);
    let out_row = moved.outgoing_feeder_point().row_start;

    grid.items().iter().enumerate().find_map(|(i, item)| {
        let other = item.game_id()?;
        if i == idx || skipped.contains(&other) {
            return None;
        }
        let r = item.range();
        if r.col_start == anchor.col_start - GAME_COLUMN_STRIDE {
            let is_source = entry.map_or(false, |e| e.slot_fed_by(other).is_some());
            let row = item.outgoing_feeder_point().row_start;
            if is_source || row <= anchor.row_start || row >= anchor.row_end() {
                return None;
            }
            let up = anchor.row_start - buffer - row;
            let down = anchor.row_end() + buffer - row;
            return Some((i, nearer(up, down)));
        }
        if r.col_start == anchor.col_start + GAME_COLUMN_STRIDE {
            if Some(other) == target || out_row <= r.row_start || out_row >= r.row_end() {
                return None;
            }
            let up = out_row - buffer - r.row_end();
            let down = out_row + buffer - r.row_start;
            return Some((i, nearer(up, down)));
        }
        None
    })
}

fn nearer(up: i32, down: i32) -> i32 {
    if up.abs() < down.abs() {
        up
    } else {
        down
    }
}
