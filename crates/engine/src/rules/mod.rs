//! Propagation rules run after every move
//!
//! The pipeline order matters: top/bottom swaps are tried before anything
//! is pushed or dragged, collisions are cleared before feeders are dragged,
//! and the downstream swap check runs last.
//!
//! | # | Rule | Effect |
//! |---|------|--------|
//! | 1 | `TopBottomSwapper::Sources` | swap slots so a feeder stays attached |
//! | 2 | `PushAway::SameColumn` | push items out of the moved box's buffer zone |
//! | 3 | `PushAway::AdjacentColumn` | push neighbours whose feeds cross the box |
//! | 4 | `FeederDrag::Outgoing` | drag the game fed by the moved box |
//! | 5 | `FeederDrag::Incoming(Top)` | drag the game feeding the top side |
//! | 6 | `FeederDrag::Incoming(Bottom)` | drag the game feeding the bottom side |
//! | 7 | `TopBottomSwapper::Target` | swap the downstream game's slots instead of dragging it |

mod feeder_drag;
mod push_away;
mod top_bottom_swapper;

pub use feeder_drag::FeederDrag;
pub use push_away::PushAway;
pub use top_bottom_swapper::TopBottomSwapper;

use tracing::debug;

use crate::core::GridItem;
use crate::mover::Search;
use crate::option::OptionId;
use crate::types::{GameId, Slot};

/// A move that has been applied to a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedGame {
    pub old: GridItem,
    pub new: GridItem,
}

impl MovedGame {
    pub fn id(&self) -> Option<GameId> {
        self.new.game_id()
    }
}

/// One step of the propagation pipeline
pub trait PropagationRule: Sync {
    fn name(&self) -> &'static str;

    /// Apply to `branch`, returning the live options that result.
    fn apply(&self, search: &mut Search<'_>, branch: OptionId, moved: &MovedGame) -> Vec<OptionId>;
}

static PIPELINE: [&dyn PropagationRule; 7] = [
    &TopBottomSwapper::Sources,
    &PushAway::SameColumn,
    &PushAway::AdjacentColumn,
    &FeederDrag::Outgoing,
    &FeederDrag::Incoming(Slot::Top),
    &FeederDrag::Incoming(Slot::Bottom),
    &TopBottomSwapper::Target,
];

/// The rules in the order they run.
pub fn pipeline() -> &'static [&'static dyn PropagationRule] {
    &PIPELINE
}

/// Index of the moved game in `branch`; a branch where it is gone is stale.
pub(crate) fn moved_index(
    search: &mut Search<'_>,
    branch: OptionId,
    moved: &MovedGame,
    rule: &str,
) -> Option<usize> {
    let grid = search.grid(branch);
    let idx = moved
        .id()
        .and_then(|id| grid.index_of_game(id))
        .filter(|idx| grid.item(*idx).range() == moved.new.range());
    if idx.is_none() {
        search.disqualify(branch, format!("{rule}: {} is no longer current", moved.new));
    }
    idx
}

/// Try each alternative placement of `item`, each in its own option.
///
/// The first alternative runs in `branch`; the others run in forks taken
/// before any alternative is applied.
pub(crate) fn fork_alternatives(
    search: &mut Search<'_>,
    branch: OptionId,
    item: &GridItem,
    alternatives: Vec<(&'static str, GridItem)>,
) -> Vec<OptionId> {
    if let Some(id) = item.game_id() {
        if search.has_moved(branch, id) {
            debug!(option = %branch, game = %id, "not dragging a game already moved");
            return vec![branch];
        }
    }
    if search.budget_exhausted() {
        search.note_budget_exhausted();
        return vec![branch];
    }

    let mut branches = vec![branch];
    for (name, _) in alternatives.iter().skip(1) {
        branches.push(search.fork(branch, name));
    }
    let mut live = Vec::new();
    for (option, (name, alternative)) in branches.into_iter().zip(alternatives) {
        search.crumb(option, format!("{name}: {item} to {}", alternative.range()));
        live.extend(search.move_in_branch(option, item.clone(), alternative));
    }
    live
}
