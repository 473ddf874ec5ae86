//! Move search - turns one requested move into a consistent grid
//!
//! The search keeps an arena of [`GridOption`] branches. The requested move
//! seeds the root; a working copy of the root then runs the propagation
//! pipeline, which may mutate it, fork siblings with alternative
//! resolutions, and recursively move other games. Once everything settles
//! every option is ranked and the lowest qualified score wins. Ties go to
//! the option created first.
//!
//! Two limits keep the recursion finite: each lineage never moves the same
//! game twice, and a global move budget stops the search with a warning.

use tracing::{debug, warn};

use crate::config::MoverConfig;
use crate::core::{Grid, GridChange, GridItem, GridRanker, Rank, Topology};
use crate::error::MoveError;
use crate::option::{GridOption, OptionId};
use crate::rules::{pipeline, MovedGame};
use crate::types::{GameId, GAME_NUMBER_MIN_ROWS};

/// Outcome of a successful move
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub grid: Grid,
    pub rank: Rank,
    /// Non-fatal warning, e.g. the move budget ran out.
    pub warning: Option<String>,
    /// Name of the winning option.
    pub name: String,
    pub crumbs: Vec<String>,
    pub options_explored: usize,
}

impl MoveResult {
    /// Storage edits turning `original` into the result.
    pub fn changes(&self, original: &Grid) -> Vec<GridChange> {
        original.diff(&self.grid)
    }
}

/// Why `item` can never be a valid placement on `grid`, if it cannot.
pub fn structural_problem(grid: &Grid, item: &GridItem, topology: &dyn Topology) -> Option<String> {
    let r = item.range();
    if r.row_count <= 0 || r.col_count <= 0 {
        return Some(format!("{item} has an empty extent"));
    }
    if let Some(id) = item.game_id() {
        if !topology.is_championship(id) && r.row_count < GAME_NUMBER_MIN_ROWS {
            return Some(format!("game {id} would be only {} rows tall", r.row_count));
        }
    }
    if r.row_start < grid.first_row() {
        return Some(format!("{item} starts above row {}", grid.first_row()));
    }
    if r.col_start < grid.first_col() {
        return Some(format!("{item} starts left of column {}", grid.first_col()));
    }
    None
}

/// Mutable state of one move search
pub struct Search<'t> {
    topology: &'t dyn Topology,
    config: MoverConfig,
    options: Vec<GridOption>,
    move_count: usize,
    warning: Option<String>,
}

impl<'t> Search<'t> {
    pub fn new(topology: &'t dyn Topology, config: MoverConfig) -> Self {
        Self {
            topology,
            config,
            options: Vec::new(),
            move_count: 0,
            warning: None,
        }
    }

    pub fn topology(&self) -> &'t dyn Topology {
        self.topology
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    pub fn options(&self) -> &[GridOption] {
        &self.options
    }

    pub fn option(&self, id: OptionId) -> &GridOption {
        &self.options[id.0]
    }

    pub fn option_mut(&mut self, id: OptionId) -> &mut GridOption {
        &mut self.options[id.0]
    }

    pub fn grid(&self, id: OptionId) -> &Grid {
        &self.options[id.0].grid
    }

    pub fn grid_mut(&mut self, id: OptionId) -> &mut Grid {
        &mut self.options[id.0].grid
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn add_root(&mut self, grid: Grid, name: impl Into<String>) -> OptionId {
        let id = OptionId(self.options.len());
        self.options.push(GridOption::new(id, grid, name));
        id
    }

    /// Clone `id` into a new sibling option.
    pub fn fork(&mut self, id: OptionId, name: &str) -> OptionId {
        let fork_id = OptionId(self.options.len());
        let fork = self.options[id.0].fork(fork_id, name);
        debug!(from = %id, to = %fork_id, name, "forked option");
        self.options.push(fork);
        fork_id
    }

    pub fn is_disqualified(&self, id: OptionId) -> bool {
        self.options[id.0].is_disqualified()
    }

    pub fn disqualify(&mut self, id: OptionId, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(option = %id, reason = %reason, "option disqualified");
        self.options[id.0].disqualify(reason);
    }

    pub fn crumb(&mut self, id: OptionId, crumb: impl Into<String>) {
        self.options[id.0].crumb(crumb);
    }

    pub fn has_moved(&self, id: OptionId, game: GameId) -> bool {
        self.options[id.0].moved_games.contains(&game)
    }

    pub fn budget_exhausted(&self) -> bool {
        self.move_count >= self.config.move_budget
    }

    /// Record that the budget ran out; only the first call logs.
    pub fn note_budget_exhausted(&mut self) {
        if self.warning.is_none() {
            let message = format!(
                "move budget of {} exhausted; the layout may be incomplete",
                self.config.move_budget
            );
            warn!(budget = self.config.move_budget, "move budget exhausted");
            self.warning = Some(message);
        }
    }

    /// Count one move against the budget. `false` means skip it.
    fn charge_move(&mut self) -> bool {
        if self.budget_exhausted() {
            self.note_budget_exhausted();
            return false;
        }
        self.move_count += 1;
        true
    }

    /// Move `old` to `new` inside `branch` and propagate.
    ///
    /// Returns the live options that result: `branch` itself (possibly
    /// mutated) plus any forks. A skipped move returns `branch` unchanged;
    /// a disqualified branch is not returned.
    ///
    /// # Panics
    ///
    /// Panics if `old` and `new` are not the same game.
    pub fn move_in_branch(
        &mut self,
        branch: OptionId,
        old: GridItem,
        new: GridItem,
    ) -> Vec<OptionId> {
        let Some(id) = old.game_id() else {
            panic!("only game boxes move through the search, got {old}");
        };
        assert_eq!(
            Some(id),
            new.game_id(),
            "move changes item identity: {old} -> {new}"
        );
        if self.is_disqualified(branch) {
            return Vec::new();
        }
        if self.has_moved(branch, id) {
            debug!(option = %branch, game = %id, "game already moved in this lineage");
            return vec![branch];
        }
        if !self.charge_move() {
            return vec![branch];
        }

        let grid = self.grid(branch);
        let Some(idx) = grid.find_box(&old) else {
            self.disqualify(branch, format!("{old} is stale"));
            return Vec::new();
        };
        if let Some(problem) = structural_problem(grid, &new, self.topology) {
            self.disqualify(branch, problem);
            return Vec::new();
        }

        debug!(option = %branch, game = %id, from = %old.range(), to = %new.range(), "moving game");
        self.grid_mut(branch).replace_at(idx, new.clone());
        let option = self.option_mut(branch);
        option.moved_games.insert(id);
        option.crumb(format!("moved game {id} from {} to {}", old.range(), new.range()));

        self.propagate(branch, &MovedGame { old, new })
    }

    /// Run the propagation pipeline for an already applied move.
    pub fn propagate(&mut self, branch: OptionId, moved: &MovedGame) -> Vec<OptionId> {
        let mut live = vec![branch];
        for rule in pipeline() {
            let mut next = Vec::new();
            for id in live {
                if self.is_disqualified(id) {
                    continue;
                }
                for out in rule.apply(self, id, moved) {
                    if !next.contains(&out) {
                        next.push(out);
                    }
                }
            }
            live = next;
        }
        live
    }

    /// Score every option; returns the best qualified one.
    pub fn rank_options(&mut self) -> Option<OptionId> {
        let topology = self.topology;
        let mut best: Option<(OptionId, Rank)> = None;
        for option in &mut self.options {
            if option.is_disqualified() {
                continue;
            }
            let rank = GridRanker::rank(&option.grid, topology);
            option.rank = Some(rank);
            debug!(option = %option.id, name = %option.name, %rank, "ranked option");
            if best.map_or(!rank.is_disqualified(), |(_, b)| rank.is_better_than(b)) {
                best = Some((option.id, rank));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Entry point for moving one game box
#[derive(Debug, Clone, Copy, Default)]
pub struct GameMover {
    config: MoverConfig,
}

impl GameMover {
    pub fn new(config: MoverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    /// Move the game at `old` to `new` and return the best consistent grid.
    ///
    /// # Panics
    ///
    /// Panics if no item sits exactly at `old.range()`, or if that item is
    /// not the game `old` names, or if `new` names a different game.
    pub fn move_game(
        &self,
        grid: &Grid,
        old: &GridItem,
        new: &GridItem,
        topology: &dyn Topology,
    ) -> Result<MoveResult, MoveError> {
        let Some(idx) = grid.items().iter().position(|i| i.range() == old.range()) else {
            panic!("no grid item at {}", old.range());
        };
        let found = grid.item(idx).clone();
        assert!(
            found.is_game() && found.game_id() == old.game_id(),
            "identity mismatch: asked to move {old} but the grid holds {found}"
        );
        assert_eq!(
            old.game_id(),
            new.game_id(),
            "identity mismatch: cannot move {old} onto {new}"
        );
        if let Some(reason) = structural_problem(grid, new, topology) {
            return Err(MoveError::ImpossibleBox { reason });
        }
        let Some(id) = new.game_id() else {
            unreachable!("identity checked above");
        };

        let mut search = Search::new(topology, self.config);
        let mut seed = grid.clone();
        seed.replace_at(idx, new.clone());
        let root = search.add_root(seed, format!("move game {id}"));
        search.option_mut(root).moved_games.insert(id);
        search.crumb(root, format!("moved game {id} from {} to {}", found.range(), new.range()));
        search.charge_move();

        let work = search.fork(root, "propagate");
        let moved = MovedGame {
            old: found,
            new: new.clone(),
        };
        let live = search.propagate(work, &moved);
        debug!(
            game = %id,
            live = live.len(),
            options = search.options().len(),
            moves = search.move_count(),
            "move search settled"
        );

        let best = search.rank_options().ok_or(MoveError::NoValidPlacement)?;
        let warning = search.warning.take();
        let options_explored = search.options.len();
        let option = search.options.swap_remove(best.0);
        Ok(MoveResult {
            rank: option.effective_rank(),
            grid: option.grid,
            warning,
            name: option.name,
            crumbs: option.crumbs,
            options_explored,
        })
    }
}
