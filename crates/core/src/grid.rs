//! Grid module - the ordered collection of placed items
//!
//! The grid owns every line and game box of one diagram plus the alignment
//! anchor (`first_pattern`) that all placement snaps to. A derived
//! `GameId -> index` map is rebuilt whenever the item list changes.
//!
//! Grids are cheap to clone and every search attempt works on its own clone;
//! only the winning clone is ever handed back to the caller.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{GridError, Result};
use crate::grid_item::GridItem;
use crate::topology::Topology;
use crate::types::{GameId, RangeInfo, RangeOverlap, Slot, GAME_COLUMN_STRIDE};

/// Kind of a single grid edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Remove,
}

/// One edit needed to turn one grid into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridChange {
    pub kind: ChangeKind,
    pub item: GridItem,
}

impl GridChange {
    pub fn insert(item: GridItem) -> Self {
        Self {
            kind: ChangeKind::Insert,
            item,
        }
    }

    pub fn remove(item: GridItem) -> Self {
        Self {
            kind: ChangeKind::Remove,
            item,
        }
    }
}

/// The bracket diagram: ordered items plus the alignment anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    items: Vec<GridItem>,
    first_pattern: RangeInfo,
    index: HashMap<GameId, usize>,
}

impl Grid {
    /// Create an empty grid anchored at `first_pattern`
    pub fn new(first_pattern: RangeInfo) -> Self {
        Self {
            items: Vec::new(),
            first_pattern,
            index: HashMap::new(),
        }
    }

    /// Build a grid from trusted items.
    ///
    /// # Panics
    ///
    /// Panics if two items carry the same game id.
    pub fn from_items(first_pattern: RangeInfo, items: Vec<GridItem>) -> Self {
        let mut grid = Self::new(first_pattern);
        for item in items {
            grid.push(item);
        }
        grid
    }

    /// Build a grid from untrusted (stored) items, validating them.
    pub fn try_from_items(first_pattern: RangeInfo, items: Vec<GridItem>) -> Result<Self> {
        let mut grid = Self::new(first_pattern);
        for item in items {
            let range = item.range();
            if range.row_count <= 0 || range.col_count <= 0 {
                return Err(GridError::EmptyRange { range });
            }
            if let Some(id) = item.game_id() {
                if grid.index.contains_key(&id) {
                    return Err(GridError::DuplicateGame { id });
                }
            }
            grid.push(item);
        }
        Ok(grid)
    }

    pub fn first_pattern(&self) -> RangeInfo {
        self.first_pattern
    }

    pub fn first_row(&self) -> i32 {
        self.first_pattern.row_start
    }

    pub fn first_col(&self) -> i32 {
        self.first_pattern.col_start
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn item(&self, idx: usize) -> &GridItem {
        &self.items[idx]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over game items only
    pub fn games(&self) -> impl Iterator<Item = &GridItem> {
        self.items.iter().filter(|i| i.is_game())
    }

    /// Append an item.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate game id; the index is a tree keyed by identity and
    /// a duplicate means the caller broke the one-box-per-game invariant.
    pub fn push(&mut self, item: GridItem) -> usize {
        let idx = self.items.len();
        if let Some(id) = item.game_id() {
            let previous = self.index.insert(id, idx);
            assert!(previous.is_none(), "duplicate grid key: game {id} placed twice");
        }
        self.items.push(item);
        idx
    }

    pub fn remove_at(&mut self, idx: usize) -> GridItem {
        let item = self.items.remove(idx);
        self.reindex();
        item
    }

    /// Replace the item at `idx`, returning the previous one.
    pub fn replace_at(&mut self, idx: usize, item: GridItem) -> GridItem {
        let previous = std::mem::replace(&mut self.items[idx], item);
        if previous.game_id() != self.items[idx].game_id() {
            self.reindex();
        }
        previous
    }

    /// Mutate the item at `idx` in place. Identity must not change.
    pub fn update_at(&mut self, idx: usize, f: impl FnOnce(&mut GridItem)) {
        let id = self.items[idx].game_id();
        f(&mut self.items[idx]);
        assert_eq!(id, self.items[idx].game_id(), "grid item identity changed in place");
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (idx, item) in self.items.iter().enumerate() {
            if let Some(id) = item.game_id() {
                let previous = self.index.insert(id, idx);
                assert!(previous.is_none(), "duplicate grid key: game {id} placed twice");
            }
        }
    }

    pub fn index_of_game(&self, id: GameId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn item_for_game(&self, id: GameId) -> Option<&GridItem> {
        self.index_of_game(id).map(|idx| &self.items[idx])
    }

    pub fn contains_game(&self, id: GameId) -> bool {
        self.index.contains_key(&id)
    }

    /// Index of the item with the same range and identity as `item`
    pub fn find_box(&self, item: &GridItem) -> Option<usize> {
        match item.game_id() {
            Some(id) => self
                .index_of_game(id)
                .filter(|idx| self.items[*idx].range() == item.range()),
            None => self.items.iter().position(|i| i.is_line() && i.range() == item.range()),
        }
    }

    // ---- overlap queries ----

    pub fn get_overlapping_items(&self, range: &RangeInfo) -> Vec<&GridItem> {
        self.items.iter().filter(|i| i.range().intersects(range)).collect()
    }

    pub fn get_first_overlapping_item(&self, range: &RangeInfo) -> Option<&GridItem> {
        self.items.iter().find(|i| i.range().intersects(range))
    }

    /// Exact match preferred, else the item covering the largest share of `range`.
    pub fn get_best_overlapping_item(&self, range: &RangeInfo) -> Option<&GridItem> {
        if let Some(exact) = self.items.iter().find(|i| i.range() == *range) {
            return Some(exact);
        }
        let area = range.area().max(1);
        let mut best: Option<(&GridItem, i64)> = None;
        for item in &self.items {
            let Some(shared) = item.range().intersection(range) else {
                continue;
            };
            let percent = shared.area() * 100 / area;
            if best.map_or(true, |(_, p)| percent > p) {
                best = Some((item, percent));
            }
        }
        best.map(|(item, _)| item)
    }

    /// Every item touching `range` lies entirely inside it.
    pub fn is_range_independent(&self, range: &RangeInfo) -> bool {
        self.items
            .iter()
            .filter(|i| i.range().intersects(range))
            .all(|i| range.contains(&i.range()))
    }

    /// Grow `seed` until it is independent.
    pub fn independent_region_around(&self, seed: RangeInfo) -> RangeInfo {
        let mut region = seed;
        for _ in 0..=self.items.len() {
            let grown = self
                .items
                .iter()
                .filter(|i| i.range().intersects(&region))
                .fold(region, |acc, i| acc.union(&i.range()));
            if grown == region {
                break;
            }
            region = grown;
        }
        region
    }

    /// Bounding box of all items
    pub fn extent(&self) -> Option<RangeInfo> {
        self.items
            .iter()
            .map(GridItem::range)
            .reduce(|acc, r| acc.union(&r))
    }

    /// Lowest row used by any item overlapping the given column band.
    pub fn lowest_row_in_columns(&self, col_start: i32, col_count: i32) -> Option<i32> {
        self.items
            .iter()
            .filter(|i| {
                let r = i.range();
                r.col_start <= col_start + col_count - 1 && col_start <= r.col_end()
            })
            .map(|i| i.range().row_end())
            .max()
    }

    /// Items lying entirely inside `band`.
    pub fn items_in_band(&self, band: &RangeInfo) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, i)| band.contains(&i.range()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Insert `count` blank rows before `at_row`.
    ///
    /// Items at or below `at_row` move down; items spanning it grow.
    pub fn insert_rows(&mut self, at_row: i32, count: i32) {
        if count <= 0 {
            return;
        }
        for item in &mut self.items {
            let r = item.range();
            if r.row_start >= at_row {
                item.shift(count, 0);
            } else if r.row_end() >= at_row {
                item.grow(0, count);
            }
        }
    }

    /// Snap a column to the game stride anchored at the pattern origin.
    pub fn snap_column(&self, col: i32) -> i32 {
        let first = self.first_col();
        let steps = (col - first).div_euclid(GAME_COLUMN_STRIDE).max(0);
        first + steps * GAME_COLUMN_STRIDE
    }

    /// Round a row up onto the pattern's row parity.
    pub fn snap_row_parity(&self, row: i32) -> i32 {
        if (row - self.first_row()).rem_euclid(2) == 0 {
            row
        } else {
            row + 1
        }
    }

    // ---- connectivity ----

    pub fn line_starting_at(&self, point: &RangeInfo) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.is_line() && i.range().starts_at(point))
    }

    pub fn line_ending_at(&self, point: &RangeInfo) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.is_line() && i.line_end_point() == *point)
    }

    pub fn game_with_outgoing(&self, point: &RangeInfo) -> Option<usize> {
        self.items.iter().position(|i| {
            i.is_game()
                && i.outgoing_feeder_point().overlap_not_backwards(point) == RangeOverlap::Equal
        })
    }

    /// Game whose top or bottom incoming point is `point`, with that visual side.
    pub fn game_at_incoming(&self, point: &RangeInfo) -> Option<(usize, Slot)> {
        self.items.iter().enumerate().find_map(|(idx, item)| {
            if !item.is_game() {
                return None;
            }
            Slot::BOTH
                .into_iter()
                .find(|side| item.incoming_point(*side) == *point)
                .map(|side| (idx, side))
        })
    }

    /// Where the feed of game `idx` ends after following its connector lines.
    pub fn feeder_end_point(&self, idx: usize) -> RangeInfo {
        self.follow_lines(self.items[idx].outgoing_feeder_point())
    }

    /// Follow connector lines starting at `point` to the last end point.
    pub fn follow_lines(&self, point: RangeInfo) -> RangeInfo {
        let mut point = point;
        for _ in 0..self.items.len() {
            match self.line_starting_at(&point) {
                Some(line) => point = self.items[line].line_end_point(),
                None => break,
            }
        }
        point
    }

    /// Game whose feed (possibly through lines) arrives at `point`.
    pub fn feeder_reaching(&self, point: &RangeInfo) -> Option<usize> {
        let mut point = *point;
        for _ in 0..=self.items.len() {
            if let Some(game) = self.game_with_outgoing(&point) {
                return Some(game);
            }
            match self.line_ending_at(&point) {
                Some(line) => point = self.items[line].range().top_left(),
                None => return None,
            }
        }
        None
    }

    /// Connection point offered by the placed game feeding `slot` of `game`.
    pub fn source_point(
        &self,
        game: GameId,
        slot: Slot,
        topology: &dyn Topology,
    ) -> Option<RangeInfo> {
        let feeder = topology.game(game)?.source(slot).feeding_game()?;
        self.index_of_game(feeder).map(|idx| self.feeder_end_point(idx))
    }

    /// Incoming point on the placed winner target that this game should reach.
    pub fn target_point(&self, game: GameId, topology: &dyn Topology) -> Option<RangeInfo> {
        let target = topology.winner_target(game)?;
        let slot = topology.game(target)?.slot_fed_by(game)?;
        let item = self.item_for_game(target)?;
        Some(item.incoming_point(item.side_of(slot)))
    }

    /// `None` when `slot` is not fed by a placed game, else whether it is connected.
    pub fn is_source_connected(
        &self,
        idx: usize,
        slot: Slot,
        topology: &dyn Topology,
    ) -> Option<bool> {
        let item = &self.items[idx];
        let id = item.game_id()?;
        let point = self.source_point(id, slot, topology)?;
        Some(point == item.incoming_point(item.side_of(slot)))
    }

    /// Whether any feed arrives at the visual side `side` of game `idx`.
    pub fn is_side_fed(&self, idx: usize, side: Slot) -> bool {
        let point = self.items[idx].incoming_point(side);
        self.feeder_reaching(&point)
            .map_or(false, |feeder| feeder != idx)
    }

    // ---- diffing ----

    /// Changes turning `self` into `other`: removals first, then insertions.
    ///
    /// Items are matched by range, identity and slot assignment.
    pub fn diff(&self, other: &Grid) -> Vec<GridChange> {
        let mut matched = vec![false; other.items.len()];
        let mut removals = Vec::new();
        for item in &self.items {
            let hit = other
                .items
                .iter()
                .enumerate()
                .position(|(j, o)| !matched[j] && o.same_placement(item));
            match hit {
                Some(j) => matched[j] = true,
                None => removals.push(GridChange::remove(item.clone())),
            }
        }
        let insertions = other
            .items
            .iter()
            .zip(matched)
            .filter(|(_, m)| !m)
            .map(|(item, _)| GridChange::insert(item.clone()));
        removals.into_iter().chain(insertions).collect()
    }

    /// Apply changes the way storage does: all removals, then all insertions.
    pub fn apply_changes(&mut self, changes: &[GridChange]) -> Result<()> {
        for change in changes.iter().filter(|c| c.kind == ChangeKind::Remove) {
            let idx = self
                .items
                .iter()
                .position(|i| i.same_placement(&change.item))
                .ok_or_else(|| GridError::MissingItem {
                    item: change.item.to_string(),
                })?;
            self.remove_at(idx);
        }
        for change in changes.iter().filter(|c| c.kind == ChangeKind::Insert) {
            if let Some(id) = change.item.game_id() {
                if self.contains_game(id) {
                    return Err(GridError::DuplicateGame { id });
                }
            }
            self.push(change.item.clone());
        }
        trace!(changes = changes.len(), "applied grid changes");
        Ok(())
    }
}
