//! Placement module - geometry of a game that is not on the grid yet
//!
//! Given the connection points offered by the game's placed sources and its
//! placed winner target, [`Grid::grid_game_from_constraints`] works out the
//! box, the connector lines it needs, and whether top/bottom must be swapped.
//! Nothing is mutated; a non-`None` [`GridGameInsert::fail_reason`] means the
//! game cannot go where its constraints put it.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::grid::Grid;
use crate::grid_item::GridItem;
use crate::topology::Topology;
use crate::types::{
    GameId, RangeInfo, Slot, CHAMPIONSHIP_GAME_HEIGHT, EPHEMERAL_FEEDER_COLS,
    GAME_COLUMN_STRIDE, GAME_HEIGHT_STEP, GAME_NUMBER_MIN_ROWS, GAME_WIDTH, GROW_UP_MIN_ROOM,
    LEFT_COLUMN_PAD, SAME_COLUMN_PAD, SOURCELESS_TOP_PAD, STANDARD_GAME_HEIGHT,
};

/// Maximum growth steps when searching for a left-independent height
const MAX_GROW_STEPS: usize = 10;

/// Result of placement geometry for one unplaced game
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridGameInsert {
    pub range_game: RangeInfo,
    pub range_feeder_top: Option<RangeInfo>,
    pub range_feeder_bottom: Option<RangeInfo>,
    pub range_winner_feeder: Option<RangeInfo>,
    pub swap_top_bottom: bool,
    /// Set when the game cannot be placed; names the blocking region.
    pub fail_reason: Option<String>,
}

impl GridGameInsert {
    fn failed(reason: String) -> Self {
        Self {
            fail_reason: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.fail_reason.is_none()
    }

    /// Items to add to the grid for a successful insert.
    pub fn items(&self, id: GameId) -> Vec<GridItem> {
        let mut items = vec![GridItem::game(id, self.range_game, self.swap_top_bottom)];
        items.extend(
            [
                self.range_feeder_top,
                self.range_feeder_bottom,
                self.range_winner_feeder,
            ]
            .into_iter()
            .flatten()
            .map(GridItem::line),
        );
        items
    }

    /// Labelled regions to validate against the grid.
    fn regions(&self) -> ArrayVec<(&'static str, RangeInfo), 4> {
        let mut regions = ArrayVec::new();
        regions.push(("game", self.range_game));
        if let Some(r) = self.range_feeder_top {
            regions.push(("top feeder", r));
        }
        if let Some(r) = self.range_feeder_bottom {
            regions.push(("bottom feeder", r));
        }
        if let Some(r) = self.range_winner_feeder {
            regions.push(("winner feeder", r));
        }
        regions
    }
}

/// Connection points that constrain where a new game can go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementAnchors {
    pub game: GameId,
    pub championship: bool,
    /// Point offered by the placed game feeding the top source.
    pub top: Option<RangeInfo>,
    /// Point offered by the placed game feeding the bottom source.
    pub bottom: Option<RangeInfo>,
    /// Incoming point on the placed winner target.
    pub target: Option<RangeInfo>,
    /// The game and its feeders; ignored by feeder-collision checks.
    pub excluded: ArrayVec<GameId, 3>,
}

impl PlacementAnchors {
    pub fn gather(grid: &Grid, game: GameId, topology: &dyn Topology) -> Self {
        let mut excluded = ArrayVec::new();
        excluded.push(game);
        if let Some(entry) = topology.game(game) {
            excluded.extend(entry.feeders().map(|(_, id)| id));
        }
        Self {
            game,
            championship: topology.is_championship(game),
            top: grid.source_point(game, Slot::Top, topology),
            bottom: grid.source_point(game, Slot::Bottom, topology),
            target: grid.target_point(game, topology),
            excluded,
        }
    }

    pub fn both_sources(&self) -> Option<(RangeInfo, RangeInfo)> {
        self.top.zip(self.bottom)
    }

    /// The only anchored source, when exactly one is placed.
    pub fn single_source(&self) -> Option<(Slot, RangeInfo)> {
        match (self.top, self.bottom) {
            (Some(p), None) => Some((Slot::Top, p)),
            (None, Some(p)) => Some((Slot::Bottom, p)),
            _ => None,
        }
    }

    pub fn default_height(&self) -> i32 {
        if self.championship {
            CHAMPIONSHIP_GAME_HEIGHT
        } else {
            STANDARD_GAME_HEIGHT
        }
    }

    pub fn is_excluded(&self, id: Option<GameId>) -> bool {
        id.map_or(false, |id| self.excluded.contains(&id))
    }
}

impl Grid {
    /// Compute where `game` goes given its placed neighbours.
    ///
    /// `requested_anchor` supplies the desired column; rows come from the
    /// anchors, or from the column contents for a sourceless game.
    pub fn grid_game_from_constraints(
        &self,
        game: GameId,
        requested_anchor: RangeInfo,
        topology: &dyn Topology,
    ) -> GridGameInsert {
        if topology.game(game).is_none() {
            return GridGameInsert::failed(format!(
                "game {game} is not part of the bracket topology"
            ));
        }
        if let Some(existing) = self.item_for_game(game) {
            return GridGameInsert::failed(format!(
                "game {game} is already placed at {}",
                existing.range()
            ));
        }

        let anchors = PlacementAnchors::gather(self, game, topology);
        let col = self.placement_column(&anchors, &requested_anchor);

        if let Some(target) = anchors.target {
            if col + GAME_WIDTH > target.col_start {
                return GridGameInsert::failed(format!(
                    "winner target of game {game} at {target} is left of column {}",
                    col + GAME_WIDTH
                ));
            }
        }

        let mut insert = match (anchors.top, anchors.bottom) {
            (Some(top), Some(bottom)) => {
                if top.row_start == bottom.row_start {
                    return GridGameInsert::failed(format!(
                        "sources of game {game} both end on row {}",
                        top.row_start
                    ));
                }
                let swap = top.row_start > bottom.row_start;
                let (upper, lower) = if swap { (bottom, top) } else { (top, bottom) };
                GridGameInsert {
                    range_game: RangeInfo::new(
                        upper.row_start,
                        lower.row_start - upper.row_start + 1,
                        col,
                        GAME_WIDTH,
                    ),
                    swap_top_bottom: swap,
                    ..GridGameInsert::default()
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                let Some((slot, point)) = anchors.single_source() else {
                    unreachable!("exactly one source is anchored");
                };
                match anchors.target {
                    Some(target) => {
                        if target.row_start == point.row_start {
                            return GridGameInsert::failed(format!(
                                "source and winner target of game {game} share row {}",
                                point.row_start
                            ));
                        }
                        let half = (target.row_start - point.row_start).abs();
                        let height = 2 * half + 1;
                        let (row, side) = if point.row_start < target.row_start {
                            (point.row_start, Slot::Top)
                        } else {
                            (point.row_start - height + 1, Slot::Bottom)
                        };
                        GridGameInsert {
                            range_game: RangeInfo::new(row, height, col, GAME_WIDTH),
                            swap_top_bottom: slot != side,
                            ..GridGameInsert::default()
                        }
                    }
                    None => self.single_source_without_target(&anchors, slot, point, col),
                }
            }
            (None, None) => {
                let height = anchors.default_height();
                GridGameInsert {
                    range_game: RangeInfo::new(self.sourceless_row(col), height, col, GAME_WIDTH),
                    ..GridGameInsert::default()
                }
            }
        };

        insert.range_feeder_top = anchors.top.and_then(|p| feeder_line(p, col));
        insert.range_feeder_bottom = anchors.bottom.and_then(|p| feeder_line(p, col));
        if let Some(target) = anchors.target {
            let out = GridItem::game(game, insert.range_game, insert.swap_top_bottom)
                .outgoing_feeder_point();
            if out.row_start == target.row_start && target.col_start > out.col_start {
                insert.range_winner_feeder = Some(RangeInfo::new(
                    out.row_start,
                    1,
                    out.col_start,
                    target.col_start - out.col_start,
                ));
            }
        }

        if let Some(reason) = self.placement_failure(&anchors, &insert, topology) {
            debug!(game = %game, reason = %reason, "placement rejected");
            return GridGameInsert::failed(reason);
        }
        debug!(
            game = %game,
            range = %insert.range_game,
            swap = insert.swap_top_bottom,
            "placement computed"
        );
        insert
    }

    /// Requested column snapped to the stride, never left of a source.
    pub fn placement_column(&self, anchors: &PlacementAnchors, requested: &RangeInfo) -> i32 {
        [anchors.top, anchors.bottom]
            .into_iter()
            .flatten()
            .map(|p| self.snap_column(p.col_start))
            .fold(self.snap_column(requested.col_start), i32::max)
    }

    /// First row for a game with no anchored source in column `col`.
    pub fn sourceless_row(&self, col: i32) -> i32 {
        let mut row = self.first_row() + SOURCELESS_TOP_PAD;
        if let Some(bottom) = self.lowest_row_in_columns(col, GAME_WIDTH) {
            row = row.max(bottom + SAME_COLUMN_PAD);
        }
        let left = col - GAME_COLUMN_STRIDE;
        if left >= self.first_col() {
            if let Some(bottom) = self.lowest_row_in_columns(left, GAME_WIDTH) {
                row = row.max(bottom + LEFT_COLUMN_PAD);
            }
        }
        self.snap_row_parity(row)
    }

    fn single_source_without_target(
        &self,
        anchors: &PlacementAnchors,
        slot: Slot,
        point: RangeInfo,
        col: i32,
    ) -> GridGameInsert {
        let height = anchors.default_height();
        if self.prefers_grow_up(point, height, col, anchors) {
            return GridGameInsert {
                range_game: RangeInfo::new(point.row_start - height + 1, height, col, GAME_WIDTH),
                swap_top_bottom: slot != Slot::Bottom,
                ..GridGameInsert::default()
            };
        }

        let mut range = RangeInfo::new(point.row_start, height, col, GAME_WIDTH);
        if !anchors.championship && !self.is_clear_of_left(&range, anchors) {
            let grown = (1..=MAX_GROW_STEPS)
                .map(|step| range.grow_rows(0, GAME_HEIGHT_STEP * step as i32))
                .find(|candidate| self.is_clear_of_left(candidate, anchors));
            if let Some(grown) = grown {
                range = grown;
            }
        }
        GridGameInsert {
            range_game: range,
            swap_top_bottom: slot != Slot::Top,
            ..GridGameInsert::default()
        }
    }

    /// Grow-up vs grow-down tie-break for a single anchored source.
    ///
    /// Down is preferred. Up wins only when there is room above the anchor
    /// and growing down would swallow a foreign feeder from the left column
    /// while growing up would not.
    pub fn prefers_grow_up(
        &self,
        point: RangeInfo,
        height: i32,
        col: i32,
        anchors: &PlacementAnchors,
    ) -> bool {
        let down = RangeInfo::new(point.row_start, height, col, GAME_WIDTH);
        let up = RangeInfo::new(point.row_start - height + 1, height, col, GAME_WIDTH);
        self.has_room_above(point, height)
            && self.left_feeder_collision(&down, anchors).is_some()
            && self.left_feeder_collision(&up, anchors).is_none()
    }

    /// Whether a box growing up from `point` stays below the grid top.
    pub fn has_room_above(&self, point: RangeInfo, height: i32) -> bool {
        point.row_start - height + 1 >= self.first_row()
            && point.row_start - self.first_row() > GROW_UP_MIN_ROOM
    }

    /// A game (other than the excluded ones) whose feed ends on the left edge of `range`.
    pub fn left_feeder_collision(
        &self,
        range: &RangeInfo,
        anchors: &PlacementAnchors,
    ) -> Option<usize> {
        (0..self.len()).find(|idx| {
            let item = self.item(*idx);
            if !item.is_game() || anchors.is_excluded(item.game_id()) {
                return false;
            }
            let end = self.feeder_end_point(*idx);
            end.col_start == range.col_start
                && end.row_start >= range.row_start
                && end.row_start <= range.row_end()
        })
    }

    /// The left column band beside `range` holds no item cut by its rows.
    fn is_clear_of_left(&self, range: &RangeInfo, anchors: &PlacementAnchors) -> bool {
        let left = range.col_start - GAME_COLUMN_STRIDE;
        if left < self.first_col() {
            return true;
        }
        let band = range.with_cols(left, GAME_WIDTH);
        self.items()
            .iter()
            .filter(|i| i.range().intersects(&band) && !anchors.is_excluded(i.game_id()))
            .all(|i| band.contains(&i.range()))
    }

    /// Unattached outgoing feeders, virtually extended to the right.
    pub fn ephemeral_feeders(
        &self,
        anchors: &PlacementAnchors,
        topology: &dyn Topology,
    ) -> Vec<(GameId, RangeInfo)> {
        let mut feeders = Vec::new();
        for (idx, item) in self.items().iter().enumerate() {
            let Some(id) = item.game_id() else {
                continue;
            };
            if anchors.is_excluded(Some(id)) || topology.is_championship(id) {
                continue;
            }
            let end = self.feeder_end_point(idx);
            if self.game_at_incoming(&end).is_some() {
                continue;
            }
            let feeder = RangeInfo::new(end.row_start, 1, end.col_start, EPHEMERAL_FEEDER_COLS);
            feeders.push((id, feeder));
        }
        feeders
    }

    fn placement_failure(
        &self,
        anchors: &PlacementAnchors,
        insert: &GridGameInsert,
        topology: &dyn Topology,
    ) -> Option<String> {
        let game = anchors.game;
        let range = insert.range_game;
        if !anchors.championship && range.row_count < GAME_NUMBER_MIN_ROWS {
            return Some(format!(
                "game {game} would be only {} rows tall at {range}",
                range.row_count
            ));
        }
        if anchors.championship && range.row_count < 1 {
            return Some(format!("game {game} has no rows at {range}"));
        }
        if range.row_start < self.first_row() {
            return Some(format!(
                "game {game} would start above the top of the grid at {range}"
            ));
        }

        let ephemeral = self.ephemeral_feeders(anchors, topology);
        for (label, region) in insert.regions() {
            if let Some(blocker) = self.get_first_overlapping_item(&region) {
                return Some(format!("{label} {region} overlaps {blocker}"));
            }
            if let Some((id, feeder)) = ephemeral.iter().find(|(_, f)| f.intersects(&region)) {
                return Some(format!(
                    "{label} {region} overlaps extended feeder of game {id} at {feeder}"
                ));
            }
        }
        None
    }
}

/// Line carrying a feed from `point` to the game column, when they differ.
fn feeder_line(point: RangeInfo, col: i32) -> Option<RangeInfo> {
    (point.col_start < col)
        .then(|| RangeInfo::new(point.row_start, 1, point.col_start, col - point.col_start))
}
