//! Grid adjusters - make room before a new game is placed
//!
//! Each adjuster inspects the grid for one crowding pattern around the game
//! about to be inserted and rearranges existing items so that placement can
//! succeed. They run in a fixed order and each predicate sees the grid as
//! left by the adjusters before it:
//!
//! | # | Adjuster | Pattern |
//! |---|----------|---------|
//! | 1 | [`NeedExtraSpaceBelowRegion`] | one source, the region below crowds a standard box |
//! | 2 | [`SwapGameRegionsForOverlap`] | two sources, a region between them adjoins the upper one |
//! | 3 | [`SwapAdjacentGameRegionsForOverlap`] | two sources, the region between adjoins the lower |
//! | 4 | [`RegionSwapperBottomGame`] | two sources, several regions between them |
//! | 5 | [`WantToGrowUpAtTopOfGrid`] | one source near the top, growing down hits a foreign feed |

use arrayvec::ArrayVec;
use tracing::debug;

use crate::core::{Grid, GridItem, PlacementAnchors, Topology};
use crate::region_swapper::RegionSwapper;
use crate::types::{GameId, RangeInfo, GAME_COLUMN_STRIDE, GAME_WIDTH, STANDARD_GAME_HEIGHT};

const EXTRA_SPACE_RETRIES: usize = 5;
const GROW_UP_RETRIES: usize = 10;
/// Rows inserted per step; even so row parity is kept.
const GROW_UP_STEP: i32 = 2;

/// The game about to be inserted
#[derive(Clone, Copy)]
pub struct AdjustRequest<'t> {
    pub game: GameId,
    pub anchor: RangeInfo,
    pub topology: &'t dyn Topology,
}

impl<'t> AdjustRequest<'t> {
    pub fn new(game: GameId, anchor: RangeInfo, topology: &'t dyn Topology) -> Self {
        Self {
            game,
            anchor,
            topology,
        }
    }

    fn anchors(&self, grid: &Grid) -> PlacementAnchors {
        PlacementAnchors::gather(grid, self.game, self.topology)
    }

    fn placement_fails(&self, grid: &Grid) -> bool {
        !grid
            .grid_game_from_constraints(self.game, self.anchor, self.topology)
            .is_ok()
    }
}

pub trait GridAdjuster: Sync {
    fn name(&self) -> &'static str;

    /// Pure check against the current grid.
    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool;

    /// Rearrange `grid` in place. Only called when the predicate holds.
    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>);
}

static ADJUSTERS: [&dyn GridAdjuster; 5] = [
    &NeedExtraSpaceBelowRegion,
    &SwapGameRegionsForOverlap,
    &SwapAdjacentGameRegionsForOverlap,
    &RegionSwapperBottomGame,
    &WantToGrowUpAtTopOfGrid,
];

/// The adjusters in the order they run.
pub fn adjusters() -> &'static [&'static dyn GridAdjuster] {
    &ADJUSTERS
}

/// Run every applicable adjuster in order, returning the names of those that ran.
pub fn run_adjusters(grid: &mut Grid, request: &AdjustRequest<'_>) -> Vec<&'static str> {
    let mut applied = Vec::new();
    if request.topology.is_championship(request.game) {
        return applied;
    }
    for adjuster in adjusters() {
        if adjuster.does_adjuster_apply(grid, request) {
            debug!(game = %request.game, adjuster = adjuster.name(), "adjusting grid");
            adjuster.do_adjustment(grid, request);
            applied.push(adjuster.name());
        }
    }
    applied
}

// ---- single source ----

/// Single anchored source and no placed target; the anchor point.
fn lone_source(anchors: &PlacementAnchors) -> Option<RangeInfo> {
    if anchors.championship || anchors.target.is_some() {
        return None;
    }
    anchors.single_source().map(|(_, point)| point)
}

/// Insert blank rows above the region that crowds a standard box hanging
/// from the only source.
pub struct NeedExtraSpaceBelowRegion;

impl NeedExtraSpaceBelowRegion {
    /// Source row, first blocking row and the region starting there.
    fn crowding(grid: &Grid, request: &AdjustRequest<'_>) -> Option<(i32, i32, RangeInfo)> {
        let anchors = request.anchors(grid);
        let point = lone_source(&anchors)?;
        let col = grid.placement_column(&anchors, &request.anchor);
        let left = (col - GAME_COLUMN_STRIDE).max(grid.first_col());
        let band = RangeInfo::new(
            point.row_start,
            STANDARD_GAME_HEIGHT + 1,
            left,
            col + GAME_WIDTH - left,
        );
        let blocked = grid
            .items()
            .iter()
            .filter(|i| !anchors.is_excluded(i.game_id()) && i.range().intersects(&band))
            .map(|i| i.range().row_start)
            .filter(|row| *row > point.row_start)
            .min()?;

        let extent = grid.extent()?;
        let width = extent.col_end() - grid.first_col() + 1;
        let band = RangeInfo::new(blocked, 1, grid.first_col(), width);
        let region = grid.independent_region_around(band);
        (region.row_start > point.row_start).then_some((point.row_start, blocked, region))
    }
}

impl GridAdjuster for NeedExtraSpaceBelowRegion {
    fn name(&self) -> &'static str {
        "need_extra_space_below_region"
    }

    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        Self::crowding(grid, request).is_some()
    }

    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>) {
        for _ in 0..EXTRA_SPACE_RETRIES {
            let Some((point_row, blocked, region)) = Self::crowding(grid, request) else {
                break;
            };
            let needed = point_row + STANDARD_GAME_HEIGHT + 1 - blocked;
            let count = needed + needed.rem_euclid(2);
            debug!(at_row = region.row_start, count, "inserting rows below source");
            grid.insert_rows(region.row_start, count);
        }
    }
}

/// Insert rows at the top so a game can grow up from a source near the top.
pub struct WantToGrowUpAtTopOfGrid;

impl WantToGrowUpAtTopOfGrid {
    fn needs_room(grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        let anchors = request.anchors(grid);
        let Some(point) = lone_source(&anchors) else {
            return false;
        };
        let height = anchors.default_height();
        let col = grid.placement_column(&anchors, &request.anchor);
        let down = RangeInfo::new(point.row_start, height, col, GAME_WIDTH);
        let up = RangeInfo::new(point.row_start - height + 1, height, col, GAME_WIDTH);
        !grid.has_room_above(point, height)
            && grid.left_feeder_collision(&down, &anchors).is_some()
            && grid.left_feeder_collision(&up, &anchors).is_none()
    }
}

impl GridAdjuster for WantToGrowUpAtTopOfGrid {
    fn name(&self) -> &'static str {
        "want_to_grow_up_at_top_of_grid"
    }

    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        Self::needs_room(grid, request)
    }

    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>) {
        for _ in 0..GROW_UP_RETRIES {
            if !Self::needs_room(grid, request) {
                break;
            }
            grid.insert_rows(grid.first_row(), GROW_UP_STEP);
        }
    }
}

// ---- two sources ----

/// Regions around the two placed sources, and the regions between them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceRegions {
    top: RangeInfo,
    bottom: RangeInfo,
    /// Ordered top to bottom.
    between: Vec<RangeInfo>,
}

impl SourceRegions {
    /// Only when both sources are placed, there is no placed target and the
    /// span between the sources cannot be placed as is.
    fn find(grid: &Grid, request: &AdjustRequest<'_>) -> Option<Self> {
        let anchors = request.anchors(grid);
        if anchors.championship || anchors.target.is_some() || anchors.both_sources().is_none() {
            return None;
        }
        if !request.placement_fails(grid) {
            return None;
        }

        let entry = request.topology.game(request.game)?;
        let mut boxes: ArrayVec<RangeInfo, 2> = entry
            .feeders()
            .filter_map(|(_, id)| grid.item_for_game(id))
            .map(GridItem::range)
            .collect();
        if boxes.len() != 2 {
            return None;
        }
        boxes.sort_by_key(|r| r.row_start);

        let first_col = grid.first_col();
        let width = boxes.iter().map(RangeInfo::col_end).max()? - first_col + 1;
        let region = |r: &RangeInfo| grid.independent_region_around(r.with_cols(first_col, width));
        let top = region(&boxes[0]);
        let bottom = region(&boxes[1]);
        if top.intersects(&bottom) {
            return None;
        }

        let mut between: Vec<RangeInfo> = Vec::new();
        let gap_rows = bottom.row_start - top.row_end() - 1;
        if gap_rows > 0 {
            let gap = RangeInfo::new(top.row_end() + 1, gap_rows, first_col, width);
            for idx in grid.items_in_band(&gap) {
                let r = region(&grid.item(idx).range());
                if !between.contains(&r) && !r.intersects(&top) && !r.intersects(&bottom) {
                    between.push(r);
                }
            }
        }
        between.sort_by_key(|r| r.row_start);
        Some(Self { top, bottom, between })
    }

    fn single_between(&self) -> Option<RangeInfo> {
        match self.between.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Move the one region between the sources above the upper source.
pub struct SwapGameRegionsForOverlap;

impl SwapGameRegionsForOverlap {
    fn pair(grid: &Grid, request: &AdjustRequest<'_>) -> Option<(RangeInfo, RangeInfo)> {
        let regions = SourceRegions::find(grid, request)?;
        let between = regions.single_between()?;
        RegionSwapper::can_regions_swap(grid, &regions.top, &between)
            .then_some((regions.top, between))
    }
}

impl GridAdjuster for SwapGameRegionsForOverlap {
    fn name(&self) -> &'static str {
        "swap_game_regions_for_overlap"
    }

    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        Self::pair(grid, request).is_some()
    }

    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>) {
        if let Some((top, bottom)) = Self::pair(grid, request) {
            RegionSwapper::swap_regions(grid, &top, &bottom);
        }
    }
}

/// Move the one region between the sources below the lower source.
pub struct SwapAdjacentGameRegionsForOverlap;

impl SwapAdjacentGameRegionsForOverlap {
    fn pair(grid: &Grid, request: &AdjustRequest<'_>) -> Option<(RangeInfo, RangeInfo)> {
        let regions = SourceRegions::find(grid, request)?;
        let between = regions.single_between()?;
        RegionSwapper::can_regions_swap(grid, &between, &regions.bottom)
            .then_some((between, regions.bottom))
    }
}

impl GridAdjuster for SwapAdjacentGameRegionsForOverlap {
    fn name(&self) -> &'static str {
        "swap_adjacent_game_regions_for_overlap"
    }

    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        Self::pair(grid, request).is_some()
    }

    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>) {
        if let Some((top, bottom)) = Self::pair(grid, request) {
            RegionSwapper::swap_regions(grid, &top, &bottom);
        }
    }
}

/// Swap the upper source's region with the lowest region between the
/// sources, bringing the upper source down next to the lower one.
pub struct RegionSwapperBottomGame;

impl RegionSwapperBottomGame {
    fn pair(grid: &Grid, request: &AdjustRequest<'_>) -> Option<(RangeInfo, RangeInfo)> {
        let regions = SourceRegions::find(grid, request)?;
        let last = *regions.between.last()?;
        RegionSwapper::are_ordered_and_independent(grid, &regions.top, &last)
            .then_some((regions.top, last))
    }
}

impl GridAdjuster for RegionSwapperBottomGame {
    fn name(&self) -> &'static str {
        "region_swapper_bottom_game"
    }

    fn does_adjuster_apply(&self, grid: &Grid, request: &AdjustRequest<'_>) -> bool {
        Self::pair(grid, request).is_some()
    }

    fn do_adjustment(&self, grid: &mut Grid, request: &AdjustRequest<'_>) {
        if let Some((top, bottom)) = Self::pair(grid, request) {
            RegionSwapper::swap_regions(grid, &top, &bottom);
        }
    }
}
