//! Ranker module - scores a finished grid, lower is better
//!
//! A grid that breaks the layout conventions (items above or left of the
//! pattern origin, empty extents, overlapping items) is disqualified. Every
//! other grid gets a penalty score built from the terms of [`RankBreakdown`].

use std::collections::BTreeMap;

use tracing::trace;

use crate::grid::Grid;
use crate::topology::Topology;
use crate::types::{RangeInfo, Slot};

/// Score of a candidate grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Disqualified,
    Score(i32),
}

impl Rank {
    /// Numeric form; disqualified grids are `-1`.
    pub fn as_i32(self) -> i32 {
        match self {
            Rank::Disqualified => -1,
            Rank::Score(score) => score,
        }
    }

    pub fn is_disqualified(self) -> bool {
        matches!(self, Rank::Disqualified)
    }

    /// Strictly better: a lower score, and never a disqualified rank.
    pub fn is_better_than(self, other: Rank) -> bool {
        match (self, other) {
            (Rank::Disqualified, _) => false,
            (Rank::Score(_), Rank::Disqualified) => true,
            (Rank::Score(a), Rank::Score(b)) => a < b,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Disqualified => write!(f, "disqualified"),
            Rank::Score(score) => write!(f, "{score}"),
        }
    }
}

/// Individual penalty terms of a qualified grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RankBreakdown {
    /// Placed winner sources not geometrically connected to their slot.
    pub disconnected_sources: i32,
    /// Unfed sides with a foreign feed ending one row away.
    pub almost_adjacent_feeders: i32,
    /// Unfed sides with no blank row before the next item in the column.
    pub too_close_same_column: i32,
    pub max_height: i32,
    pub sparsity: i32,
    pub homogeneity: f64,
    /// Games whose height is not 3 mod 4.
    pub odd_heights: i32,
}

impl RankBreakdown {
    /// Combined score.
    ///
    /// The odd-height term is folded in with a bitwise OR rather than added;
    /// existing layouts were scored this way so it stays.
    pub fn total(&self) -> i32 {
        let weighted = f64::from(
            self.disconnected_sources * 100
                + self.almost_adjacent_feeders * 50
                + self.too_close_same_column * 25,
        ) + f64::from(self.max_height) * 1.25
            + f64::from(self.sparsity)
            + self.homogeneity;
        (weighted as i32) | self.odd_heights
    }
}

/// Scores grids produced by the move and insert searches
#[derive(Debug, Clone, Copy, Default)]
pub struct GridRanker;

impl GridRanker {
    pub fn rank(grid: &Grid, topology: &dyn Topology) -> Rank {
        match Self::breakdown(grid, topology) {
            Some(breakdown) => {
                let score = breakdown.total();
                trace!(?breakdown, score, "ranked grid");
                Rank::Score(score)
            }
            None => Rank::Disqualified,
        }
    }

    /// Penalty terms, or `None` for a disqualified grid.
    pub fn breakdown(grid: &Grid, topology: &dyn Topology) -> Option<RankBreakdown> {
        if let Some(reason) = Self::disqualification(grid) {
            trace!(reason = %reason, "grid disqualified");
            return None;
        }

        let mut breakdown = RankBreakdown::default();
        for (idx, item) in grid.items().iter().enumerate() {
            let Some(id) = item.game_id() else {
                continue;
            };
            if item.height() % 4 != 3 {
                breakdown.odd_heights += 1;
            }
            for slot in Slot::BOTH {
                if grid.is_source_connected(idx, slot, topology) == Some(false) {
                    breakdown.disconnected_sources += 1;
                }
            }
            for side in Slot::BOTH {
                if grid.is_side_fed(idx, side) {
                    continue;
                }
                if Self::has_almost_adjacent_feeder(grid, idx, side) {
                    breakdown.almost_adjacent_feeders += 1;
                }
                if Self::is_too_close(grid, idx, side) {
                    breakdown.too_close_same_column += 1;
                }
            }
            trace!(game = %id, "scored game");
        }

        if let Some(extent) = grid.extent() {
            breakdown.max_height = extent.row_end() - grid.first_row() + 1;
            let occupied: i64 = grid.items().iter().map(|i| i.range().area()).sum();
            let bbox = extent.area();
            if bbox > 0 {
                breakdown.sparsity = 100 - (occupied * 100 / bbox).min(100) as i32;
            }
        }
        breakdown.homogeneity = Self::homogeneity(grid);
        Some(breakdown)
    }

    /// Why a grid cannot be ranked, if it cannot.
    pub fn disqualification(grid: &Grid) -> Option<String> {
        let items = grid.items();
        for (i, item) in items.iter().enumerate() {
            let r = item.range();
            if r.row_start < grid.first_row() || r.col_start < grid.first_col() {
                return Some(format!("{item} starts outside the pattern origin"));
            }
            if r.row_count <= 0 || r.col_count <= 0 {
                return Some(format!("{item} has an empty extent"));
            }
            if let Some(other) = items[i + 1..].iter().find(|o| o.range().intersects(&r)) {
                return Some(format!("{item} overlaps {other}"));
            }
        }
        None
    }

    fn has_almost_adjacent_feeder(grid: &Grid, idx: usize, side: Slot) -> bool {
        let point = grid.item(idx).incoming_point(side);
        (0..grid.len()).any(|other| {
            if other == idx || !grid.item(other).is_game() {
                return false;
            }
            let end = grid.feeder_end_point(other);
            end.col_start == point.col_start && (end.row_start - point.row_start).abs() == 1
        })
    }

    fn is_too_close(grid: &Grid, idx: usize, side: Slot) -> bool {
        let r = grid.item(idx).range();
        let row = match side {
            Slot::Top => r.row_start - 1,
            Slot::Bottom => r.row_end() + 1,
        };
        let row_band = RangeInfo::new(row, 1, r.col_start, r.col_count);
        grid.get_first_overlapping_item(&row_band).is_some()
    }

    /// Penalty for a column mixing exactly two game heights.
    fn homogeneity(grid: &Grid) -> f64 {
        let mut columns: BTreeMap<i32, BTreeMap<i32, i32>> = BTreeMap::new();
        for game in grid.games() {
            *columns
                .entry(game.range().col_start)
                .or_default()
                .entry(game.height())
                .or_default() += 1;
        }
        columns
            .values()
            .filter(|heights| heights.len() == 2)
            .map(|heights| {
                let counts: Vec<i32> = heights.values().copied().collect();
                let (a, b) = (counts[0], counts[1]);
                20.0 * f64::from((a - b).abs() + 1) / f64::from(a + b)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_item::GridItem;
    use crate::topology::{GameTopology, Source, TopologyTable};
    use crate::types::GameId;

    const ORIGIN: RangeInfo = RangeInfo::new(9, 1, 1, 1);

    fn game(id: u32, row: i32, rows: i32, col: i32) -> GridItem {
        GridItem::game(GameId::new(id), RangeInfo::new(row, rows, col, 3), false)
    }

    fn pair_topology() -> TopologyTable {
        let g3 = Some(GameId::new(3));
        TopologyTable::new(vec![
            GameTopology::new(Source::Fixed("a".into()), Source::Fixed("b".into()), g3),
            GameTopology::new(Source::Fixed("c".into()), Source::Fixed("d".into()), g3),
            GameTopology::new(Source::Winner(GameId::new(1)), Source::Winner(GameId::new(2)), None),
        ])
    }

    #[test]
    fn test_single_game_score() {
        let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11, 1)]);
        let rank = GridRanker::rank(&grid, &TopologyTable::default());
        // 15 rows from the origin at 1.25 each; nothing else applies.
        assert_eq!(rank, Rank::Score(18));
    }

    #[test]
    fn test_odd_height_is_or_combined() {
        let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 13, 1)]);
        let breakdown = GridRanker::breakdown(&grid, &TopologyTable::default()).unwrap();
        assert_eq!(breakdown.odd_heights, 1);
        assert_eq!(breakdown.max_height, 17);
        // 21.25 truncates to 21, which already has the low bit set.
        assert_eq!(breakdown.total(), 21);
    }

    #[test]
    fn test_overlap_disqualifies() {
        let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11, 1), game(2, 20, 11, 1)]);
        let rank = GridRanker::rank(&grid, &TopologyTable::default());
        assert_eq!(rank, Rank::Disqualified);
        assert_eq!(rank.as_i32(), -1);
        assert!(GridRanker::disqualification(&grid).unwrap().contains("overlaps game 2"));
    }

    #[test]
    fn test_item_above_origin_disqualifies() {
        let grid = Grid::from_items(ORIGIN, vec![game(1, 5, 11, 1)]);
        assert!(GridRanker::rank(&grid, &TopologyTable::default()).is_disqualified());
    }

    #[test]
    fn test_disconnected_sources_are_counted() {
        let topology = pair_topology();
        let connected = Grid::from_items(
            ORIGIN,
            vec![game(1, 13, 11, 1), game(2, 27, 11, 1), game(3, 18, 15, 4)],
        );
        let b = GridRanker::breakdown(&connected, &topology).unwrap();
        assert_eq!(b.disconnected_sources, 0);

        let loose = Grid::from_items(
            ORIGIN,
            vec![game(1, 13, 11, 1), game(2, 27, 11, 1), game(3, 19, 15, 4)],
        );
        let b = GridRanker::breakdown(&loose, &topology).unwrap();
        assert_eq!(b.disconnected_sources, 2);
        // Both feeds now end one row above the unfed sides.
        assert_eq!(b.almost_adjacent_feeders, 2);
        let loose_rank = GridRanker::rank(&loose, &topology);
        assert!(GridRanker::rank(&connected, &topology).is_better_than(loose_rank));
    }

    #[test]
    fn test_too_close_same_column() {
        let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11, 1), game(2, 24, 11, 1)]);
        let b = GridRanker::breakdown(&grid, &TopologyTable::default()).unwrap();
        assert_eq!(b.too_close_same_column, 2);
    }

    #[test]
    fn test_homogeneity_penalty() {
        let grid = Grid::from_items(
            ORIGIN,
            vec![game(1, 13, 11, 1), game(2, 27, 11, 1), game(3, 41, 3, 1)],
        );
        let b = GridRanker::breakdown(&grid, &TopologyTable::default()).unwrap();
        assert!((b.homogeneity - 40.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_disqualified_is_never_better() {
        assert!(Rank::Score(500).is_better_than(Rank::Disqualified));
        assert!(!Rank::Disqualified.is_better_than(Rank::Score(0)));
        assert!(!Rank::Score(3).is_better_than(Rank::Score(3)));
    }
}
