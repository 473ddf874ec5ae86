//! Swap the row positions of two independent regions
//!
//! A region is independent when every item touching it lies inside it, so a
//! region can be moved as one block without cutting any item. Swapping only
//! rebases rows; columns never change.

use tracing::debug;

use crate::core::Grid;
use crate::types::RangeInfo;

/// Largest number of blank rows allowed between two swappable regions.
pub const MAX_SWAP_GAP: i32 = 1;

pub struct RegionSwapper;

impl RegionSwapper {
    /// Both regions independent, `top` above `bottom`, at most one blank row apart.
    pub fn can_regions_swap(grid: &Grid, top: &RangeInfo, bottom: &RangeInfo) -> bool {
        let gap = bottom.row_start - top.row_end() - 1;
        Self::are_ordered_and_independent(grid, top, bottom) && (0..=MAX_SWAP_GAP).contains(&gap)
    }

    /// Both regions independent and `top` strictly above `bottom`.
    pub fn are_ordered_and_independent(grid: &Grid, top: &RangeInfo, bottom: &RangeInfo) -> bool {
        top.row_end() < bottom.row_start
            && grid.is_range_independent(top)
            && grid.is_range_independent(bottom)
    }

    /// Exchange the rows of `top` and `bottom`.
    ///
    /// Items in `bottom` move up to start at `top.row_start`; items in `top`
    /// move down to end at `bottom.row_end()`. Items strictly between the
    /// two, within the combined column band, shift by the height difference.
    pub fn swap_regions(grid: &mut Grid, top: &RangeInfo, bottom: &RangeInfo) {
        let top_height = top.row_count;
        let bottom_height = bottom.row_count;
        let band = top.union(bottom);
        let to_bottom = bottom.row_end() - top_height + 1 - top.row_start;
        let to_top = top.row_start - bottom.row_start;
        let between = bottom_height - top_height;

        for idx in 0..grid.len() {
            let r = grid.item(idx).range();
            let d_rows = if top.contains(&r) {
                to_bottom
            } else if bottom.contains(&r) {
                to_top
            } else if r.row_start > top.row_end()
                && r.row_end() < bottom.row_start
                && r.col_start <= band.col_end()
                && band.col_start <= r.col_end()
            {
                between
            } else {
                0
            };
            if d_rows != 0 {
                grid.update_at(idx, |item| item.shift(d_rows, 0));
            }
        }
        debug!(top = %top, bottom = %bottom, "swapped regions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridItem;
    use crate::types::GameId;

    const ORIGIN: RangeInfo = RangeInfo::new(9, 1, 1, 1);

    fn game(n: u32, row: i32, rows: i32) -> GridItem {
        GridItem::game(GameId::new(n), RangeInfo::new(row, rows, 1, 3), false)
    }

    fn rows_of(grid: &Grid, n: u32) -> (i32, i32) {
        let r = grid.item_for_game(GameId::new(n)).unwrap().range();
        (r.row_start, r.row_end())
    }

    #[test]
    fn test_can_swap_needs_independent_adjacent_regions() {
        let grid =
            Grid::from_items(ORIGIN, vec![game(1, 13, 11), game(2, 25, 11), game(3, 40, 11)]);
        let a = RangeInfo::new(13, 11, 1, 3);
        let b = RangeInfo::new(25, 11, 1, 3);
        let c = RangeInfo::new(40, 11, 1, 3);
        assert!(RegionSwapper::can_regions_swap(&grid, &a, &b));
        assert!(!RegionSwapper::can_regions_swap(&grid, &b, &a));
        assert!(!RegionSwapper::can_regions_swap(&grid, &b, &c));
        // Cutting through game 2 is not independent.
        assert!(!RegionSwapper::can_regions_swap(&grid, &a, &RangeInfo::new(25, 5, 1, 3)));
    }

    #[test]
    fn test_swap_equal_regions() {
        let mut grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11), game(2, 25, 11)]);
        let (top, bottom) = (RangeInfo::new(13, 11, 1, 3), RangeInfo::new(25, 11, 1, 3));
        RegionSwapper::swap_regions(&mut grid, &top, &bottom);
        assert_eq!(rows_of(&grid, 1), (25, 35));
        assert_eq!(rows_of(&grid, 2), (13, 23));
    }

    #[test]
    fn test_swap_unequal_regions_shifts_items_between() {
        let mut grid = Grid::from_items(
            ORIGIN,
            vec![
                game(1, 13, 3),
                GridItem::line(RangeInfo::new(17, 1, 1, 3)),
                game(2, 19, 11),
                game(3, 40, 11),
            ],
        );
        let (top, bottom) = (RangeInfo::new(13, 3, 1, 3), RangeInfo::new(19, 11, 1, 3));
        RegionSwapper::swap_regions(&mut grid, &top, &bottom);
        assert_eq!(rows_of(&grid, 2), (13, 23));
        assert_eq!(grid.item(1).range().row_start, 25);
        assert_eq!(rows_of(&grid, 1), (27, 29));
        assert_eq!(rows_of(&grid, 3), (40, 50));
    }
}
