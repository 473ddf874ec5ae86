//! Property tests for diffing, sub-ranges and ranking

use proptest::prelude::*;

use bracket_grid::core::{GameTopology, Grid, GridItem, GridRanker, Source, TopologyTable};
use bracket_grid::engine::GameMover;
use bracket_grid::types::{GameId, RangeInfo, GAME_NUMBER_MIN_ROWS};

const ORIGIN: RangeInfo = RangeInfo::new(9, 1, 1, 1);

/// A column of games separated by blank rows; `(gap, height)` per game.
fn column_strategy() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((0i32..6, 3i32..24), 0..8)
}

fn column_grid(layout: &[(i32, i32)], col: i32) -> Grid {
    let mut row = ORIGIN.row_start;
    let items = layout
        .iter()
        .enumerate()
        .map(|(n, (gap, height))| {
            row += gap;
            let range = RangeInfo::new(row, *height, col, 3);
            let item = GridItem::game(GameId::new(n as u32 + 1), range, false);
            row += height;
            item
        })
        .collect();
    Grid::from_items(ORIGIN, items)
}

fn loose_topology(count: usize) -> TopologyTable {
    TopologyTable::new(
        (0..count)
            .map(|n| {
                GameTopology::new(
                    Source::Fixed("a".into()),
                    Source::Fixed("b".into()),
                    Some(GameId::new(count as u32 + n as u32 + 1)),
                )
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn diff_with_itself_is_empty(layout in column_strategy()) {
        let grid = column_grid(&layout, 1);
        prop_assert!(grid.diff(&grid.clone()).is_empty());
    }

    #[test]
    fn applying_diff_reaches_target(a in column_strategy(), b in column_strategy(), col in 0i32..3) {
        let from = column_grid(&a, 1);
        let to = column_grid(&b, 1 + 3 * col);
        let mut replayed = from.clone();
        replayed.apply_changes(&from.diff(&to)).unwrap();
        prop_assert!(replayed.diff(&to).is_empty());
        prop_assert_eq!(replayed.len(), to.len());
    }

    #[test]
    fn game_number_row_follows_height(
        rows in 1i32..40,
        d_top in -6i32..6,
        d_bottom in -6i32..6,
        shift in -4i32..4,
    ) {
        let item = GridItem::game(GameId::new(1), RangeInfo::new(20, rows, 4, 3), false);
        for candidate in [item.clone(), item.grown(d_top, d_bottom), item.shifted(shift, 0)] {
            let tall = candidate.range().row_count >= GAME_NUMBER_MIN_ROWS;
            prop_assert_eq!(candidate.game_number_range().is_some(), tall);
        }
    }

    #[test]
    fn move_result_is_qualified_and_ranked(
        layout in prop::collection::vec((0i32..6, 8i32..20), 1..6),
        pick in 0usize..6,
        d_rows in -6i32..7,
    ) {
        let grid = column_grid(&layout, 1);
        let topology = loose_topology(layout.len());
        let old = grid.item(pick % grid.len()).clone();
        let new = old.shifted(d_rows, 0);

        if let Ok(result) = GameMover::default().move_game(&grid, &old, &new, &topology) {
            prop_assert!(!result.rank.is_disqualified());
            prop_assert_eq!(GridRanker::rank(&result.grid, &topology), result.rank);
            prop_assert_eq!(result.grid.len(), grid.len());
        }
    }
}

#[test]
fn disqualified_never_wins() {
    let grid = column_grid(&[(0, 11), (0, 11)], 1);
    let mut broken = grid.clone();
    broken.replace_at(1, grid.item(1).shifted(-4, 0));

    let good = GridRanker::rank(&grid, &TopologyTable::default());
    let bad = GridRanker::rank(&broken, &TopologyTable::default());
    assert_eq!(bad.as_i32(), -1);
    assert!(good.is_better_than(bad));
    assert!(!bad.is_better_than(good));
}
