//! Move search scenarios run through the facade crate

use bracket_grid::core::{
    ChangeKind, GameTopology, Grid, GridItem, GridRanker, Source, TopologyTable,
};
use bracket_grid::engine::{GameMover, MoveError, MoverConfig};
use bracket_grid::types::{GameId, RangeInfo, Slot};

const ORIGIN: RangeInfo = RangeInfo::new(9, 1, 1, 1);

fn id(n: u32) -> GameId {
    GameId::new(n)
}

fn game(n: u32, row: i32, rows: i32, col: i32) -> GridItem {
    GridItem::game(id(n), RangeInfo::new(row, rows, col, 3), false)
}

fn range_of(grid: &Grid, n: u32) -> Option<RangeInfo> {
    grid.item_for_game(id(n)).map(GridItem::range)
}

fn seeded(target: u32) -> GameTopology {
    GameTopology::new(Source::Fixed("seed".into()), Source::Fixed("seed".into()), Some(id(target)))
}

fn fed(top: u32, bottom: u32, target: Option<u32>) -> GameTopology {
    GameTopology::new(Source::Winner(id(top)), Source::Winner(id(bottom)), target.map(id))
}

/// Four first-round games in columns 1-3 and two second-round games in columns 4-6.
fn two_rounds() -> (Grid, TopologyTable) {
    let topology = TopologyTable::new(vec![
        seeded(5),
        seeded(5),
        seeded(6),
        seeded(6),
        fed(1, 2, Some(7)),
        fed(3, 4, Some(7)),
        fed(5, 6, None),
    ]);
    let grid = Grid::from_items(
        ORIGIN,
        vec![
            game(1, 13, 11, 1),
            game(2, 27, 11, 1),
            game(3, 41, 11, 1),
            game(4, 55, 11, 1),
            game(5, 9, 11, 4),
            game(6, 67, 11, 4),
        ],
    );
    (grid, topology)
}

#[test]
fn moving_a_loose_game_down_leaves_everything_else() {
    let (grid, topology) = two_rounds();
    let old = grid.item_for_game(id(6)).cloned().unwrap();
    let new = old.shifted(4, 0);

    let result = GameMover::default().move_game(&grid, &old, &new, &topology).unwrap();
    assert!(result.warning.is_none());
    assert_eq!(
        result.grid.item_for_game(id(6)).map(GridItem::range),
        Some(RangeInfo::new(71, 11, 4, 3))
    );

    let changes = result.changes(&grid);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].kind, ChangeKind::Remove);
    assert_eq!(changes[0].item, old);
    assert_eq!(changes[1].kind, ChangeKind::Insert);
    assert_eq!(changes[1].item, new);
}

#[test]
fn moving_a_source_drags_the_fed_game() {
    let topology = TopologyTable::new(vec![
        seeded(2),
        GameTopology::new(Source::Winner(id(1)), Source::Fixed("seed".into()), Some(id(3))),
        GameTopology::new(Source::Winner(id(2)), Source::Fixed("seed".into()), None),
    ]);
    let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11, 1), game(2, 18, 11, 4)]);
    let old = grid.item(0).clone();

    let result = GameMover::default()
        .move_game(&grid, &old, &old.shifted(4, 0), &topology)
        .unwrap();
    let fed_idx = result.grid.index_of_game(id(2)).unwrap();
    assert_eq!(result.grid.item(fed_idx).range(), RangeInfo::new(22, 11, 4, 3));
    assert_eq!(result.grid.is_source_connected(fed_idx, Slot::Top, &topology), Some(true));

    // The undragged root is still a candidate, but a disconnected feed costs more.
    let mut root = grid.clone();
    root.replace_at(0, old.shifted(4, 0));
    assert!(result.rank.is_better_than(GridRanker::rank(&root, &topology)));
}

/// A clean 4-team bracket: games 1-4 feed 5 and 6, which feed the final.
fn four_teams() -> (Grid, TopologyTable) {
    let topology = TopologyTable::new(vec![
        seeded(5),
        seeded(5),
        seeded(6),
        seeded(6),
        fed(1, 2, Some(7)),
        fed(3, 4, Some(7)),
        fed(5, 6, None),
    ]);
    let grid = Grid::from_items(
        ORIGIN,
        vec![
            game(1, 13, 11, 1),
            game(2, 27, 11, 1),
            game(3, 41, 11, 1),
            game(4, 55, 11, 1),
            game(5, 18, 15, 4),
            game(6, 46, 15, 4),
            game(7, 25, 29, 7),
        ],
    );
    (grid, topology)
}

#[test]
fn moving_a_semifinal_keeps_both_of_its_feeders_attached() {
    let (grid, topology) = four_teams();
    assert_eq!(GridRanker::breakdown(&grid, &topology).unwrap().disconnected_sources, 0);
    let old = grid.item_for_game(id(6)).cloned().unwrap();

    // Dragging game 3 pushes game 4, which must still end up on game 6's bottom slot.
    let result = GameMover::default()
        .move_game(&grid, &old, &old.shifted(4, 0), &topology)
        .unwrap();
    assert!(result.warning.is_none());
    let placed = &result.grid;
    assert_eq!(range_of(placed, 6), Some(RangeInfo::new(50, 15, 4, 3)));
    assert_eq!(range_of(placed, 3), Some(RangeInfo::new(45, 11, 1, 3)));
    assert_eq!(range_of(placed, 4), Some(RangeInfo::new(59, 11, 1, 3)));
    for n in [5, 6, 7] {
        let idx = placed.index_of_game(id(n)).unwrap();
        for slot in Slot::BOTH {
            let connected = placed.is_source_connected(idx, slot, &topology);
            assert_eq!(connected, Some(true), "game {n} {slot:?}");
        }
    }
    assert_eq!(GridRanker::breakdown(placed, &topology).unwrap().disconnected_sources, 0);
}

#[test]
fn undersized_box_is_rejected_before_searching() {
    let (grid, topology) = two_rounds();
    let old = grid.item_for_game(id(6)).cloned().unwrap();
    let new = old.with_range(RangeInfo::new(67, 5, 4, 3));
    let err = GameMover::default().move_game(&grid, &old, &new, &topology).unwrap_err();
    assert!(matches!(err, MoveError::ImpossibleBox { .. }));
}

#[test]
fn exhausted_budget_still_returns_a_grid() {
    let topology = TopologyTable::new(vec![
        seeded(2),
        GameTopology::new(Source::Winner(id(1)), Source::Fixed("seed".into()), Some(id(3))),
        GameTopology::new(Source::Winner(id(2)), Source::Fixed("seed".into()), None),
    ]);
    let grid = Grid::from_items(ORIGIN, vec![game(1, 13, 11, 1), game(2, 18, 11, 4)]);
    let old = grid.item(0).clone();

    let mover = GameMover::new(MoverConfig::default().with_move_budget(1));
    let result = mover.move_game(&grid, &old, &old.shifted(4, 0), &topology).unwrap();
    assert!(result.warning.is_some());
    assert_eq!(result.grid.item(0).range(), RangeInfo::new(17, 11, 1, 3));
    assert!(!result.rank.is_disqualified());
}
