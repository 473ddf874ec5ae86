//! Stored documents through the engine and back

use bracket_grid::adapter::{apply_changes, GridDocument};
use bracket_grid::core::GridRanker;
use bracket_grid::engine::{insert_game, GameMover};
use bracket_grid::types::{GameId, RangeInfo};

const BRACKET: &str = r#"{
    "first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
    "items": [
        {"range": {"row": 13, "rows": 11, "col": 1, "cols": 3}, "game_id": 1},
        {"range": {"row": 27, "rows": 11, "col": 1, "cols": 3}, "game_id": 2},
        {"range": {"row": 18, "rows": 15, "col": 4, "cols": 3}, "game_id": 3, "start_time": "10:30", "field": "North"}
    ],
    "topology": [
        {"top": {"fixed": "Seed 1"}, "bottom": {"fixed": "Seed 4"}, "winner_target": 3},
        {"top": {"fixed": "Seed 2"}, "bottom": {"fixed": "Seed 3"}, "winner_target": 3},
        {"top": {"winner": 1}, "bottom": {"winner": 2}, "winner_target": 4},
        {"top": {"winner": 3}, "bottom": {"loser": 3}}
    ]
}"#;

#[test]
fn move_changes_replay_into_the_document() {
    let mut document = GridDocument::from_json_str(BRACKET).unwrap();
    let grid = document.to_grid().unwrap();
    let topology = document.topology().unwrap();
    assert!(!GridRanker::rank(&grid, &topology).is_disqualified());

    let old = grid.item_for_game(GameId::new(2)).cloned().unwrap();
    let result = GameMover::default()
        .move_game(&grid, &old, &old.shifted(4, 0), &topology)
        .unwrap();

    apply_changes(&mut document, &result.changes(&grid)).unwrap();
    let stored = document.to_grid().unwrap();
    assert!(stored.diff(&result.grid).is_empty());

    let game_three = stored.item_for_game(GameId::new(3)).unwrap();
    assert_eq!(game_three.field(), Some("North"));
}

#[test]
fn insert_changes_replay_into_the_document() {
    let mut document = GridDocument::from_json_str(BRACKET).unwrap();
    let grid = document.to_grid().unwrap();
    let topology = document.topology().unwrap();

    let outcome = insert_game(&grid, GameId::new(4), RangeInfo::point(13, 7), &topology).unwrap();
    apply_changes(&mut document, &grid.diff(&outcome.grid)).unwrap();

    let stored = document.to_grid().unwrap();
    assert_eq!(stored.len(), 4);
    assert!(stored.diff(&outcome.grid).is_empty());
}

#[test]
fn document_survives_a_file_round_trip() {
    let document = GridDocument::from_json_str(BRACKET).unwrap();
    let path = std::env::temp_dir().join(format!("bracket-grid-doc-{}.json", std::process::id()));
    document.save(&path).unwrap();
    let loaded = GridDocument::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, document);
}

#[test]
fn set_grid_matches_replayed_changes() {
    let document = GridDocument::from_json_str(BRACKET).unwrap();
    let grid = document.to_grid().unwrap();
    let topology = document.topology().unwrap();
    let old = grid.item_for_game(GameId::new(1)).cloned().unwrap();
    let result = GameMover::default()
        .move_game(&grid, &old, &old.shifted(-2, 0), &topology)
        .unwrap();

    let mut replaced = document.clone();
    replaced.set_grid(&result.grid);
    let mut replayed = document;
    apply_changes(&mut replayed, &result.changes(&grid)).unwrap();

    assert!(replaced.to_grid().unwrap().diff(&replayed.to_grid().unwrap()).is_empty());
    assert_eq!(replaced.topology().unwrap(), topology);
}
