use criterion::{black_box, criterion_group, criterion_main, Criterion};
use bracket_grid::core::{GameTopology, Grid, GridItem, GridRanker, Source, TopologyTable};
use bracket_grid::engine::GameMover;
use bracket_grid::types::{GameId, RangeInfo};

const ORIGIN: RangeInfo = RangeInfo::new(9, 1, 1, 1);

/// A fully drawn 16-team bracket: 8 + 4 + 2 + 1 games, each round fed by the previous.
fn sixteen_team_bracket() -> (Grid, TopologyTable) {
    let mut entries = Vec::new();
    let mut items = Vec::new();
    let mut feeders: Vec<(GameId, i32)> = Vec::new();

    for n in 0..8 {
        let id = GameId::new(n + 1);
        let row = 13 + 14 * n as i32;
        let seed = || Source::Fixed("seed".into());
        entries.push(GameTopology::new(seed(), seed(), None));
        items.push(GridItem::game(id, RangeInfo::new(row, 11, 1, 3), false));
        feeders.push((id, row + 5));
    }

    let mut col = 4;
    while feeders.len() > 1 {
        let mut next = Vec::new();
        for pair in feeders.chunks(2) {
            let (top, top_row) = pair[0];
            let (bottom, bottom_row) = pair[1];
            let id = GameId::new(entries.len() as u32 + 1);
            entries[top.num().index()].winner_target = Some(id);
            entries[bottom.num().index()].winner_target = Some(id);
            entries.push(GameTopology::new(Source::Winner(top), Source::Winner(bottom), None));
            let rows = bottom_row - top_row + 1;
            items.push(GridItem::game(id, RangeInfo::new(top_row, rows, col, 3), false));
            next.push((id, top_row + rows / 2));
        }
        feeders = next;
        col += 3;
    }
    (Grid::from_items(ORIGIN, items), TopologyTable::new(entries))
}

fn bench_move_first_round(c: &mut Criterion) {
    let (grid, topology) = sixteen_team_bracket();
    let old = grid.item(0).clone();
    let new = old.shifted(2, 0);
    let mover = GameMover::default();

    c.bench_function("move_first_round_game", |b| {
        b.iter(|| mover.move_game(black_box(&grid), &old, &new, &topology))
    });
}

fn bench_placement(c: &mut Criterion) {
    let (mut grid, topology) = sixteen_team_bracket();
    let last = grid.len() - 1;
    let champion = grid.item(last).game_id().unwrap_or(GameId::new(15));
    grid.remove_at(last);

    c.bench_function("grid_game_from_constraints", |b| {
        b.iter(|| grid.grid_game_from_constraints(black_box(champion), ORIGIN, &topology))
    });
}

fn bench_rank(c: &mut Criterion) {
    let (grid, topology) = sixteen_team_bracket();

    c.bench_function("rank_full_bracket", |b| {
        b.iter(|| GridRanker::rank(black_box(&grid), &topology))
    });
}

criterion_group!(benches, bench_move_first_round, bench_placement, bench_rank);
criterion_main!(benches);
