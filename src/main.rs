//! Bracket grid command line runner (default binary).
//!
//! Loads a stored diagram, runs one engine operation on it and prints the
//! outcome as JSON on stdout. Logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bracket_grid::adapter::{apply_changes, GridDocument, StoredItem, StoredRange};
use bracket_grid::core::{parse_game_id, ChangeKind, GridChange, GridRanker};
use bracket_grid::engine::{insert_game, GameMover, MoverConfig};
use bracket_grid::types::{GameId, RangeInfo};

#[derive(Parser, Debug)]
#[command(name = "bracket-grid", about = "Lay out and edit tournament bracket grids", version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Moves allowed in one search (overrides BRACKET_GRID_MOVE_BUDGET)
    #[arg(long, global = true)]
    move_budget: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move or resize a placed game and print the resulting changes
    Move {
        document: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        game: u32,
        /// Rows to shift the game by (negative moves up)
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        rows: i32,
        /// Columns to shift the game by
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        cols: i32,
        /// New height of the game box
        #[arg(long)]
        height: Option<i32>,
        /// Save the result back into the document
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Place a game that is not on the grid yet
    Insert {
        document: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        game: u32,
        #[arg(long)]
        row: i32,
        #[arg(long)]
        col: i32,
        /// Save the result back into the document
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Print the rank of the stored grid and its terms
    Rank { document: PathBuf },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut config = MoverConfig::from_env();
    if let Some(budget) = cli.move_budget {
        if budget == 0 {
            bail!("--move-budget must be at least 1");
        }
        config = config.with_move_budget(budget);
    }

    let output = run(cli.command, config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(command: Command, config: MoverConfig) -> Result<Value> {
    let output = match command {
        Command::Move {
            document,
            game,
            rows,
            cols,
            height,
            write,
        } => run_move(&document, parse_game_id(game)?, rows, cols, height, write, config)?,
        Command::Insert {
            document,
            game,
            row,
            col,
            write,
        } => run_insert(&document, parse_game_id(game)?, row, col, write)?,
        Command::Rank { document } => run_rank(&document)?,
    };
    Ok(output)
}

fn run_move(
    path: &Path,
    game: GameId,
    rows: i32,
    cols: i32,
    height: Option<i32>,
    write: bool,
    config: MoverConfig,
) -> Result<Value> {
    let mut document = GridDocument::load(path)?;
    let grid = document.to_grid()?;
    let topology = document.topology()?;

    let old = grid
        .item_for_game(game)
        .cloned()
        .ok_or_else(|| anyhow!("game {game} is not placed"))?;
    let r = old.range();
    let new = old.with_range(RangeInfo::new(
        r.row_start + rows,
        height.unwrap_or(r.row_count),
        r.col_start + cols,
        r.col_count,
    ));

    let result = GameMover::new(config)
        .move_game(&grid, &old, &new, &topology)
        .map_err(|e| anyhow!("{} ({})", e, e.code()))?;
    if let Some(warning) = &result.warning {
        warn!("{warning}");
    }
    let changes = result.changes(&grid);
    info!(game = %game, changes = changes.len(), rank = %result.rank, "move finished");

    if write {
        apply_changes(&mut document, &changes)?;
        document.save(path)?;
    }
    Ok(json!({
        "rank": result.rank.as_i32(),
        "warning": result.warning,
        "options_explored": result.options_explored,
        "changes": changes_json(&changes),
    }))
}

fn run_insert(path: &Path, game: GameId, row: i32, col: i32, write: bool) -> Result<Value> {
    let mut document = GridDocument::load(path)?;
    let grid = document.to_grid()?;
    let topology = document.topology()?;

    let outcome = insert_game(&grid, game, RangeInfo::point(row, col), &topology)
        .map_err(|e| anyhow!("{} ({})", e, e.code()))
        .with_context(|| format!("cannot insert game {game}"))?;
    let changes = grid.diff(&outcome.grid);
    if write {
        apply_changes(&mut document, &changes)?;
        document.save(path)?;
    }
    Ok(json!({
        "range": StoredRange::from(outcome.placement.range_game),
        "adjustments": outcome.adjustments,
        "changes": changes_json(&changes),
    }))
}

fn run_rank(path: &Path) -> Result<Value> {
    let document = GridDocument::load(path)?;
    let grid = document.to_grid()?;
    let topology = document.topology()?;

    let rank = GridRanker::rank(&grid, &topology);
    let terms = GridRanker::breakdown(&grid, &topology).map(|b| {
        json!({
            "disconnected_sources": b.disconnected_sources,
            "almost_adjacent_feeders": b.almost_adjacent_feeders,
            "too_close_same_column": b.too_close_same_column,
            "max_height": b.max_height,
            "sparsity": b.sparsity,
            "homogeneity": b.homogeneity,
            "odd_heights": b.odd_heights,
        })
    });
    Ok(json!({
        "rank": rank.as_i32(),
        "disqualified": GridRanker::disqualification(&grid),
        "terms": terms,
    }))
}

fn changes_json(changes: &[GridChange]) -> Vec<Value> {
    changes
        .iter()
        .map(|change| {
            let kind = match change.kind {
                ChangeKind::Insert => "insert",
                ChangeKind::Remove => "remove",
            };
            json!({ "kind": kind, "item": StoredItem::from_item(&change.item) })
        })
        .collect()
}
