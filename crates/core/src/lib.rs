//! Core grid logic module - pure, deterministic, and testable
//!
//! This crate holds the bracket diagram model and every query the move and
//! insert searches are built on. It has **zero dependencies** on storage,
//! terminals or the clock; given the same grid and topology it always gives
//! the same answer.
//!
//! # Module Structure
//!
//! - [`grid_item`]: a connector line or a game box with its derived sub-ranges
//! - [`grid`]: the ordered item list, overlap/independence queries, connectivity and diff
//! - [`placement`]: geometry of a game that is not placed yet ([`GridGameInsert`])
//! - [`ranker`]: penalty score of a finished grid ([`GridRanker`])
//! - [`topology`]: read-only view of the bracket structure
//! - [`error`]: errors raised when materializing or editing a grid
//!
//! # Layout Rules
//!
//! - **Stride**: game boxes are 3 columns wide and sit on a 3-column stride from the pattern origin
//! - **Heights**: new games are 11 rows, championship games 3 rows
//! - **Game number**: boxes of 8 rows or more carry a game-number row
//! - **Feeds**: a winner leaves a box one row below its game-number row and
//!   arrives at the top-left or bottom-left cell of the next game
//!
//! # Example
//!
//! ```
//! use bracket_grid_core::{Grid, GridItem, GridRanker, Rank, TopologyTable};
//! use bracket_grid_types::{GameId, RangeInfo};
//!
//! let origin = RangeInfo::new(9, 1, 1, 1);
//! let grid = Grid::from_items(
//!     origin,
//!     vec![GridItem::game(GameId::new(1), RangeInfo::new(13, 11, 1, 3), false)],
//! );
//!
//! assert!(grid.diff(&grid.clone()).is_empty());
//! assert_eq!(GridRanker::rank(&grid, &TopologyTable::default()), Rank::Score(18));
//! ```

pub mod error;
pub mod grid;
pub mod grid_item;
pub mod placement;
pub mod ranker;
pub mod topology;

pub use bracket_grid_types as types;

// Re-export commonly used types for convenience
pub use error::{parse_game_id, GridError, Result};
pub use grid::{ChangeKind, Grid, GridChange};
pub use grid_item::{GridItem, ItemKind};
pub use placement::{GridGameInsert, PlacementAnchors};
pub use ranker::{GridRanker, Rank, RankBreakdown};
pub use topology::{GameTopology, Source, Topology, TopologyTable};
