//! Edit engine - moves and inserts that keep the bracket consistent
//!
//! Built on the pure grid model in `bracket-grid-core`. A move runs a
//! branching search over candidate grids and returns the best ranked one;
//! an insert rearranges the grid with the adjusters and then places the
//! game by its connection points.
//!
//! # Module Structure
//!
//! - [`mover`]: [`GameMover`] and the search context shared by the rules
//! - [`rules`]: the propagation pipeline run after every move
//! - [`option`]: one candidate grid in the search arena
//! - [`adjusters`]: grid rearrangements tried before an insert
//! - [`region_swapper`]: row swap of two independent regions
//! - [`insert`]: [`insert_game`]
//! - [`config`]: move budget and push spacing
//! - [`error`]: move and insert failures
//!
//! # Example
//!
//! ```
//! use bracket_grid_engine::core::{GameTopology, Grid, GridItem, Source, TopologyTable};
//! use bracket_grid_engine::types::{GameId, RangeInfo};
//! use bracket_grid_engine::{GameMover, MoverConfig};
//!
//! let topology = TopologyTable::new(vec![GameTopology::new(
//!     Source::Fixed("a".into()),
//!     Source::Fixed("b".into()),
//!     None,
//! )]);
//! let old = GridItem::game(GameId::new(1), RangeInfo::new(13, 3, 1, 3), false);
//! let grid = Grid::from_items(RangeInfo::new(9, 1, 1, 1), vec![old.clone()]);
//!
//! let result = GameMover::new(MoverConfig::default())
//!     .move_game(&grid, &old, &old.shifted(4, 0), &topology)
//!     .unwrap();
//! assert_eq!(result.grid.item(0).range(), RangeInfo::new(17, 3, 1, 3));
//! assert!(result.warning.is_none());
//! ```

pub mod adjusters;
pub mod config;
pub mod error;
pub mod insert;
pub mod mover;
pub mod option;
pub mod region_swapper;
pub mod rules;

pub use bracket_grid_core as core;
pub use bracket_grid_types as types;

pub use adjusters::{adjusters, run_adjusters, AdjustRequest, GridAdjuster};
pub use config::MoverConfig;
pub use error::{InsertError, MoveError};
pub use insert::{insert_game, InsertOutcome};
pub use mover::{structural_problem, GameMover, MoveResult, Search};
pub use option::{GridOption, OptionId};
pub use region_swapper::RegionSwapper;
pub use rules::{pipeline, MovedGame, PropagationRule};
