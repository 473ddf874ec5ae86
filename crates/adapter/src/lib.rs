//! Adapter module - persistence of a bracket diagram as JSON
//!
//! The engine never touches storage. This crate is the collaborator that
//! turns a stored document into a [`Grid`](crate::core::Grid) plus a
//! [`TopologyTable`](crate::core::TopologyTable), and writes the engine's
//! answer back as a list of removals and insertions.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
//!   "items": [
//!     {"range": {"row": 13, "rows": 11, "col": 1, "cols": 3}, "game_id": 1},
//!     {"range": {"row": 18, "rows": 1, "col": 4, "cols": 3}}
//!   ],
//!   "topology": [
//!     {"top": {"fixed": "Seed 1"}, "bottom": {"fixed": "Seed 8"}, "winner_target": 2},
//!     {"top": {"winner": 1}, "bottom": {"loser": 1}}
//!   ]
//! }
//! ```
//!
//! - `items` without a `game_id` are connector lines
//! - `topology[n]` describes game `n + 1`
//! - a source is `{"fixed": label}`, `{"winner": game}` or `{"loser": game}`
//!
//! # Applying Changes
//!
//! [`apply_changes`] replays a [`GridChange`](crate::core::GridChange) list
//! against any [`GridStore`]: every removal first, then every insertion.

pub mod document;
pub mod store;

pub use bracket_grid_core as core;
pub use bracket_grid_types as types;

pub use document::{GridDocument, StoredItem, StoredRange, StoredSource, StoredTopology};
pub use store::{apply_changes, GridStore};
