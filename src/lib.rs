//! Bracket grid (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof as
//! `bracket_grid::{types,core,engine,adapter}`; the implementation lives in
//! dedicated crates under `crates/`.

pub use bracket_grid_adapter as adapter;
pub use bracket_grid_core as core;
pub use bracket_grid_engine as engine;
pub use bracket_grid_types as types;
