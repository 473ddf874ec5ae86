//! Candidate grids explored by a search

use std::collections::BTreeSet;

use crate::core::{Grid, Rank};
use crate::types::GameId;

/// Arena index of a [`GridOption`]; lower ids were created earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionId(pub usize);

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One candidate grid with its lineage state
#[derive(Debug, Clone)]
pub struct GridOption {
    pub id: OptionId,
    pub grid: Grid,
    /// Set once the option has been scored.
    pub rank: Option<Rank>,
    /// Games already moved in this lineage; they are never moved again.
    pub moved_games: BTreeSet<GameId>,
    pub name: String,
    /// Human-readable trail of what happened to this option.
    pub crumbs: Vec<String>,
    disqualified: bool,
}

impl GridOption {
    pub fn new(id: OptionId, grid: Grid, name: impl Into<String>) -> Self {
        Self {
            id,
            grid,
            rank: None,
            moved_games: BTreeSet::new(),
            name: name.into(),
            crumbs: Vec::new(),
            disqualified: false,
        }
    }

    /// Copy lineage state into a new option with a fresh id.
    pub fn fork(&self, id: OptionId, name: &str) -> Self {
        let mut option = self.clone();
        option.id = id;
        option.rank = None;
        option.name = format!("{} > {}", self.name, name);
        option
    }

    pub fn is_disqualified(&self) -> bool {
        self.disqualified
    }

    pub fn disqualify(&mut self, reason: impl Into<String>) {
        self.disqualified = true;
        self.rank = Some(Rank::Disqualified);
        self.crumbs.push(format!("disqualified: {}", reason.into()));
    }

    pub fn crumb(&mut self, crumb: impl Into<String>) {
        self.crumbs.push(crumb.into());
    }

    /// Rank used for selection; forced to disqualified once disqualified.
    pub fn effective_rank(&self) -> Rank {
        if self.disqualified {
            Rank::Disqualified
        } else {
            self.rank.unwrap_or(Rank::Disqualified)
        }
    }
}
