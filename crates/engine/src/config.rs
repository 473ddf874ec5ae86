//! Search configuration

use std::env;

use tracing::debug;

pub const ENV_MOVE_BUDGET: &str = "BRACKET_GRID_MOVE_BUDGET";
pub const ENV_PUSH_BUFFER: &str = "BRACKET_GRID_PUSH_BUFFER";

/// Limits and spacing used by the move search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoverConfig {
    /// Moves allowed across all branches of one search.
    pub move_budget: usize,
    /// Blank rows PushAway keeps between a moved game and its neighbours.
    pub push_buffer_rows: i32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            move_budget: 250,
            push_buffer_rows: 2,
        }
    }
}

impl MoverConfig {
    /// Create from environment variables; bad values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let move_budget = get(ENV_MOVE_BUDGET)
            .and_then(|s| parse_logged(ENV_MOVE_BUDGET, &s))
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.move_budget);
        let push_buffer_rows = get(ENV_PUSH_BUFFER)
            .and_then(|s| parse_logged(ENV_PUSH_BUFFER, &s))
            .filter(|n: &i32| *n >= 0)
            .unwrap_or(defaults.push_buffer_rows);
        Self {
            move_budget,
            push_buffer_rows,
        }
    }

    pub fn with_move_budget(mut self, move_budget: usize) -> Self {
        self.move_budget = move_budget;
        self
    }
}

fn parse_logged<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        debug!(key, value, "ignoring unparsable setting");
    }
    parsed
}
