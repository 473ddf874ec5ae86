//! Serde model of a stored diagram

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{parse_game_id, GameTopology, Grid, GridError, GridItem, Source, TopologyTable};
use crate::types::{GameId, RangeInfo};

/// A stored rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredRange {
    pub row: i32,
    pub rows: i32,
    pub col: i32,
    pub cols: i32,
}

impl From<RangeInfo> for StoredRange {
    fn from(r: RangeInfo) -> Self {
        Self {
            row: r.row_start,
            rows: r.row_count,
            col: r.col_start,
            cols: r.col_count,
        }
    }
}

impl From<StoredRange> for RangeInfo {
    fn from(r: StoredRange) -> Self {
        RangeInfo::new(r.row, r.rows, r.col, r.cols)
    }
}

/// One stored line or game box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredItem {
    pub range: StoredRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub swap_top_bottom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl StoredItem {
    pub fn from_item(item: &GridItem) -> Self {
        Self {
            range: item.range().into(),
            game_id: item.game_id().map(GameId::value),
            swap_top_bottom: item.swap_top_bottom(),
            start_time: item.start_time().map(str::to_owned),
            field: item.field().map(str::to_owned),
        }
    }

    pub fn to_item(&self) -> Result<GridItem, GridError> {
        let range = self.range.into();
        Ok(match self.game_id {
            Some(id) => GridItem::game(parse_game_id(id)?, range, self.swap_top_bottom)
                .with_schedule(self.start_time.clone(), self.field.clone()),
            None => GridItem::line(range),
        })
    }
}

/// Where a team comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredSource {
    Fixed(String),
    Winner(u32),
    Loser(u32),
}

impl StoredSource {
    fn referenced_game(&self) -> Option<u32> {
        match self {
            StoredSource::Fixed(_) => None,
            StoredSource::Winner(id) | StoredSource::Loser(id) => Some(*id),
        }
    }
}

impl From<&Source> for StoredSource {
    fn from(source: &Source) -> Self {
        match source {
            Source::Fixed(label) => StoredSource::Fixed(label.clone()),
            Source::Winner(id) => StoredSource::Winner(id.value()),
            Source::Loser(id) => StoredSource::Loser(id.value()),
        }
    }
}

impl TryFrom<&StoredSource> for Source {
    type Error = GridError;

    fn try_from(source: &StoredSource) -> Result<Self, GridError> {
        Ok(match source {
            StoredSource::Fixed(label) => Source::Fixed(label.clone()),
            StoredSource::Winner(id) => Source::Winner(parse_game_id(*id)?),
            StoredSource::Loser(id) => Source::Loser(parse_game_id(*id)?),
        })
    }
}

/// Stored topology entry of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTopology {
    pub top: StoredSource,
    pub bottom: StoredSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_target: Option<u32>,
}

/// A whole diagram: anchor, items and the bracket it draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDocument {
    pub first_pattern: StoredRange,
    #[serde(default)]
    pub items: Vec<StoredItem>,
    #[serde(default)]
    pub topology: Vec<StoredTopology>,
}

impl GridDocument {
    pub fn from_grid(grid: &Grid, topology: &TopologyTable) -> Self {
        Self {
            first_pattern: grid.first_pattern().into(),
            items: grid.items().iter().map(StoredItem::from_item).collect(),
            topology: topology
                .entries()
                .iter()
                .map(|entry| StoredTopology {
                    top: (&entry.top).into(),
                    bottom: (&entry.bottom).into(),
                    winner_target: entry.winner_target.map(GameId::value),
                })
                .collect(),
        }
    }

    /// Materialize the stored items, rejecting empty ranges and duplicate games.
    pub fn to_grid(&self) -> Result<Grid> {
        let items = self
            .items
            .iter()
            .map(StoredItem::to_item)
            .collect::<Result<Vec<_>, _>>()
            .context("stored items do not form a valid grid")?;
        let grid = Grid::try_from_items(self.first_pattern.into(), items)
            .context("stored items do not form a valid grid")?;
        Ok(grid)
    }

    /// Build the topology table, rejecting references to unknown games.
    pub fn topology(&self) -> Result<TopologyTable> {
        let count = self.topology.len() as u32;
        let mut entries = Vec::with_capacity(self.topology.len());
        for (n, entry) in self.topology.iter().enumerate() {
            let built = Self::topology_entry(entry, count)
                .with_context(|| format!("topology entry of game {}", n + 1))?;
            entries.push(built);
        }
        Ok(TopologyTable::new(entries))
    }

    fn topology_entry(entry: &StoredTopology, count: u32) -> Result<GameTopology, GridError> {
        let referenced = [
            entry.top.referenced_game(),
            entry.bottom.referenced_game(),
            entry.winner_target,
        ];
        for value in referenced.into_iter().flatten() {
            let id = parse_game_id(value)?;
            if value > count {
                return Err(GridError::UnknownGame { id });
            }
        }
        Ok(GameTopology::new(
            Source::try_from(&entry.top)?,
            Source::try_from(&entry.bottom)?,
            entry.winner_target.map(parse_game_id).transpose()?,
        ))
    }

    /// Replace the stored items with those of `grid`, keeping the topology.
    pub fn set_grid(&mut self, grid: &Grid) {
        self.first_pattern = grid.first_pattern().into();
        self.items = grid.items().iter().map(StoredItem::from_item).collect();
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse grid document")
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize grid document")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document =
            Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))?;
        debug!(path = %path.display(), items = document.items.len(), "loaded grid document");
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string_pretty()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), items = self.items.len(), "saved grid document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
        "items": [
            {"range": {"row": 13, "rows": 11, "col": 1, "cols": 3}, "game_id": 1, "start_time": "9:00", "field": "A"},
            {"range": {"row": 18, "rows": 1, "col": 4, "cols": 3}},
            {"range": {"row": 18, "rows": 3, "col": 7, "cols": 3}, "game_id": 2, "swap_top_bottom": true}
        ],
        "topology": [
            {"top": {"fixed": "Seed 1"}, "bottom": {"fixed": "Seed 2"}, "winner_target": 2},
            {"top": {"loser": 1}, "bottom": {"winner": 1}}
        ]
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let doc = GridDocument::from_json_str(SAMPLE).unwrap();
        let grid = doc.to_grid().unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.first_row(), 9);

        let first = grid.item_for_game(GameId::new(1)).unwrap();
        assert_eq!(first.start_time(), Some("9:00"));
        assert_eq!(first.field(), Some("A"));
        assert!(grid.item(1).is_line());
        assert!(grid.item_for_game(GameId::new(2)).unwrap().swap_top_bottom());

        let topology = doc.topology().unwrap();
        assert_eq!(topology.len(), 2);
        assert_eq!(topology.entries()[1].top, Source::Loser(GameId::new(1)));
        assert_eq!(topology.entries()[1].bottom, Source::Winner(GameId::new(1)));
    }

    #[test]
    fn test_document_survives_grid_round_trip() {
        let doc = GridDocument::from_json_str(SAMPLE).unwrap();
        let back = GridDocument::from_grid(&doc.to_grid().unwrap(), &doc.topology().unwrap());
        assert_eq!(back, doc);
    }

    #[test]
    fn test_sources_use_external_tags() {
        let json = serde_json::to_string(&StoredSource::Winner(3)).unwrap();
        assert_eq!(json, r#"{"winner":3}"#);
        let fixed: StoredSource = serde_json::from_str(r#"{"fixed":"Bye"}"#).unwrap();
        assert_eq!(fixed, StoredSource::Fixed("Bye".into()));
    }

    #[test]
    fn test_rejects_unknown_topology_reference() {
        let doc = GridDocument::from_json_str(
            r#"{"first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
                "topology": [{"top": {"winner": 7}, "bottom": {"fixed": "x"}}]}"#,
        )
        .unwrap();
        let err = doc.topology().unwrap_err();
        assert!(err.downcast_ref::<GridError>().is_some());
    }

    #[test]
    fn test_rejects_zero_game_ids() {
        let doc = GridDocument::from_json_str(
            r#"{"first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
                "items": [{"range": {"row": 13, "rows": 3, "col": 1, "cols": 3}, "game_id": 0}],
                "topology": [{"top": {"winner": 0}, "bottom": {"fixed": "x"}}]}"#,
        )
        .unwrap();

        let err = doc.to_grid().unwrap_err();
        assert_eq!(err.downcast_ref::<GridError>(), Some(&GridError::InvalidGameId { value: 0 }));
        let err = doc.topology().unwrap_err();
        assert_eq!(err.downcast_ref::<GridError>(), Some(&GridError::InvalidGameId { value: 0 }));
        assert!(format!("{err:#}").contains("topology entry of game 1"));
    }

    #[test]
    fn test_rejects_zero_winner_target() {
        let doc = GridDocument::from_json_str(
            r#"{"first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
                "topology": [{"top": {"fixed": "a"}, "bottom": {"fixed": "b"}, "winner_target": 0}]}"#,
        )
        .unwrap();
        let err = doc.topology().unwrap_err();
        assert_eq!(err.downcast_ref::<GridError>().map(GridError::code), Some("invalid_game_id"));
    }

    #[test]
    fn test_rejects_duplicate_games() {
        let doc = GridDocument::from_json_str(
            r#"{"first_pattern": {"row": 9, "rows": 1, "col": 1, "cols": 1},
                "items": [
                    {"range": {"row": 13, "rows": 3, "col": 1, "cols": 3}, "game_id": 1},
                    {"range": {"row": 19, "rows": 3, "col": 1, "cols": 3}, "game_id": 1}
                ]}"#,
        )
        .unwrap();
        let err = doc.to_grid().unwrap_err();
        assert_eq!(
            err.downcast_ref::<GridError>(),
            Some(&GridError::DuplicateGame { id: GameId::new(1) })
        );
    }
}
