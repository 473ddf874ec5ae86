//! Grid item module - one placed entity on the bracket grid
//!
//! An item is either a connector *line* (no identity) or a *game* box. A game
//! carries derived sub-ranges (team rows, game-number row) that are kept in
//! sync with the box by every mutator.
//!
//! Game box layout for a box at `(r, h, c, 3)`:
//!
//! ```text
//!   col:   c      c+1    c+2  | c+3
//!   r      top team           |
//!   ...                       |
//!   r+h/2-1       game #      |
//!   r+h/2                     | <- outgoing feeder point
//!   ...                       |
//!   r+h-1  bottom team        |
//! ```

use crate::types::{GameId, RangeInfo, Slot, GAME_NUMBER_MIN_ROWS};

/// Game-specific data of a grid item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameParts {
    id: GameId,
    top_team_range: Option<RangeInfo>,
    bottom_team_range: Option<RangeInfo>,
    game_number_range: Option<RangeInfo>,
    swap_top_bottom: bool,
    start_time: Option<String>,
    field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Line,
    Game(GameParts),
}

/// A placed line or game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    range: RangeInfo,
    kind: ItemKind,
}

impl GridItem {
    /// Create an identity-less connector line
    pub fn line(range: RangeInfo) -> Self {
        Self {
            range,
            kind: ItemKind::Line,
        }
    }

    /// Create a game box with its sub-ranges attached
    pub fn game(id: GameId, range: RangeInfo, swap_top_bottom: bool) -> Self {
        let mut item = Self {
            range,
            kind: ItemKind::Game(GameParts {
                id,
                top_team_range: None,
                bottom_team_range: None,
                game_number_range: None,
                swap_top_bottom,
                start_time: None,
                field: None,
            }),
        };
        item.sync_parts();
        item
    }

    /// Attach schedule metadata (builder style)
    pub fn with_schedule(mut self, start_time: Option<String>, field: Option<String>) -> Self {
        if let ItemKind::Game(parts) = &mut self.kind {
            parts.start_time = start_time;
            parts.field = field;
        }
        self
    }

    pub fn range(&self) -> RangeInfo {
        self.range
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, ItemKind::Line)
    }

    pub fn is_game(&self) -> bool {
        !self.is_line()
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.parts().map(|p| p.id)
    }

    fn parts(&self) -> Option<&GameParts> {
        match &self.kind {
            ItemKind::Game(parts) => Some(parts),
            ItemKind::Line => None,
        }
    }

    pub fn height(&self) -> i32 {
        self.range.row_count
    }

    pub fn top_team_range(&self) -> Option<RangeInfo> {
        self.parts().and_then(|p| p.top_team_range)
    }

    pub fn bottom_team_range(&self) -> Option<RangeInfo> {
        self.parts().and_then(|p| p.bottom_team_range)
    }

    pub fn game_number_range(&self) -> Option<RangeInfo> {
        self.parts().and_then(|p| p.game_number_range)
    }

    pub fn swap_top_bottom(&self) -> bool {
        self.parts().map(|p| p.swap_top_bottom).unwrap_or(false)
    }

    pub fn start_time(&self) -> Option<&str> {
        self.parts().and_then(|p| p.start_time.as_deref())
    }

    pub fn field(&self) -> Option<&str> {
        self.parts().and_then(|p| p.field.as_deref())
    }

    pub fn set_swap_top_bottom(&mut self, swap: bool) {
        if let ItemKind::Game(parts) = &mut self.kind {
            parts.swap_top_bottom = swap;
        }
    }

    pub fn toggle_swap_top_bottom(&mut self) {
        let swap = self.swap_top_bottom();
        self.set_swap_top_bottom(!swap);
    }

    /// Where the winner leaves the box: one row below and two columns right
    /// of the game-number cell. Short boxes use their middle row.
    pub fn outgoing_feeder_point(&self) -> RangeInfo {
        match self.game_number_range() {
            Some(num) => RangeInfo::point(num.row_start + 1, num.col_start + 2),
            None => RangeInfo::point(
                self.range.row_start + self.range.row_count / 2,
                self.range.col_start + self.range.col_count,
            ),
        }
    }

    /// Point past the right end of a line (where the line delivers its feed).
    pub fn line_end_point(&self) -> RangeInfo {
        RangeInfo::point(self.range.row_start, self.range.col_start + self.range.col_count)
    }

    /// Incoming connection point of the visual side `side`
    pub fn incoming_point(&self, side: Slot) -> RangeInfo {
        match side {
            Slot::Top => self.range.top_left(),
            Slot::Bottom => self.range.bottom_left(),
        }
    }

    /// Visual side the source descriptor `slot` is drawn on.
    pub fn side_of(&self, slot: Slot) -> Slot {
        if self.swap_top_bottom() {
            slot.opposite()
        } else {
            slot
        }
    }

    /// Same range, identity and slot assignment.
    pub fn same_placement(&self, other: &GridItem) -> bool {
        self.range == other.range
            && self.game_id() == other.game_id()
            && self.swap_top_bottom() == other.swap_top_bottom()
    }

    // ---- mutators; each keeps the sub-ranges consistent ----

    pub fn shift(&mut self, d_rows: i32, d_cols: i32) {
        self.range = self.range.offset(d_rows, d_cols);
        self.sync_parts();
    }

    pub fn shifted(&self, d_rows: i32, d_cols: i32) -> GridItem {
        let mut item = self.clone();
        item.shift(d_rows, d_cols);
        item
    }

    /// Move the top edge by `d_top` rows and the bottom edge by `d_bottom` rows.
    pub fn grow(&mut self, d_top: i32, d_bottom: i32) {
        self.range = self.range.grow_rows(d_top, d_bottom);
        self.sync_parts();
    }

    pub fn grown(&self, d_top: i32, d_bottom: i32) -> GridItem {
        let mut item = self.clone();
        item.grow(d_top, d_bottom);
        item
    }

    /// Shrink is a negative grow; kept for readability at call sites.
    pub fn shrink(&mut self, rows_top: i32, rows_bottom: i32) {
        self.grow(rows_top, -rows_bottom);
    }

    pub fn rebase_rows(&mut self, from_row: i32, to_row: i32) {
        self.range = self.range.rebase_rows(from_row, to_row);
        self.sync_parts();
    }

    pub fn set_range(&mut self, range: RangeInfo) {
        self.range = range;
        self.sync_parts();
    }

    pub fn with_range(&self, range: RangeInfo) -> GridItem {
        let mut item = self.clone();
        item.set_range(range);
        item
    }

    fn sync_parts(&mut self) {
        let range = self.range;
        if let ItemKind::Game(parts) = &mut self.kind {
            let team_cols = (range.col_count - 1).max(1);
            parts.top_team_range = (range.row_count > 0)
                .then(|| RangeInfo::new(range.row_start, 1, range.col_start, team_cols));
            parts.bottom_team_range = (range.row_count > 1)
                .then(|| RangeInfo::new(range.row_end(), 1, range.col_start, team_cols));
            parts.game_number_range = (range.row_count >= GAME_NUMBER_MIN_ROWS).then(|| {
                RangeInfo::new(
                    range.row_start + range.row_count / 2 - 1,
                    1,
                    range.col_start + range.col_count - 2,
                    1,
                )
            });
        }
    }
}

impl std::fmt::Display for GridItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.game_id() {
            Some(id) => write!(f, "game {} at {}", id, self.range),
            None => write!(f, "line at {}", self.range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(row: i32, rows: i32) -> GridItem {
        GridItem::game(GameId::new(1), RangeInfo::new(row, rows, 4, 3), false)
    }

    #[test]
    fn test_line_has_no_identity() {
        let line = GridItem::line(RangeInfo::new(18, 1, 4, 6));
        assert!(line.is_line());
        assert_eq!(line.game_id(), None);
        assert_eq!(line.top_team_range(), None);
        assert_eq!(line.line_end_point(), RangeInfo::point(18, 10));
    }

    #[test]
    fn test_game_sub_ranges() {
        let g = game(13, 11);
        assert_eq!(g.top_team_range(), Some(RangeInfo::new(13, 1, 4, 2)));
        assert_eq!(g.bottom_team_range(), Some(RangeInfo::new(23, 1, 4, 2)));
        assert_eq!(g.game_number_range(), Some(RangeInfo::new(17, 1, 5, 1)));
        assert_eq!(g.outgoing_feeder_point(), RangeInfo::point(18, 7));
    }

    #[test]
    fn test_game_number_follows_height_threshold() {
        let mut g = game(13, 11);
        g.shrink(0, 4);
        assert_eq!(g.height(), 7);
        assert_eq!(g.game_number_range(), None);
        // Short boxes still have an outgoing point in their middle row.
        assert_eq!(g.outgoing_feeder_point(), RangeInfo::point(16, 7));

        g.grow(0, 1);
        assert_eq!(g.height(), 8);
        assert!(g.game_number_range().is_some());
    }

    #[test]
    fn test_spanning_box_outgoing_is_midpoint() {
        let g = GridItem::game(GameId::new(9), RangeInfo::new(18, 15, 4, 3), false);
        assert_eq!(g.outgoing_feeder_point(), RangeInfo::point(25, 7));
    }

    #[test]
    fn test_mutators_keep_parts_in_sync() {
        let mut g = game(13, 11);
        g.shift(4, 0);
        assert_eq!(g.top_team_range().map(|r| r.row_start), Some(17));
        assert_eq!(g.game_number_range().map(|r| r.row_start), Some(21));

        g.rebase_rows(17, 41);
        assert_eq!(g.range(), RangeInfo::new(41, 11, 4, 3));
        assert_eq!(g.bottom_team_range().map(|r| r.row_start), Some(51));
    }

    #[test]
    fn test_swap_changes_side_of_slot() {
        let mut g = game(13, 11);
        assert_eq!(g.side_of(Slot::Top), Slot::Top);
        g.toggle_swap_top_bottom();
        assert_eq!(g.side_of(Slot::Top), Slot::Bottom);
        assert_eq!(g.incoming_point(g.side_of(Slot::Top)), RangeInfo::point(23, 4));
    }

    #[test]
    fn test_schedule_metadata() {
        let g = game(13, 11).with_schedule(Some("9:00".into()), Some("Field 2".into()));
        assert_eq!(g.start_time(), Some("9:00"));
        assert_eq!(g.field(), Some("Field 2"));
    }
}
