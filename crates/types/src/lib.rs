//! Core types module - shared geometry values, identities and layout constants
//!
//! This module defines the fundamental types used throughout the bracket grid
//! engine. All types are plain values with no external dependencies, making them
//! usable in any context (core geometry, move search, persistence adapters).
//!
//! # Coordinates
//!
//! The diagram lives on a discrete row/column grid (think spreadsheet cells).
//! Rows grow downward, columns grow to the right. A [`RangeInfo`] is a
//! rectangle `(row_start, row_count, col_start, col_count)`; a range with a
//! zero row or column count is a *point*, used to describe connector endpoints.
//!
//! # Layout Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GAME_COLUMN_STRIDE` | 3 | Columns between two bracket rounds |
//! | `GAME_WIDTH` | 3 | Columns occupied by a game box |
//! | `STANDARD_GAME_HEIGHT` | 11 | Default height of a new game box |
//! | `CHAMPIONSHIP_GAME_HEIGHT` | 3 | Height of a championship box |
//! | `GAME_NUMBER_MIN_ROWS` | 8 | Boxes this tall or taller carry a game-number row |
//! | `EPHEMERAL_FEEDER_COLS` | 9 | Virtual extension of unattached outgoing feeders |
//!
//! # Examples
//!
//! ```
//! use bracket_grid_types::{GameId, GameNum, RangeInfo, RangeOverlap};
//!
//! let a = RangeInfo::new(13, 11, 1, 3);
//! let b = RangeInfo::new(20, 11, 1, 3);
//! assert_eq!(a.overlap(&b), RangeOverlap::Partial);
//! assert_eq!(a.overlap(&a), RangeOverlap::Equal);
//! assert_eq!(a.row_end(), 23);
//!
//! // GameId is 1-based, GameNum is 0-based.
//! assert_eq!(GameId::new(4).num(), GameNum::new(3));
//! assert_eq!(GameNum::new(0).id(), GameId::new(1));
//! ```

use std::fmt;

/// Columns between the left edges of two adjacent bracket rounds.
pub const GAME_COLUMN_STRIDE: i32 = 3;

/// Columns occupied by a game box (team column, score column, bracket column).
pub const GAME_WIDTH: i32 = 3;

/// Height of a freshly placed non-championship game box.
pub const STANDARD_GAME_HEIGHT: i32 = 11;

/// Height of a freshly placed championship game box.
pub const CHAMPIONSHIP_GAME_HEIGHT: i32 = 3;

/// Boxes with at least this many rows carry a game-number sub-row.
pub const GAME_NUMBER_MIN_ROWS: i32 = 8;

/// Granularity used when growing a box so its height stays `3 mod 4`.
pub const GAME_HEIGHT_STEP: i32 = 4;

/// Columns an unattached outgoing feeder is virtually extended by during placement.
pub const EPHEMERAL_FEEDER_COLS: i32 = 9;

/// Rows below the grid pattern origin where the first sourceless game lands.
pub const SOURCELESS_TOP_PAD: i32 = 4;

/// Rows kept between a sourceless game and the lowest item of its own column.
pub const SAME_COLUMN_PAD: i32 = 4;

/// Rows kept between a sourceless game and the lowest item of the left column.
pub const LEFT_COLUMN_PAD: i32 = 2;

/// A box may only grow upward when its anchor is more than this many rows below the top.
pub const GROW_UP_MIN_ROOM: i32 = 6;


/// Overlap classification between two ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeOverlap {
    /// The ranges share no cell.
    None,
    /// The ranges cover exactly the same cells.
    Equal,
    /// The ranges share some, but not all, cells (containment included).
    Partial,
}

impl RangeOverlap {
    pub fn any(self) -> bool {
        !matches!(self, RangeOverlap::None)
    }
}

/// A rectangular region of the grid
///
/// Counts are never negative. A zero count on either axis makes the range a
/// point, which never overlaps anything under [`RangeInfo::overlap`] but is
/// treated as a single cell by [`RangeInfo::overlap_not_backwards`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RangeInfo {
    pub row_start: i32,
    pub row_count: i32,
    pub col_start: i32,
    pub col_count: i32,
}

impl RangeInfo {
    pub const fn new(row_start: i32, row_count: i32, col_start: i32, col_count: i32) -> Self {
        Self {
            row_start,
            row_count,
            col_start,
            col_count,
        }
    }

    /// Zero-sized range used for connector endpoints.
    pub const fn point(row: i32, col: i32) -> Self {
        Self::new(row, 0, col, 0)
    }

    /// Last row covered by the range (`row_start - 1` for points)
    pub fn row_end(&self) -> i32 {
        self.row_start + self.row_count - 1
    }

    /// Last column covered by the range (`col_start - 1` for points)
    pub fn col_end(&self) -> i32 {
        self.col_start + self.col_count - 1
    }

    pub fn is_point(&self) -> bool {
        self.row_count == 0 || self.col_count == 0
    }

    pub fn area(&self) -> i64 {
        i64::from(self.row_count.max(0)) * i64::from(self.col_count.max(0))
    }

    /// Whether the range sits at the same origin as `point`.
    pub fn starts_at(&self, point: &RangeInfo) -> bool {
        self.row_start == point.row_start && self.col_start == point.col_start
    }

    /// Classify how `self` and `other` overlap.
    pub fn overlap(&self, other: &RangeInfo) -> RangeOverlap {
        if self.is_point() || other.is_point() {
            return RangeOverlap::None;
        }
        Self::classify(self, other)
    }

    /// Overlap where points count as a single cell.
    ///
    /// Used when asking "what sits at this connector endpoint". Only zero
    /// counts are widened; ranges never extend backwards from their origin.
    pub fn overlap_not_backwards(&self, other: &RangeInfo) -> RangeOverlap {
        Self::classify(&self.widen_points(), &other.widen_points())
    }

    fn widen_points(&self) -> RangeInfo {
        RangeInfo::new(
            self.row_start,
            self.row_count.max(1),
            self.col_start,
            self.col_count.max(1),
        )
    }

    fn classify(a: &RangeInfo, b: &RangeInfo) -> RangeOverlap {
        if a == b {
            return RangeOverlap::Equal;
        }
        let rows = a.row_start <= b.row_end() && b.row_start <= a.row_end();
        let cols = a.col_start <= b.col_end() && b.col_start <= a.col_end();
        if rows && cols {
            RangeOverlap::Partial
        } else {
            RangeOverlap::None
        }
    }

    pub fn intersects(&self, other: &RangeInfo) -> bool {
        self.overlap(other).any()
    }

    /// Whether every cell of `other` is inside `self`.
    pub fn contains(&self, other: &RangeInfo) -> bool {
        other.row_start >= self.row_start
            && other.row_end() <= self.row_end()
            && other.col_start >= self.col_start
            && other.col_end() <= self.col_end()
    }

    /// Whether the cell at (`row`, `col`) lies inside the range.
    pub fn contains_cell(&self, row: i32, col: i32) -> bool {
        row >= self.row_start
            && row <= self.row_end()
            && col >= self.col_start
            && col <= self.col_end()
    }

    pub fn intersection(&self, other: &RangeInfo) -> Option<RangeInfo> {
        if !self.intersects(other) {
            return None;
        }
        let row_start = self.row_start.max(other.row_start);
        let row_end = self.row_end().min(other.row_end());
        let col_start = self.col_start.max(other.col_start);
        let col_end = self.col_end().min(other.col_end());
        Some(RangeInfo::new(
            row_start,
            row_end - row_start + 1,
            col_start,
            col_end - col_start + 1,
        ))
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(&self, other: &RangeInfo) -> RangeInfo {
        let row_start = self.row_start.min(other.row_start);
        let row_end = self.row_end().max(other.row_end());
        let col_start = self.col_start.min(other.col_start);
        let col_end = self.col_end().max(other.col_end());
        RangeInfo::new(
            row_start,
            row_end - row_start + 1,
            col_start,
            col_end - col_start + 1,
        )
    }

    /// Same size, moved by the given deltas.
    pub fn offset(&self, d_rows: i32, d_cols: i32) -> RangeInfo {
        RangeInfo::new(
            self.row_start + d_rows,
            self.row_count,
            self.col_start + d_cols,
            self.col_count,
        )
    }

    /// Move the top edge by `d_top` and the bottom edge by `d_bottom`.
    ///
    /// The count is clamped at zero so the result is never inverted.
    pub fn grow_rows(&self, d_top: i32, d_bottom: i32) -> RangeInfo {
        RangeInfo::new(
            self.row_start + d_top,
            (self.row_count - d_top + d_bottom).max(0),
            self.col_start,
            self.col_count,
        )
    }

    /// Re-express the rows relative to a new origin row.
    ///
    /// A range that started `k` rows below `from_row` starts `k` rows below
    /// `to_row` afterwards. Columns never change.
    pub fn rebase_rows(&self, from_row: i32, to_row: i32) -> RangeInfo {
        self.offset(to_row - from_row, 0)
    }

    pub fn with_cols(&self, col_start: i32, col_count: i32) -> RangeInfo {
        RangeInfo::new(self.row_start, self.row_count, col_start, col_count)
    }

    /// Point at the top-left cell.
    pub fn top_left(&self) -> RangeInfo {
        RangeInfo::point(self.row_start, self.col_start)
    }

    /// Point at the bottom-left cell.
    pub fn bottom_left(&self) -> RangeInfo {
        RangeInfo::point(self.row_end(), self.col_start)
    }

    /// Point just past the right edge on the first row.
    pub fn right_of_origin(&self) -> RangeInfo {
        RangeInfo::point(self.row_start, self.col_start + self.col_count)
    }
}

impl fmt::Display for RangeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            write!(f, "R{}C{}", self.row_start, self.col_start)
        } else {
            write!(
                f,
                "R{}C{}:R{}C{}",
                self.row_start,
                self.col_start,
                self.row_end(),
                self.col_end()
            )
        }
    }
}

/// Stable 1-based public identity of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(u32);

impl GameId {
    /// Create a game id. Ids are 1-based; `0` is a caller bug.
    pub const fn new(value: u32) -> Self {
        assert!(value > 0, "GameId is 1-based");
        Self(value)
    }

    /// Checked constructor for ids read from outside the process.
    pub const fn try_new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Index of this game in the topology table.
    pub const fn num(self) -> GameNum {
        GameNum(self.0 - 1)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GameNum> for GameId {
    fn from(value: GameNum) -> Self {
        value.id()
    }
}

/// 0-based index of a game in the external topology table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameNum(u32);

impl GameNum {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn id(self) -> GameId {
        GameId(self.0 + 1)
    }
}

impl From<GameId> for GameNum {
    fn from(value: GameId) -> Self {
        value.num()
    }
}

/// Which incoming connection of a game box is meant
///
/// Used both for the two source descriptors of a game (top source, bottom
/// source) and for the two visual sides of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Top,
    Bottom,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::Top, Slot::Bottom];

    pub fn opposite(self) -> Self {
        match self {
            Slot::Top => Slot::Bottom,
            Slot::Bottom => Slot::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Bottom => "bottom",
        }
    }
}
