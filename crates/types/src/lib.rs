//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data (plus serde derives for persistence), usable from the
//! engine, the async collaborators and any renderer.
//!
//! # Coordinates
//!
//! Grid positions are `(row, col)` with `row` growing downwards and `col` growing
//! to the right. Shape offsets are `(dx, dy)`: `dx` moves along columns, `dy`
//! along rows.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_CLEAR_BONUS` | 100 | Per cleared row or column |
//! | `COLOR_MATCH_BONUS` | 500 | Cleared line whose cells share one color |
//! | `SUPER_BONUS_PER_MATCH` | 1000 | Multiplied by matches when ≥ 2 in one pass |
//! | `GROUP_BONUS` | 200 | Per connected component of ≥ `GROUP_BONUS_MIN_SIZE` cells |
//!
//! # Examples
//!
//! ```
//! use block_smash_types::{BlockColor, BlockShape, Position};
//!
//! let shape = BlockShape::from_str("square").unwrap();
//! assert_eq!(shape.cells().len(), 4);
//!
//! assert!(BlockColor::Red.unlock_level() <= 1);
//! assert_eq!(Position::new(2, 3).offset(1, 0), Position::new(2, 4));
//! ```

use serde::{Deserialize, Serialize};

/// Default board edge length (10x10)
pub const DEFAULT_GRID_SIZE: u8 = 10;

/// Smallest supported board edge (the longest shape is 5 cells)
pub const MIN_GRID_SIZE: u8 = 5;

/// Largest supported board edge
pub const MAX_GRID_SIZE: u8 = 20;

/// Number of blocks offered in the tray
pub const TRAY_SIZE: usize = 3;

/// Undo credit granted after every successful placement
pub const UNDO_GRANT: u32 = 2;

pub const LINE_CLEAR_BONUS: u32 = 100;

pub const COLOR_MATCH_BONUS: u32 = 500;

/// Super bonus per color match, awarded when a pass has two or more matches
pub const SUPER_BONUS_PER_MATCH: u32 = 1000;

pub const GROUP_BONUS: u32 = 200;

pub const GROUP_BONUS_MIN_SIZE: usize = 10;

/// Lines in a single pass needed to count as a combo
pub const COMBO_LINE_THRESHOLD: u32 = 3;

/// Level from which every shape is in the draw pool
pub const FULL_SHAPE_SET_LEVEL: u32 = 7;

/// How long an achievement notification stays visible
pub const NOTIFICATION_DISMISS_MS: u64 = 3000;

/// A cell on the grid, `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Apply a shape offset (`dx` along columns, `dy` along rows)
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            row: self.row.saturating_add(dy),
            col: self.col.saturating_add(dx),
        }
    }
}

/// Unique identity of a generated block (tray lookup key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Block palette
///
/// Early levels draw from fewer colors, which makes single-color lines
/// (and their bonus) more likely while the player learns the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl BlockColor {
    pub const ALL: [BlockColor; 8] = [
        BlockColor::Red,
        BlockColor::Blue,
        BlockColor::Green,
        BlockColor::Yellow,
        BlockColor::Purple,
        BlockColor::Orange,
        BlockColor::Pink,
        BlockColor::Cyan,
    ];

    /// First level at which this color can be drawn
    pub fn unlock_level(self) -> u32 {
        match self {
            BlockColor::Red | BlockColor::Blue | BlockColor::Green | BlockColor::Yellow => 1,
            BlockColor::Purple | BlockColor::Orange => 3,
            BlockColor::Pink | BlockColor::Cyan => 5,
        }
    }

    /// Colors available at `level`, in palette order
    pub fn available_for_level(level: u32) -> impl Iterator<Item = BlockColor> {
        Self::ALL
            .into_iter()
            .filter(move |c| c.unlock_level() <= level.max(1))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockColor::Red => "red",
            BlockColor::Blue => "blue",
            BlockColor::Green => "green",
            BlockColor::Yellow => "yellow",
            BlockColor::Purple => "purple",
            BlockColor::Orange => "orange",
            BlockColor::Pink => "pink",
            BlockColor::Cyan => "cyan",
        }
    }

    /// Single-character tag used by text renderers
    pub fn symbol(self) -> char {
        match self {
            BlockColor::Red => 'R',
            BlockColor::Blue => 'B',
            BlockColor::Green => 'G',
            BlockColor::Yellow => 'Y',
            BlockColor::Purple => 'P',
            BlockColor::Orange => 'O',
            BlockColor::Pink => 'K',
            BlockColor::Cyan => 'C',
        }
    }

    /// Parse color from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Enumerated polyominoes
///
/// Offsets are `(dx, dy)` from the anchor; every shape contains `(0, 0)`
/// and has no negative offsets, so the anchor is the top-left of its
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockShape {
    Single,
    HorizontalBar2,
    VerticalBar2,
    HorizontalBar3,
    VerticalBar3,
    Square,
    Corner,
    HorizontalBar4,
    VerticalBar4,
    LShape,
    TShape,
    ZShape,
    HorizontalBar5,
    VerticalBar5,
    Plus,
    BigSquare,
}

impl BlockShape {
    pub const ALL: [BlockShape; 16] = [
        BlockShape::Single,
        BlockShape::HorizontalBar2,
        BlockShape::VerticalBar2,
        BlockShape::HorizontalBar3,
        BlockShape::VerticalBar3,
        BlockShape::Square,
        BlockShape::Corner,
        BlockShape::HorizontalBar4,
        BlockShape::VerticalBar4,
        BlockShape::LShape,
        BlockShape::TShape,
        BlockShape::ZShape,
        BlockShape::HorizontalBar5,
        BlockShape::VerticalBar5,
        BlockShape::Plus,
        BlockShape::BigSquare,
    ];

    /// Cell offsets `(dx, dy)` relative to the anchor
    pub fn cells(self) -> &'static [(i8, i8)] {
        match self {
            BlockShape::Single => &[(0, 0)],
            BlockShape::HorizontalBar2 => &[(0, 0), (1, 0)],
            BlockShape::VerticalBar2 => &[(0, 0), (0, 1)],
            BlockShape::HorizontalBar3 => &[(0, 0), (1, 0), (2, 0)],
            BlockShape::VerticalBar3 => &[(0, 0), (0, 1), (0, 2)],
            BlockShape::Square => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            BlockShape::Corner => &[(0, 0), (1, 0), (0, 1)],
            BlockShape::HorizontalBar4 => &[(0, 0), (1, 0), (2, 0), (3, 0)],
            BlockShape::VerticalBar4 => &[(0, 0), (0, 1), (0, 2), (0, 3)],
            BlockShape::LShape => &[(0, 0), (0, 1), (0, 2), (1, 2)],
            BlockShape::TShape => &[(0, 0), (1, 0), (2, 0), (1, 1)],
            BlockShape::ZShape => &[(0, 0), (1, 0), (1, 1), (2, 1)],
            BlockShape::HorizontalBar5 => &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            BlockShape::VerticalBar5 => &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            BlockShape::Plus => &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)],
            BlockShape::BigSquare => &[
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2),
            ],
        }
    }

    /// First level at which this shape can be drawn
    pub fn unlock_level(self) -> u32 {
        match self {
            BlockShape::Single
            | BlockShape::HorizontalBar2
            | BlockShape::VerticalBar2
            | BlockShape::HorizontalBar3
            | BlockShape::VerticalBar3
            | BlockShape::Square
            | BlockShape::Corner => 1,
            BlockShape::HorizontalBar4
            | BlockShape::VerticalBar4
            | BlockShape::LShape
            | BlockShape::TShape
            | BlockShape::ZShape => 3,
            BlockShape::HorizontalBar5 | BlockShape::VerticalBar5 | BlockShape::Plus => 5,
            BlockShape::BigSquare => FULL_SHAPE_SET_LEVEL,
        }
    }

    /// Shapes available at `level`, in declaration order
    pub fn available_for_level(level: u32) -> impl Iterator<Item = BlockShape> {
        Self::ALL
            .into_iter()
            .filter(move |s| s.unlock_level() <= level.max(1))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockShape::Single => "single",
            BlockShape::HorizontalBar2 => "horizontal_bar2",
            BlockShape::VerticalBar2 => "vertical_bar2",
            BlockShape::HorizontalBar3 => "horizontal_bar3",
            BlockShape::VerticalBar3 => "vertical_bar3",
            BlockShape::Square => "square",
            BlockShape::Corner => "corner",
            BlockShape::HorizontalBar4 => "horizontal_bar4",
            BlockShape::VerticalBar4 => "vertical_bar4",
            BlockShape::LShape => "l_shape",
            BlockShape::TShape => "t_shape",
            BlockShape::ZShape => "z_shape",
            BlockShape::HorizontalBar5 => "horizontal_bar5",
            BlockShape::VerticalBar5 => "vertical_bar5",
            BlockShape::Plus => "plus",
            BlockShape::BigSquare => "big_square",
        }
    }

    /// Parse shape from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::ALL.into_iter().find(|shape| shape.as_str() == s)
    }

    /// Bounding box `(width, height)`
    pub fn extent(self) -> (i8, i8) {
        let cells = self.cells();
        let w = cells.iter().map(|&(dx, _)| dx).max().unwrap_or(0) + 1;
        let h = cells.iter().map(|&(_, dy)| dy).max().unwrap_or(0) + 1;
        (w, h)
    }
}

/// A tray block: one shape in one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub shape: BlockShape,
    pub color: BlockColor,
}

impl Block {
    pub fn new(id: BlockId, shape: BlockShape, color: BlockColor) -> Self {
        Self { id, shape, color }
    }

    /// Absolute cells covered when anchored at `anchor`
    pub fn footprint(&self, anchor: Position) -> impl Iterator<Item = Position> + '_ {
        self.shape
            .cells()
            .iter()
            .map(move |&(dx, dy)| anchor.offset(dx, dy))
    }
}

/// Board cell contents: a copy of the block that was placed there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedCell {
    pub block: BlockId,
    pub shape: BlockShape,
    pub color: BlockColor,
}

impl From<Block> for PlacedCell {
    fn from(block: Block) -> Self {
        Self {
            block: block.id,
            shape: block.shape,
            color: block.color,
        }
    }
}

/// Cell type: None = empty, Some = placed block cell
pub type Cell = Option<PlacedCell>;
