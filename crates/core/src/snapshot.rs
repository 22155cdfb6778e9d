//! Snapshots of engine state
//!
//! [`UndoSnapshot`] is the in-memory single-slot undo copy.
//! [`PersistedGame`] is the serde shape handed to external storage:
//! `{ score, level, grid, tray }` plus optional extras that default when absent,
//! so a minimal save still loads.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::stats::GameStats;
use crate::types::{
    Block, BlockColor, BlockId, BlockShape, PlacedCell, MAX_GRID_SIZE, MIN_GRID_SIZE, TRAY_SIZE,
};

pub type Tray = ArrayVec<Block, TRAY_SIZE>;

/// Highest level a save may carry
pub const MAX_SAVED_LEVEL: u32 = 1_000_000;

/// Copy of the state a placement can change, taken just before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub board: Board,
    pub tray: Tray,
    pub score: u32,
    pub level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    pub color: BlockColor,
    pub shape: BlockShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockId>,
}

impl From<PlacedCell> for SavedCell {
    fn from(cell: PlacedCell) -> Self {
        Self {
            color: cell.color,
            shape: cell.shape,
            block: Some(cell.block),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlock {
    pub color: BlockColor,
    pub shape: BlockShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
}

impl From<Block> for SavedBlock {
    fn from(block: Block) -> Self {
        Self {
            color: block.color,
            shape: block.shape,
            id: Some(block.id),
        }
    }
}

/// Save-file shape of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGame {
    pub score: u32,
    pub level: u32,
    /// Rows top to bottom
    pub grid: Vec<Vec<Option<SavedCell>>>,
    pub tray: Vec<SavedBlock>,
    /// Generator state; when absent the generator is reseeded from `level`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_state: Option<u32>,
    /// Id the next generated block gets; when absent, one past the highest saved id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_block_id: Option<u32>,
    #[serde(default)]
    pub ad_undo_count: u32,
    #[serde(default)]
    pub perfect_level: bool,
    #[serde(default)]
    pub stats: GameStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("grid must be square, found a row of {found} cells in a {expected}-row grid")]
    GridNotSquare { expected: usize, found: usize },
    #[error("grid size {0} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize(usize),
    #[error("tray holds {0} blocks, at most {max} allowed", max = TRAY_SIZE)]
    TraySize(usize),
    #[error("level {0} is outside 1..={max}", max = MAX_SAVED_LEVEL)]
    Level(u32),
}

impl PersistedGame {
    /// Validate and rebuild the board
    pub fn board(&self) -> Result<Board, SnapshotError> {
        let size = self.grid.len();
        if !(MIN_GRID_SIZE as usize..=MAX_GRID_SIZE as usize).contains(&size) {
            return Err(SnapshotError::GridSize(size));
        }
        if let Some(row) = self.grid.iter().find(|r| r.len() != size) {
            return Err(SnapshotError::GridNotSquare {
                expected: size,
                found: row.len(),
            });
        }

        let rows = self
            .grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.map(|c| PlacedCell {
                            block: c.block.unwrap_or(BlockId(0)),
                            shape: c.shape,
                            color: c.color,
                        })
                    })
                    .collect()
            })
            .collect();

        Board::from_rows(rows).ok_or(SnapshotError::GridSize(size))
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !(1..=MAX_SAVED_LEVEL).contains(&self.level) {
            return Err(SnapshotError::Level(self.level));
        }
        if self.tray.len() > TRAY_SIZE {
            return Err(SnapshotError::TraySize(self.tray.len()));
        }
        self.board().map(|_| ())
    }
}
