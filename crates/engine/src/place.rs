use crate::core::GameState;
use crate::types::{Block, BlockId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    GameOver,
    UnknownBlock,
    OutOfBounds,
    Occupied,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::GameOver => "game_over",
            PlaceError::UnknownBlock => "unknown_block",
            PlaceError::OutOfBounds => "out_of_bounds",
            PlaceError::Occupied => "occupied",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::GameOver => "game is over",
            PlaceError::UnknownBlock => "block is not in the tray",
            PlaceError::OutOfBounds => "block would extend past the grid",
            PlaceError::Occupied => "block overlaps an occupied cell",
        }
    }
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Explain why `id` cannot go at `anchor`, or return the tray block if it can.
pub fn check_place(state: &GameState, id: BlockId, anchor: Position) -> Result<Block, PlaceError> {
    if state.game_over() {
        return Err(PlaceError::GameOver);
    }
    let Some(block) = state.block(id).copied() else {
        return Err(PlaceError::UnknownBlock);
    };

    let board = state.board();
    let mut occupied = false;
    for pos in block.footprint(anchor) {
        if board.is_out_of_bounds(pos.row, pos.col) {
            return Err(PlaceError::OutOfBounds);
        }
        occupied |= board.is_occupied(pos.row, pos.col);
    }
    if occupied {
        return Err(PlaceError::Occupied);
    }

    Ok(block)
}

/// Place with a diagnostic instead of a bare `false`
pub fn apply_place(state: &mut GameState, id: BlockId, anchor: Position) -> Result<(), PlaceError> {
    check_place(state, id, anchor)?;
    if !state.place_block_from_tray(id, anchor) {
        // check_place mirrors every rejection path of the engine.
        return Err(PlaceError::Occupied);
    }
    Ok(())
}
