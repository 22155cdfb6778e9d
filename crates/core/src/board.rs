//! Board module - manages the game grid
//!
//! The board is a square grid where each cell is either empty or holds a copy of
//! the block that was placed on it. Storage is a flat row-major vector sized once
//! at construction; nothing reallocates during play.
//! Coordinates: (row, col), both ranging `0..size`.

use arrayvec::ArrayVec;

use crate::types::{Block, BlockColor, Cell, Position, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Row or column indices, bounded by the largest supported grid
pub type LineSet = ArrayVec<u8, { MAX_GRID_SIZE as usize }>;

/// The game board - `size` x `size` cells using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board. `size` is clamped to the supported range.
    pub fn new(size: u8) -> Self {
        let size = size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        Self {
            size,
            cells: vec![None; size as usize * size as usize],
        }
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(&self, row: i8, col: i8) -> Option<usize> {
        if row < 0 || col < 0 || row as u8 >= self.size || col as u8 >= self.size {
            return None;
        }
        Some(row as usize * self.size as usize + col as usize)
    }

    /// Edge length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get cell at (row, col). Returns None if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    pub fn get_at(&self, pos: Position) -> Option<Cell> {
        self.get(pos.row, pos.col)
    }

    /// Set cell at (row, col). Returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_valid(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, row: i8, col: i8) -> bool {
        self.index(row, col).is_none()
    }

    /// Whether `block` fits with its anchor at `anchor`. Pure query.
    pub fn can_place(&self, block: &Block, anchor: Position) -> bool {
        block
            .footprint(anchor)
            .all(|p| self.is_valid(p.row, p.col))
    }

    /// Whether `block` fits at any anchor on the board (exhaustive scan)
    pub fn can_place_anywhere(&self, block: &Block) -> bool {
        self.first_fit(block).is_some()
    }

    /// First anchor in row-major order where `block` fits
    pub fn first_fit(&self, block: &Block) -> Option<Position> {
        let n = self.size as i8;
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Position::new(row, col)))
            .find(|&anchor| self.can_place(block, anchor))
    }

    /// Write `block` into every footprint cell.
    ///
    /// Callers must have checked [`Board::can_place`] first; cells outside the
    /// board are skipped.
    pub fn place(&mut self, block: &Block, anchor: Position) {
        let cell = Some((*block).into());
        for p in block.footprint(anchor) {
            self.set(p.row, p.col, cell);
        }
    }

    pub fn is_row_full(&self, row: u8) -> bool {
        if row >= self.size {
            return false;
        }
        let start = row as usize * self.size as usize;
        self.cells[start..start + self.size as usize]
            .iter()
            .all(|cell| cell.is_some())
    }

    pub fn is_col_full(&self, col: u8) -> bool {
        if col >= self.size {
            return false;
        }
        (0..self.size).all(|row| self.is_occupied(row as i8, col as i8))
    }

    pub fn full_rows(&self) -> LineSet {
        (0..self.size).filter(|&r| self.is_row_full(r)).collect()
    }

    pub fn full_cols(&self) -> LineSet {
        (0..self.size).filter(|&c| self.is_col_full(c)).collect()
    }

    /// The single color shared by every cell of a full row, if any
    pub fn row_uniform_color(&self, row: u8) -> Option<BlockColor> {
        uniform_color((0..self.size).map(|col| self.get(row as i8, col as i8).flatten()))
    }

    /// The single color shared by every cell of a full column, if any
    pub fn col_uniform_color(&self, col: u8) -> Option<BlockColor> {
        uniform_color((0..self.size).map(|row| self.get(row as i8, col as i8).flatten()))
    }

    /// Empty a row in place (no shifting), returning the cleared positions
    pub fn clear_row(&mut self, row: u8) -> Vec<Position> {
        let mut cleared = Vec::with_capacity(self.size as usize);
        for col in 0..self.size {
            let p = Position::new(row as i8, col as i8);
            if self.set(p.row, p.col, None) {
                cleared.push(p);
            }
        }
        cleared
    }

    /// Empty a column in place, returning the cleared positions
    pub fn clear_col(&mut self, col: u8) -> Vec<Position> {
        let mut cleared = Vec::with_capacity(self.size as usize);
        for row in 0..self.size {
            let p = Position::new(row as i8, col as i8);
            if self.set(p.row, p.col, None) {
                cleared.push(p);
            }
        }
        cleared
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Maximal 4-connected components of occupied cells
    pub fn occupied_groups(&self) -> Vec<Vec<Position>> {
        let n = self.size as usize;
        let mut visited = vec![false; n * n];
        let mut groups = Vec::new();

        for start in 0..n * n {
            if visited[start] || self.cells[start].is_none() {
                continue;
            }
            visited[start] = true;
            let mut group = Vec::new();
            let mut stack = vec![start];

            while let Some(idx) = stack.pop() {
                let (row, col) = ((idx / n) as i8, (idx % n) as i8);
                group.push(Position::new(row, col));

                for (dr, dc) in [(0i8, 1i8), (0, -1), (1, 0), (-1, 0)] {
                    if let Some(next) = self.index(row + dr, col + dc) {
                        if !visited[next] && self.cells[next].is_some() {
                            visited[next] = true;
                            stack.push(next);
                        }
                    }
                }
            }
            groups.push(group);
        }

        groups
    }

    /// Flat row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows as slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size as usize)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build from rows. Returns None unless the rows form a supported square.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let size = rows.len();
        if size < MIN_GRID_SIZE as usize
            || size > MAX_GRID_SIZE as usize
            || rows.iter().any(|r| r.len() != size)
        {
            return None;
        }
        Some(Self {
            size: size as u8,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(|r| r.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_GRID_SIZE)
    }
}

fn uniform_color(mut cells: impl Iterator<Item = Cell>) -> Option<BlockColor> {
    let first = cells.next()??.color;
    cells
        .try_fold(first, |color, cell| match cell {
            Some(c) if c.color == color => Some(color),
            _ => None,
        })
}
