//! Board module - manages the game grid
//!
//! The board is a 10x40 grid where each cell can be empty or filled with a piece kind.
//! Rows 0..20 are the hidden buffer, rows 20..40 the visible playfield.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..39 (top to bottom)

use crate::types::{
    Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT, VISIBLE_CELLS, VISIBLE_HEIGHT,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 40 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Collision query.
    ///
    /// Walls and the floor collide; space above the board (negative y) never does.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds in any direction
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Write `kind` at every absolute cell. Cells outside the grid are skipped.
    pub fn place(&mut self, cells: &[(i8, i8)], kind: PieceKind) {
        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }
    }

    /// Remove every full visible row and collapse the visible rows above it.
    ///
    /// Scans bottom to top with a two-pointer pass; empty rows are inserted at the
    /// top of the visible area. Buffer rows are neither scanned nor moved.
    /// Returns the number of rows cleared.
    pub fn clear_and_collapse(&mut self) -> u32 {
        let width = BOARD_WIDTH as usize;
        let top = BUFFER_HEIGHT as usize;
        let mut write_y = BOARD_HEIGHT as usize;
        let mut cleared = 0u32;

        for read_y in (top..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[top * width..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// True if every visible cell is empty (perfect clear check).
    pub fn is_visible_area_empty(&self) -> bool {
        let start = BUFFER_HEIGHT as usize * BOARD_WIDTH as usize;
        self.cells[start..].iter().all(|cell| cell.is_none())
    }

    /// Visible rows as a flat 0/1 occupancy array (row-major, top visible row first).
    pub fn visible_occupancy(&self) -> [u8; VISIBLE_CELLS] {
        let start = BUFFER_HEIGHT as usize * BOARD_WIDTH as usize;
        let mut out = [0u8; VISIBLE_CELLS];
        for (dst, cell) in out.iter_mut().zip(&self.cells[start..]) {
            *dst = cell.is_some() as u8;
        }
        out
    }

    /// Visible rows as kind codes (0 = empty, 1 + kind index otherwise).
    pub fn write_visible_grid(
        &self,
        out: &mut [[u8; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize],
    ) {
        let width = BOARD_WIDTH as usize;
        for (row, dst) in out.iter_mut().enumerate() {
            let start = (BUFFER_HEIGHT as usize + row) * width;
            for (x, cell) in self.cells[start..start + width].iter().enumerate() {
                dst[x] = cell.map(|k| k.index() + 1).unwrap_or(0);
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a board from text rows aligned to the bottom of the playfield.
    ///
    /// Each row is `BOARD_WIDTH` characters; `.` or space is empty, anything else
    /// is filled with `kind`. Extra rows beyond the board height are ignored.
    pub fn from_rows_bottom(rows: &[&str], kind: PieceKind) -> Self {
        let mut board = Self::new();
        let bottom = BOARD_HEIGHT as i8 - 1;
        for (i, row) in rows.iter().rev().enumerate() {
            let y = bottom - i as i8;
            if y < 0 {
                break;
            }
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                if ch != '.' && ch != ' ' {
                    board.set(x as i8, y, Some(kind));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
