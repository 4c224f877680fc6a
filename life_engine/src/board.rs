// board.rs - Fixed-size board for Conway's Game of Life

use std::fmt;

use rand::Rng;

use crate::config::validate_density;
use crate::error::{EngineError, Result};
use crate::projection::CellSize;

/// Offsets of the 8 grid-adjacent positions.
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Coordinate of a live cell, as handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

/// A rows x cols grid of alive/dead cells, indexed `[y][x]`.
///
/// The dimensions are fixed when the board is built. Coordinates outside the
/// grid are never an error: reads see a dead cell and writes are ignored, so
/// callers that already bounds-check (the UI does) pay nothing extra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<bool>>,
}

impl Board {
    /// Empty board. Fails with `InvalidDimension` if either side is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidDimension { rows, cols });
        }
        Ok(Self { rows, cols, cells: vec![vec![false; cols]; rows] })
    }

    /// Board covering a `width` x `height` pixel area.
    pub fn from_pixels(width: u32, height: u32, cell_size: CellSize) -> Result<Self> {
        let size = cell_size.get();
        Self::new((height / size) as usize, (width / size) as usize)
    }

    /// Parses rows of `#` (alive) and `.` (dead). Every row must be the same width.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.chars().count());
        let mut board = Self::new(rows.len(), cols)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != cols {
                return Err(EngineError::InvalidDimension { rows: rows.len(), cols: row.chars().count() });
            }
            for (x, ch) in row.chars().enumerate() {
                board.cells[y][x] = ch == '#';
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.cols && y < self.rows
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.contains(x, y) && self.cells[y][x]
    }

    /// Sets one cell. Out of range is ignored.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if self.contains(x, y) {
            self.cells[y][x] = alive;
        }
    }

    /// Flips one cell. Out of range is ignored.
    pub fn toggle(&mut self, x: usize, y: usize) {
        if self.contains(x, y) {
            self.cells[y][x] = !self.cells[y][x];
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(false);
        }
    }

    /// Seeds every cell alive with probability `density`, using the thread rng.
    pub fn randomize(&mut self, density: f64) -> Result<()> {
        self.randomize_with(&mut rand::rng(), density)
    }

    /// Same as [`Board::randomize`] with a caller-supplied generator.
    /// A density outside `[0.0, 1.0]` leaves the board untouched.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R, density: f64) -> Result<()> {
        validate_density(density)?;
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = rng.random_bool(density);
            }
        }
        Ok(())
    }

    /// Live cells among the 8 neighbors of (x, y). The grid does not wrap,
    /// so edge and corner cells simply have fewer neighbors.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> u8 {
        NEIGHBORS
            .iter()
            .filter(|&&(dx, dy)| {
                match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
                    (Some(nx), Some(ny)) => self.is_alive(nx, ny),
                    _ => false,
                }
            })
            .count() as u8
    }

    /// Applies one generation. The next grid is computed from the current one
    /// in full before it replaces it, so no cell sees a neighbor's new state.
    pub fn advance_generation(&mut self) {
        let mut next = vec![vec![false; self.cols]; self.rows];
        for (y, row) in next.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = match (self.cells[y][x], self.count_live_neighbors(x, y)) {
                    (true, 2) | (true, 3) => true,   // Survival
                    (false, 3)            => true,   // Birth
                    _                     => false,  // Death or stays dead
                };
            }
        }
        self.cells = next;
    }

    /// Live cells in row-major order (y, then x).
    pub fn live_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, alive)| **alive)
                    .map(move |(x, _)| Cell { x, y })
            })
            .collect()
    }

    pub fn population(&self) -> usize {
        self.cells.iter().map(|row| row.iter().filter(|&&alive| alive).count()).sum()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &alive in row {
                f.write_str(if alive { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
