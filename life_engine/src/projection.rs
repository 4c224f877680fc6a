// projection.rs - Mapping between board cells and screen pixels

use std::num::NonZeroU32;

use crate::board::Cell;
use crate::config::DEFAULT_CELL_SIZE;

/// Side of one square cell in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize(NonZeroU32);

impl CellSize {
    pub const DEFAULT: Self = Self(NonZeroU32::new(DEFAULT_CELL_SIZE).unwrap());

    pub fn new(pixels: u32) -> Option<Self> {
        NonZeroU32::new(pixels).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Board cell under a pointer offset measured from the board's top-left corner.
    /// `None` when the offset falls outside a `rows` x `cols` board, negative
    /// and non-finite offsets included.
    pub fn cell_at(self, offset_x: f32, offset_y: f32, rows: usize, cols: usize) -> Option<Cell> {
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return None;
        }
        let size = self.get() as f32;
        let x = (offset_x / size).floor();
        let y = (offset_y / size).floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < cols && y < rows).then_some(Cell { x, y })
    }

    /// Rectangle a live cell is painted into. One pixel short on each side
    /// so the grid lines underneath stay visible.
    pub fn cell_rect(self, cell: Cell) -> PixelRect {
        let size = self.get();
        PixelRect {
            left: cell.x as u32 * size,
            top: cell.y as u32 * size,
            width: size - 1,
            height: size - 1,
        }
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}
