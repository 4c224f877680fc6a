// config.rs - Default sizes and speeds for the simulation

use std::time::Duration;

use crate::board::Board;
use crate::clock::validate_interval;
use crate::error::{EngineError, Result};
use crate::projection::CellSize;

/// Board area in pixels. 800x600 at 20 px cells gives 40 cols by 30 rows.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_CELL_SIZE: u32 = 20;
pub const DEFAULT_INTERVAL_MS: u64 = 100;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(DEFAULT_INTERVAL_MS);
pub const DEFAULT_DENSITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    pub width: u32,
    pub height: u32,
    pub cell_size: CellSize,
    pub interval: Duration,
    pub density: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: CellSize::default(),
            interval: DEFAULT_INTERVAL,
            density: DEFAULT_DENSITY,
        }
    }
}

impl LifeConfig {
    /// Checks every knob against the same rules the operations it feeds apply.
    pub fn validate(&self) -> Result<()> {
        self.empty_board()?;
        validate_interval(self.interval)?;
        validate_density(self.density)
    }

    pub fn rows(&self) -> usize {
        (self.height / self.cell_size.get()) as usize
    }

    pub fn cols(&self) -> usize {
        (self.width / self.cell_size.get()) as usize
    }

    pub fn empty_board(&self) -> Result<Board> {
        Board::from_pixels(self.width, self.height, self.cell_size)
    }
}

pub(crate) fn validate_density(density: f64) -> Result<()> {
    if (0.0..=1.0).contains(&density) {
        Ok(())
    } else {
        Err(EngineError::InvalidDensity(density))
    }
}
