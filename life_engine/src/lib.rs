// lib.rs - Conway's Game of Life engine: board, clock and async driver

pub mod board;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod projection;

pub use board::{Board, Cell};
pub use clock::{ClockState, IntervalChange, MAX_INTERVAL, SimulationClock, parse_interval};
pub use config::LifeConfig;
pub use engine::{Simulation, SimulationHandle, Snapshot};
pub use error::{EngineError, Result};
pub use projection::{CellSize, PixelRect};
