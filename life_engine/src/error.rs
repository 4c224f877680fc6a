// error.rs - Error types for the life engine

use thiserror::Error;

/// Errors reported by the board, the clock and the simulation handle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Board dimensions must both be positive.
    #[error("invalid board dimension: {rows} rows x {cols} cols")]
    InvalidDimension { rows: usize, cols: usize },

    /// Interval was zero, negative or not a number. The previous interval stays in force.
    #[error("invalid interval: {0:?}")]
    InvalidInterval(String),

    /// Randomize density must lie in [0.0, 1.0].
    #[error("invalid density: {0}")]
    InvalidDensity(f64),

    /// The simulation task must be spawned from inside a tokio runtime.
    #[error("no tokio runtime to spawn the simulation on")]
    NoRuntime,

    /// The simulation task is no longer running.
    #[error("simulation task has shut down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, EngineError>;
