//! Error types for the firebreak planning core
//!
//! Only configuration defects and I/O surface as errors. Once a grid has been
//! built and a simulation context created, stepping the simulation is infallible:
//! missing readings fall back to defaults and out-of-bounds firebreak cells are
//! clipped.

use thiserror::Error;

/// Errors raised by the core library
#[derive(Error, Debug)]
pub enum CoreError {
    /// A fuel code is absent from the fuel parameter table. This is a configuration
    /// defect and must abort the run rather than fall back to a default fuel.
    #[error("Fuel code '{0}' not found in fuel parameter table")]
    UnknownFuelCode(String),

    /// A string could not be parsed as a fuel code
    #[error("Invalid fuel code '{0}'")]
    InvalidFuelCode(String),

    /// Grid dimensions or cell data are inconsistent
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// A cell coordinate lies outside the grid
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A configuration value is out of its valid range
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Snapshot key not present in a store
    #[error("Snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
