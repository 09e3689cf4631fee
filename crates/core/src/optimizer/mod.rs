//! Firebreak placement search
//!
//! [`FirebreakOptimizer`] runs simulated annealing over [`FirebreakParams`]
//! (start cell, direction, length), scoring each candidate by the area a full
//! spread simulation leaves unburned.

pub mod annealing;
pub mod params;

pub use annealing::{
    FirebreakOptimizer, IterationOutcome, IterationRecord, OptimizationResult, OptimizerConfig,
};
pub use params::{objective, FirebreakParams};
