//! Firebreak Planning Core Library
//!
//! Stochastic wildfire spread over a 2D fuel grid and a search for firebreak
//! placements that minimize burned area.
//!
//! ## Overview
//!
//! - **Fuel environment**: Scott & Burgan fuel models, per-cell environmental
//!   readings and the fixed-size [`FuelGrid`]
//! - **Rate of spread**: a Rothermel-style closed-form model with live-fuel curing
//!   and moisture damping ([`physics::rothermel`])
//! - **Firebreaks**: straight lines of non-burnable cells along eight directions
//!   ([`firebreak`]), with width, slope and wind dependent effectiveness
//! - **Spread simulation**: a synchronous cellular automaton over an explicit
//!   [`SimulationContext`] driven by an injected, seedable RNG
//! - **Optimization**: simulated annealing over firebreak position, direction and
//!   length ([`optimizer`])
//!
//! ## Example
//!
//! ```
//! use firebreak_core::{
//!     seeded_rng, EnvironmentReadings, FireSpreadSimulator, FuelCode, FuelGrid, FuelTable,
//! };
//!
//! let table = FuelTable::scott_burgan();
//! let code: FuelCode = "GR2".parse().unwrap();
//! let grid = FuelGrid::uniform(&table, code, EnvironmentReadings::bone_dry(), 9, 9).unwrap();
//!
//! let sim = FireSpreadSimulator::default();
//! let mut ctx = sim.context(&grid, (4, 4)).unwrap();
//! let frames = sim.run(&grid, &mut ctx, &mut seeded_rng(42));
//! assert_eq!(frames.len(), 30);
//! ```

pub mod core_types;
pub mod error;
pub mod firebreak;
pub mod grid;
pub mod optimizer;
pub mod physics;
pub mod simulation;

pub use core_types::{
    seeded_rng, EnvironmentReadings, FuelCode, FuelGroup, FuelModel, FuelTable, PartialReadings,
    ReadingsSource, SimRng,
};
pub use error::{CoreError, CoreResult};
pub use firebreak::{place_firebreak, snap_angle, FirebreakLine};
pub use grid::{Cell, FieldData, FuelGrid};
pub use optimizer::{
    FirebreakOptimizer, FirebreakParams, IterationOutcome, IterationRecord, OptimizationResult,
    OptimizerConfig,
};
pub use physics::{FirebreakMode, RosVariant, SpreadRate, SpreadStatus};
pub use simulation::{
    FireSpreadSimulator, FireState, FireStateField, GridSnapshot, JsonFileStore, MemoryStore,
    SimulationContext, SnapshotStore, SpreadConfig,
};
