//! Core types and utilities

pub mod fuel;
pub mod readings;
pub mod rng;
pub mod units;

pub use fuel::{FuelCode, FuelGroup, FuelModel, FuelTable};
pub use readings::{EnvironmentReadings, PartialReadings, ReadingsSource};
pub use rng::{seeded_rng, SimRng};
pub use units::*;
