//! Fuel environment: cells, the grid and scalar fields over it

pub mod cell;
pub mod field;
pub mod fuel_grid;

pub use cell::{Cell, FIREBREAK_COLOR};
pub use field::FieldData;
pub use fuel_grid::{FuelGrid, NEIGHBORS_4};
