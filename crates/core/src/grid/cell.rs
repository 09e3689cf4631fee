//! Grid cell: fuel, frozen readings, fire state and firebreak flag

use crate::core_types::fuel::FuelModel;
use crate::core_types::readings::EnvironmentReadings;
use crate::simulation::state::FireState;
use serde::{Deserialize, Serialize};

/// Display colour of firebreak cells
pub const FIREBREAK_COLOR: [u8; 3] = [255, 255, 255];

/// One cell of the fuel grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Fuel model parameters (code, loads, SAV, extinction moisture, heat, depth)
    pub fuel: FuelModel,
    /// Environmental readings frozen at grid construction
    pub readings: EnvironmentReadings,
    /// Fire state recorded for snapshots; the live state of a run is held by the
    /// simulation context
    pub fire_state: FireState,
    /// Whether a firebreak covers this cell
    pub firebreak: bool,
    /// Display colour (RGB)
    pub color: [u8; 3],
}

impl Cell {
    /// Create an unburned cell coloured by its fuel group
    pub fn new(fuel: FuelModel, readings: EnvironmentReadings) -> Self {
        Self {
            fuel,
            readings,
            fire_state: FireState::Unburned,
            firebreak: false,
            color: fuel.code.group().display_color(),
        }
    }

    /// Whether the cell's fuel can never carry fire
    pub fn is_non_burnable(&self) -> bool {
        self.fuel.is_non_burnable()
    }
}
