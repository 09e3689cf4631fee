//! Per-cell fire state and the explicit simulation context
//!
//! A run's mutable state (fire states, intensity field, step counter) lives in a
//! [`SimulationContext`] owned by the caller and passed to every simulator call.
//! Nothing is shared between runs, so sequential or parallel evaluations cannot
//! interfere with each other.

use crate::error::CoreResult;
use crate::grid::{FieldData, FuelGrid};
use serde::{Deserialize, Serialize};

/// Fire state of a single cell
///
/// Transitions are strictly `Unburned → Burning → Burned` within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireState {
    #[default]
    Unburned,
    Burning,
    Burned,
}

impl FireState {
    /// Single-character glyph for text rendering
    pub const fn glyph(self) -> char {
        match self {
            FireState::Unburned => '.',
            FireState::Burning => '*',
            FireState::Burned => '#',
        }
    }
}

/// Grid of fire states in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireStateField {
    states: Vec<FireState>,
    width: usize,
    height: usize,
}

impl FireStateField {
    /// All cells unburned
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            states: vec![FireState::Unburned; width * height],
            width,
            height,
        }
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// States in row-major order
    pub fn as_slice(&self) -> &[FireState] {
        &self.states
    }

    /// State at `(x, y)`
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the field
    pub fn get(&self, x: usize, y: usize) -> FireState {
        assert!(x < self.width && y < self.height, "FireStateField::get out of bounds");
        self.states[y * self.width + x]
    }

    /// Set the state at `(x, y)`
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the field
    pub fn set(&mut self, x: usize, y: usize, state: FireState) {
        assert!(x < self.width && y < self.height, "FireStateField::set out of bounds");
        self.states[y * self.width + x] = state;
    }

    /// Number of cells in `state`
    pub fn count(&self, state: FireState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    /// Cells never touched by fire
    pub fn unburned_count(&self) -> usize {
        self.count(FireState::Unburned)
    }

    /// Cells burning or burned
    pub fn affected_count(&self) -> usize {
        self.states.len() - self.unburned_count()
    }

    /// Whether any cell is still burning
    pub fn has_active_fire(&self) -> bool {
        self.states.contains(&FireState::Burning)
    }

    /// Render as text, one row per line (`.` unburned, `*` burning, `#` burned)
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.states.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|s| s.glyph()));
            out.push('\n');
        }
        out
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [FireState] {
        &mut self.states
    }
}

/// Mutable state of one spread run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationContext {
    /// Current fire state of every cell
    pub fire_state: FireStateField,
    /// Current spread intensity of every cell
    pub intensity: FieldData,
    /// Ignition origin `(x, y)` used by reset
    pub origin: (usize, usize),
    /// Steps completed since the last reset
    pub step: usize,
}

impl SimulationContext {
    /// Context for `grid` with a single burning origin and uniform intensity
    ///
    /// # Errors
    /// Returns [`crate::CoreError::OutOfBounds`] if `origin` lies outside the grid
    pub fn new(grid: &FuelGrid, origin: (usize, usize), initial_intensity: f64) -> CoreResult<Self> {
        grid.check_bounds(origin.0, origin.1)?;
        let mut ctx = Self {
            fire_state: FireStateField::new(grid.width(), grid.height()),
            intensity: FieldData::new(grid.width(), grid.height()),
            origin,
            step: 0,
        };
        ctx.reset(initial_intensity);
        Ok(ctx)
    }

    /// Restore identical initial conditions: every cell unburned except the
    /// origin, which burns; intensity restored to `initial_intensity` everywhere
    pub fn reset(&mut self, initial_intensity: f64) {
        self.fire_state.as_mut_slice().fill(FireState::Unburned);
        self.fire_state
            .set(self.origin.0, self.origin.1, FireState::Burning);
        self.intensity.fill(initial_intensity.max(0.0));
        self.step = 0;
    }
}
