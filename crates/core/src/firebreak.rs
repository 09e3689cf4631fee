//! Firebreak placement
//!
//! A firebreak is a straight line of cells rasterized from a start cell along one
//! of eight compass directions. Covered cells are converted to the non-burnable
//! `NB` fuel, painted white and flagged. The line remembers what each covered cell
//! held so it can be cleared again without touching anything else on the grid.

use crate::core_types::fuel::{FuelCode, FuelModel};
use crate::core_types::units::Degrees;
use crate::grid::{FuelGrid, FIREBREAK_COLOR};
use serde::{Deserialize, Serialize};

/// The eight placement directions in degrees
pub const DIRECTIONS: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Snap an angle to the nearest of the eight 45° directions
///
/// Distance is measured on the plain number line with no wrap-around, so 350
/// snaps to 315 and negative angles snap to 0. An angle exactly halfway between
/// two directions snaps to the smaller one (22.5 → 0, 337.5 → 315).
pub fn snap_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut best = DIRECTIONS[0];
    for &direction in &DIRECTIONS[1..] {
        if (direction - degrees).abs() < (best - degrees).abs() {
            best = direction;
        }
    }
    best
}

/// Unit step `(dx, dy)` for a snapped angle
///
/// 0° steps along +x, 90° along +y.
pub fn step_vector(snapped_degrees: f64) -> (isize, isize) {
    let radians = Degrees::new(snapped_degrees).to_radians();
    (radians.cos().round() as isize, radians.sin().round() as isize)
}

/// Cell contents overwritten by a firebreak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct SavedCell {
    x: usize,
    y: usize,
    fuel: FuelModel,
    color: [u8; 3],
    firebreak: bool,
}

/// A straight firebreak line and the cells it currently covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirebreakLine {
    start: (isize, isize),
    angle: f64,
    length: usize,
    saved: Vec<SavedCell>,
}

impl FirebreakLine {
    /// New, not yet applied line
    ///
    /// # Arguments
    /// * `start` - Start cell `(x, y)`; may lie outside the grid
    /// * `angle` - Direction in degrees, snapped to the nearest 45°
    /// * `length` - Number of positions visited along the line
    pub fn new(start: (isize, isize), angle: f64, length: usize) -> Self {
        Self {
            start,
            angle: snap_angle(angle),
            length,
            saved: Vec::new(),
        }
    }

    /// Start cell `(x, y)`
    pub fn start(&self) -> (isize, isize) {
        self.start
    }

    /// Snapped direction in degrees
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Number of positions visited along the line
    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether the line currently has cells marked on a grid
    pub fn is_applied(&self) -> bool {
        !self.saved.is_empty()
    }

    /// Cells currently covered, in placement order
    pub fn covered_cells(&self) -> Vec<(usize, usize)> {
        self.saved.iter().map(|s| (s.x, s.y)).collect()
    }

    /// Mark the line on `grid`
    ///
    /// Positions outside the grid are skipped but still count toward the length.
    /// Applying a line that is already applied clears it first, so repeated
    /// application leaves the grid unchanged.
    pub fn apply(&mut self, grid: &mut FuelGrid) {
        self.clear(grid);

        let (dx, dy) = step_vector(self.angle);
        let (mut x, mut y) = self.start;
        let break_fuel = FuelModel::non_burnable(FuelCode::NON_BURNABLE);

        for _ in 0..self.length {
            if grid.in_bounds(x, y) {
                let (ux, uy) = (x as usize, y as usize);
                if let Some(cell) = grid.cell_mut(ux, uy) {
                    self.saved.push(SavedCell {
                        x: ux,
                        y: uy,
                        fuel: cell.fuel,
                        color: cell.color,
                        firebreak: cell.firebreak,
                    });
                    cell.fuel = break_fuel;
                    cell.color = FIREBREAK_COLOR;
                    cell.firebreak = true;
                }
            }
            x += dx;
            y += dy;
        }
    }

    /// Restore every covered cell to what it held before [`Self::apply`]
    ///
    /// Only the covered cells are touched. Clearing an unapplied line is a no-op.
    pub fn clear(&mut self, grid: &mut FuelGrid) {
        for saved in self.saved.drain(..).rev() {
            if let Some(cell) = grid.cell_mut(saved.x, saved.y) {
                cell.fuel = saved.fuel;
                cell.color = saved.color;
                cell.firebreak = saved.firebreak;
            }
        }
    }
}

/// Rasterize a firebreak onto `grid` and return the applied line
pub fn place_firebreak(
    grid: &mut FuelGrid,
    start: (isize, isize),
    angle: f64,
    length: usize,
) -> FirebreakLine {
    let mut line = FirebreakLine::new(start, angle, length);
    line.apply(grid);
    line
}
