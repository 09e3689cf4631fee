//! Fixed-size 2D grid of fuel cells
//!
//! The grid is the environment every spread run and optimizer candidate operates
//! on. Its dimensions never change after construction. `Clone` produces a fully
//! independent deep copy, which the optimizer uses to give each candidate an
//! exclusive working environment.
//!
//! Cells are addressed as `(x, y)` = (column, row) and stored row-major.

use super::cell::Cell;
use crate::core_types::fuel::{FuelCode, FuelTable};
use crate::core_types::readings::{EnvironmentReadings, PartialReadings, ReadingsSource};
use crate::error::{CoreError, CoreResult};
use crate::simulation::state::FireStateField;
use serde::{Deserialize, Serialize};

/// Orthogonal neighbour offsets `(dx, dy)`: up, down, left, right
pub const NEIGHBORS_4: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Fixed-size grid of [`Cell`]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FuelGrid {
    /// Create a grid from row-major cells
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGrid`] for zero dimensions or a cell count that
    /// does not match `width × height`.
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidGrid(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        if cells.len() != width * height {
            return Err(CoreError::InvalidGrid(format!(
                "expected {} cells for {width}x{height}, got {}",
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid cell by cell
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGrid`] for zero dimensions
    pub fn from_fn(
        width: usize,
        height: usize,
        mut cell_at: impl FnMut(usize, usize) -> Cell,
    ) -> CoreResult<Self> {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(cell_at(x, y));
            }
        }
        Self::new(width, height, cells)
    }

    /// Build a grid from fuel codes and partial readings, resolving every code
    /// against the fuel table
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownFuelCode`] on the first code missing from the
    /// table, or [`CoreError::InvalidGrid`] for zero dimensions.
    pub fn from_codes(
        table: &FuelTable,
        width: usize,
        height: usize,
        mut describe: impl FnMut(usize, usize) -> (FuelCode, PartialReadings),
    ) -> CoreResult<Self> {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (code, readings) = describe(x, y);
                let fuel = *table.get(code)?;
                cells.push(Cell::new(fuel, readings.resolve()));
            }
        }
        Self::new(width, height, cells)
    }

    /// Grid with a single fuel code and identical readings everywhere
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownFuelCode`] if `code` is not in the table
    pub fn uniform(
        table: &FuelTable,
        code: FuelCode,
        readings: EnvironmentReadings,
        width: usize,
        height: usize,
    ) -> CoreResult<Self> {
        let fuel = *table.get(code)?;
        Self::from_fn(width, height, |_, _| Cell::new(fuel, readings))
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: grids have at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `(x, y)` lies inside the grid
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Row-major index of `(x, y)`
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`, or `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Mutable cell at `(x, y)`, or `None` outside the grid
    pub fn cell_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// In-bounds orthogonal neighbours of `(x, y)`, in [`NEIGHBORS_4`] order
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBORS_4.iter().filter_map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Validate that `(x, y)` is a cell of this grid
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] otherwise
    pub fn check_bounds(&self, x: usize, y: usize) -> CoreResult<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(CoreError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Boolean firebreak mask in row-major order
    pub fn firebreak_mask(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.firebreak).collect()
    }

    /// Number of cells covered by firebreaks
    pub fn firebreak_area(&self) -> usize {
        self.cells.iter().filter(|c| c.firebreak).count()
    }

    /// Number of orthogonal neighbours of `(x, y)` flagged as firebreak
    pub fn firebreak_neighbor_count(&self, x: usize, y: usize) -> usize {
        self.neighbors4(x, y)
            .filter(|&(nx, ny)| self.cells[self.index(nx, ny)].firebreak)
            .count()
    }

    /// Number of cells whose fuel can carry fire
    pub fn burnable_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_non_burnable()).count()
    }

    /// Re-read every cell's readings from an environment accessor and freeze them
    pub fn freeze_readings(&mut self, source: &impl ReadingsSource) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                self.cells[idx].readings = source.readings_at(x, y).resolve();
            }
        }
    }

    /// Record a run's fire states onto the cells (for snapshots and display)
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGrid`] if the field dimensions differ
    pub fn stamp_fire_states(&mut self, states: &FireStateField) -> CoreResult<()> {
        if states.width() != self.width || states.height() != self.height {
            return Err(CoreError::InvalidGrid(format!(
                "fire state field is {}x{}, grid is {}x{}",
                states.width(),
                states.height(),
                self.width,
                self.height
            )));
        }
        for (cell, state) in self.cells.iter_mut().zip(states.as_slice()) {
            cell.fire_state = *state;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::FuelGroup;
    use crate::simulation::state::FireState;

    fn grass_grid(width: usize, height: usize) -> FuelGrid {
        let table = FuelTable::scott_burgan();
        FuelGrid::uniform(
            &table,
            FuelCode::new(FuelGroup::Grass, 2),
            EnvironmentReadings::default(),
            width,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            FuelGrid::new(0, 3, Vec::new()),
            Err(CoreError::InvalidGrid(_))
        ));
        let grid = grass_grid(2, 2);
        let cells = grid.cells()[..3].to_vec();
        assert!(FuelGrid::new(2, 2, cells).is_err());
    }

    #[test]
    fn test_unknown_code_aborts_construction() {
        let table = FuelTable::scott_burgan();
        let result = FuelGrid::from_codes(&table, 3, 3, |x, _| {
            let number = if x == 2 { 99 } else { 1 };
            (FuelCode::new(FuelGroup::Grass, number), PartialReadings::default())
        });
        assert!(matches!(result, Err(CoreError::UnknownFuelCode(ref c)) if c == "GR99"));
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let grid = grass_grid(3, 3);
        let corner: Vec<_> = grid.neighbors4(0, 0).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);
        let centre: Vec<_> = grid.neighbors4(1, 1).collect();
        assert_eq!(centre, vec![(1, 0), (1, 2), (0, 1), (2, 1)]);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = grass_grid(4, 4);
        let mut copy = original.clone();
        copy.cell_mut(1, 1).unwrap().firebreak = true;
        assert_eq!(copy.firebreak_area(), 1);
        assert_eq!(original.firebreak_area(), 0);
    }

    #[test]
    fn test_freeze_readings_from_source() {
        let mut grid = grass_grid(3, 2);
        grid.freeze_readings(&|x: usize, y: usize| PartialReadings {
            wind_speed: Some((x + 10 * y) as f64),
            ..Default::default()
        });
        assert_eq!(grid.cell(2, 1).unwrap().readings.wind_speed, 12.0);
        assert_eq!(grid.cell(0, 0).unwrap().readings.wind_speed, 0.0);
    }

    #[test]
    fn test_stamp_fire_states() {
        let mut grid = grass_grid(2, 2);
        let mut states = FireStateField::new(2, 2);
        states.set(1, 0, FireState::Burned);
        grid.stamp_fire_states(&states).unwrap();
        assert_eq!(grid.cell(1, 0).unwrap().fire_state, FireState::Burned);
        assert!(grid.stamp_fire_states(&FireStateField::new(3, 3)).is_err());
    }
}
