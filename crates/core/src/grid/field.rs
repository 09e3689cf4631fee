//! Scalar field over the simulation grid
//!
//! Stores 2D field data as a flat `Vec<f64>` in row-major order. Used for the
//! fire intensity field and for ensemble burn-probability maps.

use serde::{Deserialize, Serialize};

/// Scalar field in row-major order (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    /// Field values in row-major order (y * width + x)
    pub data: Vec<f64>,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl FieldData {
    /// Create a new field with given dimensions, initialized to zero
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, 0.0)
    }

    /// Create a new field with given dimensions, initialized to a value
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    /// * `value` - Initial value for all cells
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the field
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        assert!(x < self.width && y < self.height, "FieldData::get out of bounds");
        self.data[y * self.width + x]
    }

    /// Set value at grid position
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the field
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        assert!(x < self.width && y < self.height, "FieldData::set out of bounds");
        self.data[y * self.width + x] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Subtract `amount` from every cell, flooring at zero
    pub fn decay_linear(&mut self, amount: f64) {
        for v in &mut self.data {
            *v = (*v - amount).max(0.0);
        }
    }

    /// Maximum value in the field (0 for an empty field)
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}
