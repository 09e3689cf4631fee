//! Firebreak candidates and the search objective

use crate::firebreak::{FirebreakLine, DIRECTIONS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of firebreak area in the objective, relative to unburned area
pub const FIREBREAK_AREA_PENALTY: f64 = 0.001;

/// Position steps explored around a candidate
const POSITION_DELTAS: [isize; 3] = [-1, 0, 1];
/// Angle steps explored around a candidate (degrees)
const ANGLE_DELTAS: [i32; 3] = [-45, 0, 45];
/// Length steps explored around a candidate (cells)
const LENGTH_DELTAS: [isize; 3] = [-2, 0, 2];

/// One firebreak candidate: start cell, direction and length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirebreakParams {
    pub x: usize,
    pub y: usize,
    /// Direction in degrees, one of the eight 45° directions
    pub angle: u16,
    pub length: usize,
}

impl FirebreakParams {
    /// Unapplied line for this candidate
    pub fn line(&self) -> FirebreakLine {
        FirebreakLine::new(
            (self.x as isize, self.y as isize),
            f64::from(self.angle),
            self.length,
        )
    }

    /// Uniformly random candidate inside a `width × height` grid
    ///
    /// # Arguments
    /// * `lengths` - Inclusive `(min, max)` length range
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        lengths: (usize, usize),
        rng: &mut R,
    ) -> Self {
        let x = rng.random_range(0..width.max(1));
        let y = rng.random_range(0..height.max(1));
        let angle = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())] as u16;
        let length = rng.random_range(lengths.0..=lengths.1.max(lengths.0));
        Self {
            x,
            y,
            angle,
            length,
        }
    }

    /// All 80 single-move variations of this candidate
    ///
    /// Each of position x, position y, angle and length moves by one step (or
    /// stays); the unchanged candidate is excluded. Positions are clamped to the
    /// grid, angles wrap modulo 360 and lengths are clamped to `lengths`.
    pub fn neighborhood(&self, width: usize, height: usize, lengths: (usize, usize)) -> Vec<Self> {
        let mut out = Vec::with_capacity(80);
        for dx in POSITION_DELTAS {
            for dy in POSITION_DELTAS {
                for d_angle in ANGLE_DELTAS {
                    for d_len in LENGTH_DELTAS {
                        if dx == 0 && dy == 0 && d_angle == 0 && d_len == 0 {
                            continue;
                        }
                        out.push(Self {
                            x: clamp_offset(self.x, dx, 0, width.saturating_sub(1)),
                            y: clamp_offset(self.y, dy, 0, height.saturating_sub(1)),
                            angle: (i32::from(self.angle) + d_angle).rem_euclid(360) as u16,
                            length: clamp_offset(self.length, d_len, lengths.0, lengths.1),
                        });
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for FirebreakParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start=({}, {}) angle={}° length={}",
            self.x, self.y, self.angle, self.length
        )
    }
}

fn clamp_offset(value: usize, delta: isize, min: usize, max: usize) -> usize {
    value.saturating_add_signed(delta).clamp(min, max.max(min))
}

/// Search objective: reward unburned area, lightly penalize firebreak area
///
/// # Formula
/// ```text
/// cost = unburned / total - 0.001 × firebreak_area / total
/// ```
///
/// Higher is better.
pub fn objective(unburned: usize, firebreak_area: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    unburned as f64 / total - FIREBREAK_AREA_PENALTY * (firebreak_area as f64 / total)
}
