//! Firebreak effectiveness
//!
//! Reduces the spread rate out of a firebreak-flagged cell. The continuous model
//! lets wider breaks block more fire, while steep slopes and strong wind let fire
//! jump more easily. The binary model is a coarse block-or-attenuate switch kept
//! for ablation runs.

use crate::grid::FuelGrid;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a firebreak-flagged cell modifies its outgoing spread rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FirebreakMode {
    /// Width, slope and wind dependent reduction
    Continuous {
        /// Break width (cells) at which the width ratio saturates at 1
        min_width: usize,
    },
    /// Block with probability `p_block`, otherwise scale by `attenuation`
    Binary { p_block: f64, attenuation: f64 },
}

impl Default for FirebreakMode {
    fn default() -> Self {
        FirebreakMode::Continuous { min_width: 2 }
    }
}

impl FirebreakMode {
    /// Binary mode with the standard blocking probability and attenuation
    pub const fn binary() -> Self {
        FirebreakMode::Binary {
            p_block: 0.9,
            attenuation: 0.1,
        }
    }
}

/// Fire-jump factor from slope (percent)
fn slope_jump_factor(slope: f64) -> f64 {
    if slope >= 20.0 {
        0.7
    } else if slope >= 10.0 {
        0.4
    } else {
        0.2
    }
}

/// Fire-jump factor from wind speed
fn wind_jump_factor(wind_speed: f64) -> f64 {
    if wind_speed > 15.0 {
        0.6
    } else if wind_speed > 8.0 {
        0.3
    } else {
        0.1
    }
}

/// Continuous firebreak reduction
///
/// # Formula
/// ```text
/// local_width = 1 + flagged_neighbors
/// width_ratio = min(1, local_width / (min_width + 1))
/// reduction   = 1 - width_ratio × (1 - slope_factor) × (1 - wind_factor)
/// ROS'        = ROS × reduction
/// ```
///
/// # Arguments
/// * `ros` - Unadjusted rate of spread
/// * `flagged_neighbors` - Orthogonal neighbours that are also firebreak cells
/// * `slope` - Slope (%) of the firebreak cell
/// * `wind_speed` - Wind speed at the firebreak cell
/// * `min_width` - Width at which the break reaches full effect
pub fn adjust_ros_continuous(
    ros: f64,
    flagged_neighbors: usize,
    slope: f64,
    wind_speed: f64,
    min_width: usize,
) -> f64 {
    let local_width = (1 + flagged_neighbors) as f64;
    let width_ratio = (local_width / (min_width + 1) as f64).min(1.0);
    let reduction = 1.0
        - width_ratio * (1.0 - slope_jump_factor(slope)) * (1.0 - wind_jump_factor(wind_speed));
    ros * reduction
}

/// Binary firebreak adjustment, consuming exactly one draw from `rng`
pub fn adjust_ros_binary<R: Rng + ?Sized>(
    ros: f64,
    p_block: f64,
    attenuation: f64,
    rng: &mut R,
) -> f64 {
    if rng.random::<f64>() < p_block {
        0.0
    } else {
        ros * attenuation
    }
}

/// Adjust the spread rate out of cell `(x, y)` if it is firebreak-flagged
///
/// Unflagged cells return `ros` unchanged without touching `rng`.
pub fn adjust_ros<R: Rng + ?Sized>(
    mode: FirebreakMode,
    grid: &FuelGrid,
    x: usize,
    y: usize,
    ros: f64,
    rng: &mut R,
) -> f64 {
    let Some(cell) = grid.cell(x, y) else {
        return ros;
    };
    if !cell.firebreak {
        return ros;
    }
    match mode {
        FirebreakMode::Continuous { min_width } => adjust_ros_continuous(
            ros,
            grid.firebreak_neighbor_count(x, y),
            *cell.readings.slope,
            cell.readings.wind_speed,
            min_width,
        ),
        FirebreakMode::Binary {
            p_block,
            attenuation,
        } => adjust_ros_binary(ros, p_block, attenuation, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::rng::seeded_rng;
    use approx::assert_relative_eq;

    #[test]
    fn test_isolated_cell_on_flat_calm_ground() {
        // width_ratio = 1/3, reduction = 1 - (1/3)(0.8)(0.9) = 0.76
        let adjusted = adjust_ros_continuous(10.0, 0, 0.0, 0.0, 2);
        assert_relative_eq!(adjusted, 7.6, max_relative = 1e-12);
    }

    #[test]
    fn test_wide_break_saturates() {
        let two = adjust_ros_continuous(10.0, 2, 0.0, 0.0, 2);
        let four = adjust_ros_continuous(10.0, 4, 0.0, 0.0, 2);
        assert_relative_eq!(two, four);
        assert_relative_eq!(two, 10.0 * (1.0 - 0.8 * 0.9), max_relative = 1e-12);
    }

    #[test]
    fn test_slope_and_wind_weaken_the_break() {
        let calm = adjust_ros_continuous(10.0, 2, 0.0, 0.0, 2);
        let steep = adjust_ros_continuous(10.0, 2, 25.0, 0.0, 2);
        let windy = adjust_ros_continuous(10.0, 2, 0.0, 20.0, 2);
        assert!(steep > calm);
        assert!(windy > calm);
        assert_relative_eq!(steep, 10.0 * (1.0 - 0.3 * 0.9), max_relative = 1e-12);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(slope_jump_factor(10.0), 0.4);
        assert_eq!(slope_jump_factor(9.99), 0.2);
        assert_eq!(wind_jump_factor(15.0), 0.3);
        assert_eq!(wind_jump_factor(8.0), 0.1);
    }

    #[test]
    fn test_binary_mode_blocks_or_attenuates() {
        let mut rng = seeded_rng(7);
        for _ in 0..200 {
            let adjusted = adjust_ros_binary(10.0, 0.9, 0.1, &mut rng);
            assert!(adjusted == 0.0 || (adjusted - 1.0).abs() < 1e-12);
        }
        assert_eq!(adjust_ros_binary(10.0, 1.0, 0.1, &mut rng), 0.0);
        assert_relative_eq!(adjust_ros_binary(10.0, 0.0, 0.1, &mut rng), 1.0);
    }
}
