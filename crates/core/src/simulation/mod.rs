//! Stochastic cellular-automaton fire spread
//!
//! `FireSpreadSimulator` advances a [`SimulationContext`] over a [`FuelGrid`] in
//! synchronous steps. Each step is computed from a snapshot of the previous one:
//! - every burning cell burns out
//! - each burning cell ignites each unburned, burnable orthogonal neighbour with
//!   probability `min(ROS × intensity / max_ros_reference, 1)`
//! - the intensity field decays linearly and is zero on burned cells
//!
//! The simulator itself is stateless apart from its configuration; runs share
//! nothing and take randomness from the caller.

pub mod ensemble;
pub mod persistence;
pub mod state;

pub use persistence::{GridSnapshot, JsonFileStore, MemoryStore, SnapshotStore};
pub use state::{FireState, FireStateField, SimulationContext};

use crate::error::CoreResult;
use crate::grid::FuelGrid;
use crate::physics::firebreak_effect::{adjust_ros, FirebreakMode};
use crate::physics::rothermel::{rate_of_spread_with, RosVariant};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Spread simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadConfig {
    /// Intensity of every cell after a reset
    pub initial_intensity: f64,
    /// Linear intensity decay per step
    pub decay_rate: f64,
    /// ROS × intensity at which spread becomes certain
    pub max_ros_reference: f64,
    /// Steps per run
    pub iterations: usize,
    /// Optional wall-clock budget per run, checked between steps
    pub max_duration: Option<Duration>,
    pub firebreak_mode: FirebreakMode,
    pub ros_variant: RosVariant,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            initial_intensity: 1.0,
            decay_rate: 0.02,
            max_ros_reference: 100.0,
            iterations: 30,
            max_duration: None,
            firebreak_mode: FirebreakMode::default(),
            ros_variant: RosVariant::Canonical,
        }
    }
}

/// Cellular-automaton fire spread over a fuel grid
#[derive(Debug, Clone, Default)]
pub struct FireSpreadSimulator {
    config: SpreadConfig,
}

impl FireSpreadSimulator {
    /// Create a simulator with the given configuration
    pub fn new(config: SpreadConfig) -> Self {
        Self { config }
    }

    /// Simulation parameters
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Fresh context for `grid` with a single burning cell at `origin`
    ///
    /// # Errors
    /// Returns [`crate::CoreError::OutOfBounds`] if `origin` lies outside the grid
    pub fn context(&self, grid: &FuelGrid, origin: (usize, usize)) -> CoreResult<SimulationContext> {
        SimulationContext::new(grid, origin, self.config.initial_intensity)
    }

    /// Restore the context to its initial conditions
    pub fn reset(&self, ctx: &mut SimulationContext) {
        ctx.reset(self.config.initial_intensity);
    }

    /// Spread probability out of a burning cell
    fn spread_probability<R: Rng + ?Sized>(
        &self,
        grid: &FuelGrid,
        ctx: &SimulationContext,
        x: usize,
        y: usize,
        rng: &mut R,
    ) -> f64 {
        let Some(cell) = grid.cell(x, y) else {
            return 0.0;
        };
        let rate = rate_of_spread_with(self.config.ros_variant, &cell.fuel, &cell.readings);
        let ros = adjust_ros(self.config.firebreak_mode, grid, x, y, rate.ros, rng);
        if self.config.max_ros_reference <= 0.0 {
            return if ros > 0.0 { 1.0 } else { 0.0 };
        }
        (ros * ctx.intensity.get(x, y) / self.config.max_ros_reference).clamp(0.0, 1.0)
    }

    /// Advance the context by one synchronous step
    ///
    /// Returns the number of cells ignited in this step.
    ///
    /// # Panics
    /// Panics if the context was built for a grid with different dimensions
    pub fn step<R: Rng + ?Sized>(
        &self,
        grid: &FuelGrid,
        ctx: &mut SimulationContext,
        rng: &mut R,
    ) -> usize {
        assert!(
            ctx.fire_state.width() == grid.width() && ctx.fire_state.height() == grid.height(),
            "simulation context does not match grid dimensions"
        );

        let previous = ctx.fire_state.clone();
        let mut ignited = 0;

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if previous.get(x, y) != FireState::Burning {
                    continue;
                }
                ctx.fire_state.set(x, y, FireState::Burned);

                let probability = self.spread_probability(grid, ctx, x, y, rng);
                for (nx, ny) in grid.neighbors4(x, y) {
                    if previous.get(nx, ny) != FireState::Unburned {
                        continue;
                    }
                    if grid.cell(nx, ny).is_none_or(|c| c.is_non_burnable()) {
                        continue;
                    }
                    if rng.random::<f64>() < probability
                        && ctx.fire_state.get(nx, ny) == FireState::Unburned
                    {
                        ctx.fire_state.set(nx, ny, FireState::Burning);
                        ignited += 1;
                    }
                }
            }
        }

        ctx.intensity.decay_linear(self.config.decay_rate);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if ctx.fire_state.get(x, y) == FireState::Burned {
                    ctx.intensity.set(x, y, 0.0);
                }
            }
        }

        ctx.step += 1;
        ignited
    }

    /// Run the configured number of steps from the context's current state,
    /// returning the fire state after every completed step
    ///
    /// Stops early, with a warning, if the wall-clock budget runs out.
    pub fn run<R: Rng + ?Sized>(
        &self,
        grid: &FuelGrid,
        ctx: &mut SimulationContext,
        rng: &mut R,
    ) -> Vec<FireStateField> {
        let mut frames = Vec::with_capacity(self.config.iterations);
        self.drive(grid, ctx, rng, |ctx| frames.push(ctx.fire_state.clone()));
        frames
    }

    /// Run the configured number of steps and return only the final fire state
    pub fn run_final<R: Rng + ?Sized>(
        &self,
        grid: &FuelGrid,
        ctx: &mut SimulationContext,
        rng: &mut R,
    ) -> FireStateField {
        self.drive(grid, ctx, rng, |_| {});
        ctx.fire_state.clone()
    }

    fn drive<R: Rng + ?Sized>(
        &self,
        grid: &FuelGrid,
        ctx: &mut SimulationContext,
        rng: &mut R,
        mut on_step: impl FnMut(&SimulationContext),
    ) {
        let started = Instant::now();
        for _ in 0..self.config.iterations {
            if let Some(budget) = self.config.max_duration {
                if started.elapsed() >= budget {
                    warn!(
                        "Spread run stopped after {} steps: wall-clock budget of {:?} exhausted",
                        ctx.step, budget
                    );
                    break;
                }
            }
            self.step(grid, ctx, rng);
            on_step(ctx);
        }
        debug!(
            "Spread run finished at step {}: {} cells affected",
            ctx.step,
            ctx.fire_state.affected_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::{FuelCode, FuelGroup, FuelTable};
    use crate::core_types::readings::EnvironmentReadings;
    use crate::core_types::rng::seeded_rng;
    use crate::firebreak::place_firebreak;

    fn grass(width: usize, height: usize) -> FuelGrid {
        FuelGrid::uniform(
            &FuelTable::scott_burgan(),
            FuelCode::new(FuelGroup::Grass, 2),
            EnvironmentReadings::bone_dry(),
            width,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_first_step_burns_origin_and_ignites_neighbors() {
        let grid = grass(3, 3);
        let sim = FireSpreadSimulator::default();
        let mut ctx = sim.context(&grid, (1, 1)).unwrap();
        let ignited = sim.step(&grid, &mut ctx, &mut seeded_rng(1));

        assert_eq!(ignited, 4);
        assert_eq!(ctx.fire_state.get(1, 1), FireState::Burned);
        assert_eq!(ctx.fire_state.count(FireState::Burning), 4);
        assert_eq!(ctx.fire_state.get(0, 0), FireState::Unburned);
        assert_eq!(ctx.intensity.get(1, 1), 0.0);
        assert!((ctx.intensity.get(0, 0) - 0.98).abs() < 1e-12);
        assert_eq!(ctx.step, 1);
    }

    #[test]
    fn test_non_burnable_neighbors_never_ignite() {
        let mut grid = grass(5, 5);
        place_firebreak(&mut grid, (2, 0), 90.0, 5);
        let sim = FireSpreadSimulator::default();
        let mut ctx = sim.context(&grid, (0, 2)).unwrap();
        let last = sim.run_final(&grid, &mut ctx, &mut seeded_rng(3));
        for y in 0..5 {
            for x in 2..5 {
                assert_eq!(last.get(x, y), FireState::Unburned, "({x}, {y})");
            }
        }
        assert_eq!(last.count(FireState::Burned), 10);
    }

    #[test]
    fn test_zero_budget_stops_before_first_step() {
        let grid = grass(4, 4);
        let sim = FireSpreadSimulator::new(SpreadConfig {
            max_duration: Some(Duration::ZERO),
            ..SpreadConfig::default()
        });
        let mut ctx = sim.context(&grid, (0, 0)).unwrap();
        let frames = sim.run(&grid, &mut ctx, &mut seeded_rng(0));
        assert!(frames.is_empty());
        assert_eq!(ctx.step, 0);
    }

    #[test]
    fn test_reset_restores_initial_conditions() {
        let grid = grass(4, 4);
        let sim = FireSpreadSimulator::default();
        let fresh = sim.context(&grid, (2, 1)).unwrap();
        let mut ctx = fresh.clone();
        sim.run(&grid, &mut ctx, &mut seeded_rng(9));
        assert_ne!(ctx, fresh);
        sim.reset(&mut ctx);
        assert_eq!(ctx, fresh);
    }

    #[test]
    fn test_frames_per_iteration() {
        let grid = grass(6, 6);
        let sim = FireSpreadSimulator::new(SpreadConfig {
            iterations: 7,
            ..SpreadConfig::default()
        });
        let mut ctx = sim.context(&grid, (0, 0)).unwrap();
        let frames = sim.run(&grid, &mut ctx, &mut seeded_rng(5));
        assert_eq!(frames.len(), 7);
        assert_eq!(frames.last(), Some(&ctx.fire_state));
    }
}
