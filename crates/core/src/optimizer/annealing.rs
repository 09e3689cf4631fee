//! Simulated annealing over firebreak placements
//!
//! The search keeps one current candidate and repeatedly tries a random
//! single-move variation of it. Every trial rasterizes the firebreak onto a fresh
//! clone of the baseline grid and runs a full spread simulation from the same
//! ignition point, so the baseline is never modified and trials cannot leak into
//! each other.
//!
//! Trials in which the fire barely spreads say nothing about the firebreak and are
//! redrawn. Acceptance is scored against the best cost seen so far.

use super::params::{objective, FirebreakParams};
use crate::core_types::rng::seeded_rng;
use crate::error::{CoreError, CoreResult};
use crate::grid::FuelGrid;
use crate::simulation::persistence::{GridSnapshot, SnapshotStore};
use crate::simulation::{FireSpreadSimulator, SimulationContext, SpreadConfig};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Annealing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub max_iterations: usize,
    pub initial_temperature: f64,
    /// Multiplicative cooling per iteration, in (0, 1)
    pub cooling_rate: f64,
    /// Evaluations per iteration before the iteration is skipped
    pub max_retries: usize,
    /// Shortest firebreak the neighbourhood may produce
    pub min_length: usize,
    /// Longest firebreak the neighbourhood may produce
    pub max_length: usize,
    /// Shortest length of the random starting candidate
    pub initial_min_length: usize,
    /// Minimum share of the grid that must burn for a trial to count
    pub min_burned_fraction: f64,
    /// Burned cells required beyond the firebreak length for a trial to count
    pub burn_margin: usize,
    /// When set, every evaluation runs on a fresh RNG with this seed
    pub evaluation_seed: Option<u64>,
    /// Optional wall-clock budget for the whole search
    pub max_duration: Option<Duration>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            initial_temperature: 1.0,
            cooling_rate: 0.95,
            max_retries: 10,
            min_length: 5,
            max_length: 25,
            initial_min_length: 10,
            min_burned_fraction: 20.0 / 900.0,
            burn_margin: 20,
            evaluation_seed: None,
            max_duration: None,
        }
    }
}

impl OptimizerConfig {
    /// Reject parameter combinations the search cannot run with
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] describing the first problem found
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |msg: String| Err(CoreError::InvalidConfig(msg));
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return invalid(format!(
                "initial temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return invalid(format!(
                "cooling rate must lie in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.max_retries == 0 {
            return invalid("max retries must be at least 1".to_string());
        }
        if self.min_length == 0 || self.min_length > self.max_length {
            return invalid(format!(
                "length range [{}, {}] is empty",
                self.min_length, self.max_length
            ));
        }
        if self.initial_min_length < self.min_length || self.initial_min_length > self.max_length
        {
            return invalid(format!(
                "initial minimum length {} lies outside [{}, {}]",
                self.initial_min_length, self.min_length, self.max_length
            ));
        }
        if !(0.0..=1.0).contains(&self.min_burned_fraction) {
            return invalid(format!(
                "minimum burned fraction must lie in [0, 1], got {}",
                self.min_burned_fraction
            ));
        }
        Ok(())
    }

    fn length_range(&self) -> (usize, usize) {
        (self.min_length, self.max_length)
    }

    /// Smallest burned-cell count accepted on a grid of `total` cells
    fn min_burned_cells(&self, total: usize) -> usize {
        (self.min_burned_fraction * total as f64 - 1e-9).ceil().max(0.0) as usize
    }
}

/// What happened in one annealing iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IterationOutcome {
    Accepted,
    Rejected,
    /// No valid trial within the retry limit
    Skipped,
}

/// History entry for one annealing iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    /// Temperature the iteration ran at
    pub temperature: f64,
    /// Last candidate evaluated
    pub params: FirebreakParams,
    pub outcome: IterationOutcome,
    /// Evaluations spent, including retries
    pub attempts: usize,
    /// Objective of the final trial, `None` when skipped
    pub cost: Option<f64>,
    pub unburned: usize,
    /// Best objective after this iteration
    pub best_cost: Option<f64>,
}

/// Result of a full search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_params: Option<FirebreakParams>,
    pub best_cost: Option<f64>,
    pub best_unburned: Option<usize>,
    pub best_firebreak_area: Option<usize>,
    /// Grid with the best firebreak and its burn pattern
    pub best_snapshot: Option<GridSnapshot>,
    /// Unburned cells of the run without any firebreak
    pub baseline_unburned: usize,
    pub total_cells: usize,
    pub history: Vec<IterationRecord>,
}

impl OptimizationResult {
    /// Write the best snapshot to `store` under `key`
    ///
    /// Returns `false` without writing when nothing was ever accepted.
    ///
    /// # Errors
    /// Propagates storage errors
    pub fn persist(&self, store: &mut impl SnapshotStore, key: &str) -> CoreResult<bool> {
        match &self.best_snapshot {
            Some(snapshot) => {
                store.save(key, snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Unburned cells gained over the baseline by the best firebreak
    pub fn improvement(&self) -> Option<isize> {
        self.best_unburned
            .map(|u| u as isize - self.baseline_unburned as isize)
    }
}

/// One evaluated trial
struct Trial {
    grid: FuelGrid,
    ctx: SimulationContext,
    unburned: usize,
    burned: usize,
    firebreak_area: usize,
}

/// Outcome of one iteration's retry loop
struct Draw {
    /// Last candidate evaluated
    candidate: FirebreakParams,
    attempts: usize,
    last_unburned: usize,
    valid: Option<Trial>,
}

/// Simulated annealing search for a single firebreak line
#[derive(Debug, Clone)]
pub struct FirebreakOptimizer {
    config: OptimizerConfig,
    simulator: FireSpreadSimulator,
}

impl FirebreakOptimizer {
    /// Create an optimizer
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] if `config` fails validation
    pub fn new(config: OptimizerConfig, spread: SpreadConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            simulator: FireSpreadSimulator::new(spread),
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn simulator(&self) -> &FireSpreadSimulator {
        &self.simulator
    }

    /// Simulate one candidate (or the bare baseline) on a clone of `baseline`
    fn evaluate<R: Rng + ?Sized>(
        &self,
        baseline: &FuelGrid,
        origin: (usize, usize),
        params: Option<&FirebreakParams>,
        rng: &mut R,
    ) -> CoreResult<Trial> {
        let mut grid = baseline.clone();
        if let Some(params) = params {
            params.line().apply(&mut grid);
        }

        let mut ctx = self.simulator.context(&grid, origin)?;
        let last = match self.config.evaluation_seed {
            Some(seed) => self
                .simulator
                .run_final(&grid, &mut ctx, &mut seeded_rng(seed)),
            None => self.simulator.run_final(&grid, &mut ctx, rng),
        };

        let unburned = last.unburned_count();
        Ok(Trial {
            burned: grid.len() - unburned,
            firebreak_area: grid.firebreak_area(),
            unburned,
            grid,
            ctx,
        })
    }

    fn is_valid(&self, trial: &Trial, params: &FirebreakParams, total: usize) -> bool {
        trial.burned >= self.config.min_burned_cells(total)
            && trial.burned > params.length + self.config.burn_margin
    }

    /// Evaluate random picks from `neighbors` until one is valid or the retry
    /// limit is reached
    fn draw_trial<R: Rng + ?Sized>(
        &self,
        baseline: &FuelGrid,
        origin: (usize, usize),
        neighbors: &[FirebreakParams],
        iteration: usize,
        rng: &mut R,
    ) -> CoreResult<Draw> {
        let total = baseline.len();
        let mut candidate = neighbors[rng.random_range(0..neighbors.len())];
        let mut attempts = 0;
        let mut last_unburned = total;

        while attempts < self.config.max_retries {
            attempts += 1;
            let trial = self.evaluate(baseline, origin, Some(&candidate), rng)?;
            last_unburned = trial.unburned;
            if self.is_valid(&trial, &candidate, total) {
                return Ok(Draw {
                    candidate,
                    attempts,
                    last_unburned,
                    valid: Some(trial),
                });
            }
            debug!(
                "[Step {}] Retry {}/{}: fire did not spread ({} unburned) for {}",
                iteration, attempts, self.config.max_retries, trial.unburned, candidate
            );
            if attempts < self.config.max_retries {
                candidate = neighbors[rng.random_range(0..neighbors.len())];
            }
        }

        Ok(Draw {
            candidate,
            attempts,
            last_unburned,
            valid: None,
        })
    }

    /// Search for the firebreak that leaves the most of `baseline` unburned when
    /// fire starts at `origin`
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] if `origin` lies outside the grid
    pub fn run<R: Rng + ?Sized>(
        &self,
        baseline: &FuelGrid,
        origin: (usize, usize),
        rng: &mut R,
    ) -> CoreResult<OptimizationResult> {
        let started = Instant::now();
        let (width, height) = (baseline.width(), baseline.height());
        let total = baseline.len();
        let lengths = self.config.length_range();

        let bare = self.evaluate(baseline, origin, None, rng)?;
        info!(
            "Baseline unburned area: {}/{} ({} cells burned without a firebreak)",
            bare.unburned, total, bare.burned
        );
        info!(
            "Starting simulated annealing: {} iterations, T0={}, cooling={}",
            self.config.max_iterations, self.config.initial_temperature, self.config.cooling_rate
        );

        let mut current = FirebreakParams::random(
            width,
            height,
            (self.config.initial_min_length, self.config.max_length),
            rng,
        );
        let mut temperature = self.config.initial_temperature;
        let mut best_cost = f64::NEG_INFINITY;
        let mut result = OptimizationResult {
            best_params: None,
            best_cost: None,
            best_unburned: None,
            best_firebreak_area: None,
            best_snapshot: None,
            baseline_unburned: bare.unburned,
            total_cells: total,
            history: Vec::with_capacity(self.config.max_iterations),
        };

        for iteration in 0..self.config.max_iterations {
            if let Some(budget) = self.config.max_duration {
                if started.elapsed() >= budget {
                    warn!(
                        "Optimization stopped after {} iterations: wall-clock budget of {:?} exhausted",
                        iteration, budget
                    );
                    break;
                }
            }

            let neighbors = current.neighborhood(width, height, lengths);
            let Draw {
                candidate,
                attempts,
                last_unburned,
                valid,
            } = self.draw_trial(baseline, origin, &neighbors, iteration, rng)?;

            let mut record = IterationRecord {
                iteration,
                temperature,
                params: candidate,
                outcome: IterationOutcome::Skipped,
                attempts,
                cost: None,
                unburned: last_unburned,
                best_cost: result.best_cost,
            };

            let Some(trial) = valid else {
                debug!(
                    "[Step {}] Skipped: fire did not spread after {} attempts",
                    iteration, attempts
                );
                result.history.push(record);
                continue;
            };

            let cost = objective(trial.unburned, trial.firebreak_area, total);
            let diff = cost - best_cost;
            let accepted = diff > 0.0 || rng.random::<f64>() < (diff / temperature).exp();

            if accepted {
                current = candidate;
                if cost > best_cost {
                    best_cost = cost;
                    result.best_params = Some(candidate);
                    result.best_cost = Some(cost);
                    result.best_unburned = Some(trial.unburned);
                    result.best_firebreak_area = Some(trial.firebreak_area);
                    result.best_snapshot =
                        Some(GridSnapshot::capture(&trial.grid, &trial.ctx)?);
                    info!(
                        "[Step {}] New best cost {:.4}: {} ({} unburned, {} firebreak cells)",
                        iteration, cost, candidate, trial.unburned, trial.firebreak_area
                    );
                }
            }

            record.outcome = if accepted {
                IterationOutcome::Accepted
            } else {
                IterationOutcome::Rejected
            };
            record.cost = Some(cost);
            record.best_cost = result.best_cost;
            debug!(
                "[Step {}] Temp: {:.4} | Cost: {:.4} | Best: {:.4} | {:?} | {} | Unburned: {}",
                iteration,
                temperature,
                cost,
                best_cost,
                record.outcome,
                candidate,
                trial.unburned
            );
            result.history.push(record);

            temperature *= self.config.cooling_rate;
        }

        match (&result.best_params, result.best_cost) {
            (Some(params), Some(cost)) => info!(
                "Optimization complete: best {} with cost {:.4}, unburned {}/{} (baseline {})",
                params,
                cost,
                result.best_unburned.unwrap_or_default(),
                total,
                result.baseline_unburned
            ),
            _ => info!("Optimization complete: no valid firebreak found"),
        }

        Ok(result)
    }
}
