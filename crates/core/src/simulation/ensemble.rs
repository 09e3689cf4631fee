//! Ensemble runs
//!
//! Repeats the same ignition with independent seeds in parallel and reports, per
//! cell, the fraction of runs in which fire reached it.

use super::state::FireState;
use super::FireSpreadSimulator;
use crate::core_types::rng::seeded_rng;
use crate::error::{CoreError, CoreResult};
use crate::grid::{FieldData, FuelGrid};
use rayon::prelude::*;
use tracing::info;

impl FireSpreadSimulator {
    /// Burn probability map over independent runs, one per seed
    ///
    /// Every run gets its own context and its own RNG seeded from `seeds`, so the
    /// result does not depend on scheduling.
    ///
    /// # Returns
    /// Field of values in `[0, 1]`: the fraction of runs in which each cell ended
    /// up burning or burned
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] for an empty seed list, or
    /// [`CoreError::OutOfBounds`] if `origin` lies outside the grid
    pub fn burn_probability(
        &self,
        grid: &FuelGrid,
        origin: (usize, usize),
        seeds: &[u64],
    ) -> CoreResult<FieldData> {
        if seeds.is_empty() {
            return Err(CoreError::InvalidConfig(
                "burn probability needs at least one seed".to_string(),
            ));
        }
        let template = self.context(grid, origin)?;

        let counts = seeds
            .par_iter()
            .map(|&seed| {
                let mut ctx = template.clone();
                let mut rng = seeded_rng(seed);
                let last = self.run_final(grid, &mut ctx, &mut rng);
                last.as_slice()
                    .iter()
                    .map(|s| u32::from(*s != FireState::Unburned))
                    .collect::<Vec<u32>>()
            })
            .reduce(
                || vec![0; grid.len()],
                |mut acc, run| {
                    for (a, r) in acc.iter_mut().zip(run) {
                        *a += r;
                    }
                    acc
                },
            );

        let runs = seeds.len() as f64;
        let mut field = FieldData::new(grid.width(), grid.height());
        for (value, count) in field.data.iter_mut().zip(counts) {
            *value = f64::from(count) / runs;
        }

        info!(
            "Burn probability over {} runs: peak {:.3}",
            seeds.len(),
            field.max_value()
        );
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::{FuelCode, FuelGroup, FuelTable};
    use crate::core_types::readings::EnvironmentReadings;

    fn grid() -> FuelGrid {
        FuelGrid::uniform(
            &FuelTable::scott_burgan(),
            FuelCode::new(FuelGroup::TimberLitter, 3),
            EnvironmentReadings::default(),
            12,
            12,
        )
        .unwrap()
    }

    #[test]
    fn test_probabilities_in_unit_range_and_origin_certain() {
        let sim = FireSpreadSimulator::default();
        let field = sim.burn_probability(&grid(), (6, 6), &[1, 2, 3, 4, 5]).unwrap();
        assert!(field.as_slice().iter().all(|p| (0.0..=1.0).contains(p)));
        assert_eq!(field.get(6, 6), 1.0);
    }

    #[test]
    fn test_independent_of_thread_scheduling() {
        let sim = FireSpreadSimulator::default();
        let seeds: Vec<u64> = (0..16).collect();
        let a = sim.burn_probability(&grid(), (3, 3), &seeds).unwrap();
        let b = sim.burn_probability(&grid(), (3, 3), &seeds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_empty_seeds_and_bad_origin() {
        let sim = FireSpreadSimulator::default();
        assert!(matches!(
            sim.burn_probability(&grid(), (0, 0), &[]),
            Err(CoreError::InvalidConfig(_))
        ));
        assert!(matches!(
            sim.burn_probability(&grid(), (12, 0), &[1]),
            Err(CoreError::OutOfBounds { .. })
        ));
    }
}
