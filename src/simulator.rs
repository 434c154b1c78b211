//! Convergence sampling.
//!
//! For every sample size `n` in `10, 20, ..= max_sample_size` a fresh sample
//! of `n` ages is drawn with replacement and averaged. Samples are never
//! reused between sizes, so the output for a seed is fixed by the order in
//! which the random source is consumed.

use std::ops::ControlFlow;

use rand::{distributions::Slice, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::SAMPLE_STEP,
    error::{SimResult, SimulationError},
    population::{mean_of, Population},
    rng::SimulationRng,
};

/// Sample sizes and their means, index for index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSeries {
    pub sample_sizes: Vec<usize>,
    pub sample_means: Vec<f64>,
}

impl ConvergenceSeries {
    pub fn len(&self) -> usize {
        self.sample_sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_sizes.is_empty()
    }

    /// Largest sample size actually generated.
    pub fn max_sample_size(&self) -> Option<usize> {
        self.sample_sizes.last().copied()
    }

    pub fn mean_at(&self, sample_size: usize) -> Option<f64> {
        self.sample_sizes
            .iter()
            .position(|&n| n == sample_size)
            .map(|idx| self.sample_means[idx])
    }

    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.sample_sizes
            .iter()
            .copied()
            .zip(self.sample_means.iter().copied())
    }
}

pub fn sample_sizes(max_sample_size: usize) -> Vec<usize> {
    (SAMPLE_STEP..=max_sample_size).step_by(SAMPLE_STEP).collect()
}

pub fn simulate(
    population: &Population,
    max_sample_size: usize,
    rng: &mut SimulationRng,
) -> SimResult<ConvergenceSeries> {
    simulate_with_hook(population, max_sample_size, rng, |_, _| ControlFlow::Continue(()))
}

/// Same as [`simulate`], calling `hook` with each `(sample_size, mean)` as
/// soon as it is computed. A `Break` from the hook stops sampling with
/// [`SimulationError::Cancelled`].
pub fn simulate_with_hook<F>(
    population: &Population,
    max_sample_size: usize,
    rng: &mut SimulationRng,
    mut hook: F,
) -> SimResult<ConvergenceSeries>
where
    F: FnMut(usize, f64) -> ControlFlow<()>,
{
    if max_sample_size < SAMPLE_STEP {
        return Err(SimulationError::configuration(
            "max_sample_size",
            format!("must be at least {SAMPLE_STEP}, got {max_sample_size}"),
        ));
    }
    let ages = Slice::new(population.ages()).map_err(|_| {
        SimulationError::configuration("population.size", "cannot sample from an empty population")
    })?;

    let sizes = sample_sizes(max_sample_size);
    let mut means = Vec::with_capacity(sizes.len());
    for &n in &sizes {
        let draws = (0..n).map(|_| *rng.sample(&ages));
        let mean = mean_of(draws);
        means.push(mean);
        if hook(n, mean).is_break() {
            debug!(completed = means.len(), "sampling stopped by hook");
            return Err(SimulationError::Cancelled {
                completed: means.len(),
            });
        }
    }
    debug!(
        max_sample_size,
        samples = sizes.len(),
        "sampled convergence series"
    );

    Ok(ConvergenceSeries {
        sample_sizes: sizes,
        sample_means: means,
    })
}
