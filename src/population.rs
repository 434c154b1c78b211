use rand::Rng;
use serde::Serialize;

use crate::{
    config::PopulationConfig,
    error::{SimResult, SimulationError},
    rng::SimulationRng,
};

/// Synthetic kangaroo ages. Immutable once generated; the mean is computed
/// once and every distance in a run is measured against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    ages: Vec<u32>,
    mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub size: usize,
    pub mean: f64,
    pub min: u32,
    pub max: u32,
}

impl Population {
    pub fn generate(config: &PopulationConfig, rng: &mut SimulationRng) -> SimResult<Self> {
        if config.min_age >= config.max_age_exclusive {
            return Err(SimulationError::configuration(
                "population.max_age_exclusive",
                format!(
                    "age range [{}, {}) is empty",
                    config.min_age, config.max_age_exclusive
                ),
            ));
        }
        let ages = (0..config.size)
            .map(|_| rng.gen_range(config.min_age..config.max_age_exclusive))
            .collect();
        Self::from_ages(ages)
    }

    pub fn from_ages(ages: Vec<u32>) -> SimResult<Self> {
        if ages.is_empty() {
            return Err(SimulationError::configuration(
                "population.size",
                "population must contain at least one member",
            ));
        }
        let mean = mean_of(ages.iter().copied());
        Ok(Self { ages, mean })
    }

    pub fn ages(&self) -> &[u32] {
        &self.ages
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> u32 {
        self.ages.iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> u32 {
        self.ages.iter().copied().max().unwrap_or_default()
    }

    pub fn summary(&self) -> PopulationSummary {
        PopulationSummary {
            size: self.len(),
            mean: self.mean,
            min: self.min(),
            max: self.max(),
        }
    }
}

pub(crate) fn mean_of(values: impl ExactSizeIterator<Item = u32>) -> f64 {
    let count = values.len();
    let total: u64 = values.map(u64::from).sum();
    total as f64 / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_configured_size_within_range() {
        let mut rng = SimulationRng::new(42);
        let population = Population::generate(&PopulationConfig::default(), &mut rng).unwrap();

        assert_eq!(population.len(), 10_000);
        assert!(population.ages().iter().all(|&age| (1..20).contains(&age)));
        assert!(population.min() >= 1);
        assert!(population.max() <= 19);
    }

    #[test]
    fn mean_is_near_ten_for_default_profile() {
        let mut rng = SimulationRng::new(42);
        let population = Population::generate(&PopulationConfig::default(), &mut rng).unwrap();

        assert!(
            (population.mean() - 10.0).abs() < 0.2,
            "population mean {} drifted",
            population.mean()
        );
    }

    #[test]
    fn from_ages_computes_exact_mean() {
        let population = Population::from_ages(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(population.mean(), 2.5);
        assert_eq!(population.summary().min, 1);
        assert_eq!(population.summary().max, 4);
    }

    #[test]
    fn empty_population_is_rejected() {
        let err = Population::from_ages(Vec::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_age_range_is_rejected() {
        let config = PopulationConfig {
            size: 10,
            min_age: 5,
            max_age_exclusive: 5,
        };
        let mut rng = SimulationRng::new(1);
        assert!(Population::generate(&config, &mut rng).is_err());
    }
}
