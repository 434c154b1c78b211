use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

/// Smallest sample size, and the step between consecutive sample sizes.
pub const SAMPLE_STEP: usize = 10;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_SAMPLE_SIZE: usize = 1_000;
pub const DEFAULT_CHECKPOINTS: [usize; 5] = [50, 100, 200, 500, 1_000];

fn default_name() -> String {
    "kangaroo_ages".to_string()
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_sample_size() -> usize {
    DEFAULT_MAX_SAMPLE_SIZE
}

fn default_checkpoints() -> Vec<usize> {
    DEFAULT_CHECKPOINTS.to_vec()
}

fn default_population_size() -> usize {
    10_000
}

fn default_min_age() -> u32 {
    1
}

fn default_max_age_exclusive() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_max_sample_size")]
    pub max_sample_size: usize,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default = "default_checkpoints")]
    pub checkpoints: Vec<usize>,
}

/// Shape of the synthetic population: `size` ages drawn uniformly from
/// `[min_age, max_age_exclusive)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_population_size")]
    pub size: usize,
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default = "default_max_age_exclusive")]
    pub max_age_exclusive: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            min_age: default_min_age(),
            max_age_exclusive: default_max_age_exclusive(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: default_seed(),
            max_sample_size: default_max_sample_size(),
            population: PopulationConfig::default(),
            checkpoints: default_checkpoints(),
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_sample_size(mut self, max_sample_size: usize) -> Self {
        self.max_sample_size = max_sample_size;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.max_sample_size < SAMPLE_STEP {
            return Err(SimulationError::configuration(
                "max_sample_size",
                format!(
                    "must be at least {SAMPLE_STEP}, got {}",
                    self.max_sample_size
                ),
            ));
        }

        if self.population.size == 0 {
            return Err(SimulationError::configuration(
                "population.size",
                "population must contain at least one member",
            ));
        }

        if self.population.min_age >= self.population.max_age_exclusive {
            return Err(SimulationError::configuration(
                "population.max_age_exclusive",
                format!(
                    "age range [{}, {}) is empty",
                    self.population.min_age, self.population.max_age_exclusive
                ),
            ));
        }

        if self.checkpoints.is_empty() {
            return Err(SimulationError::configuration(
                "checkpoints",
                "at least one checkpoint is required",
            ));
        }

        if let Some(zero) = self.checkpoints.iter().find(|&&n| n == 0) {
            return Err(SimulationError::configuration(
                "checkpoints",
                format!("checkpoint {zero} is not a positive sample size"),
            ));
        }

        if let Some(off_grid) = self.checkpoints.iter().find(|&&n| n % SAMPLE_STEP != 0) {
            return Err(SimulationError::configuration(
                "checkpoints",
                format!("checkpoint {off_grid} is not a multiple of {SAMPLE_STEP}"),
            ));
        }

        Ok(())
    }
}

/// Range of the interactive sample-size control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderBounds {
    pub min: usize,
    pub max: usize,
    pub step: usize,
    pub default: usize,
}

impl Default for SliderBounds {
    fn default() -> Self {
        Self {
            min: 100,
            max: 2_000,
            step: 100,
            default: DEFAULT_MAX_SAMPLE_SIZE,
        }
    }
}

impl SliderBounds {
    /// Bounds whose default is `max_sample_size`, which must sit on the
    /// slider grid.
    pub fn with_default(self, max_sample_size: usize) -> SimResult<Self> {
        let default = self.check(max_sample_size)?;
        Ok(Self { default, ..self })
    }

    pub fn check(&self, max_sample_size: usize) -> SimResult<usize> {
        if max_sample_size < self.min || max_sample_size > self.max {
            return Err(SimulationError::configuration(
                "max_sample_size",
                format!(
                    "must be between {} and {}, got {max_sample_size}",
                    self.min, self.max
                ),
            ));
        }
        if (max_sample_size - self.min) % self.step != 0 {
            return Err(SimulationError::configuration(
                "max_sample_size",
                format!("must be a multiple of {}, got {max_sample_size}", self.step),
            ));
        }
        Ok(max_sample_size)
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<SimulationConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SimulationConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }
}
