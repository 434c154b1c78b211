use serde::Serialize;

use crate::{
    chart::ChartPanels, population::PopulationSummary, simulator::ConvergenceSeries,
    table::ConvergenceRow,
};

pub const SUMMARY_MESSAGE: &str =
    "As sample size increases, the sample mean converges toward the true population mean.";

/// Everything one run produces, ready for the CLI or the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub name: String,
    pub seed: u64,
    pub max_sample_size: usize,
    pub population: PopulationSummary,
    pub series: ConvergenceSeries,
    pub panels: ChartPanels,
    pub table: Vec<ConvergenceRow>,
    pub summary: String,
}

impl SimulationReport {
    pub fn population_mean(&self) -> f64 {
        self.population.mean
    }

    /// Distance from the population mean at the largest generated size.
    pub fn final_distance(&self) -> Option<f64> {
        self.series
            .sample_means
            .last()
            .map(|mean| (mean - self.population.mean).abs())
    }
}
