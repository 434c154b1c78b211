use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{SimResult, SimulationError},
    simulator::ConvergenceSeries,
};

pub const SAMPLE_SIZE_HEADER: &str = "Sample Size";
pub const SAMPLE_MEAN_HEADER: &str = "Sample Mean";
pub const DISTANCE_HEADER: &str = "Distance from True Mean";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceRow {
    pub sample_size: usize,
    pub sample_mean: f64,
    pub distance: f64,
}

impl ConvergenceRow {
    pub fn display_mean(&self) -> String {
        format!("{:.2}", self.sample_mean)
    }

    pub fn display_distance(&self) -> String {
        format!("{:.3}", self.distance)
    }
}

/// One row per checkpoint not larger than the largest generated sample
/// size, in checkpoint order.
pub fn build_convergence_table(
    series: &ConvergenceSeries,
    checkpoints: &[usize],
    population_mean: f64,
) -> SimResult<Vec<ConvergenceRow>> {
    let Some(largest) = series.max_sample_size() else {
        return Ok(Vec::new());
    };

    checkpoints
        .iter()
        .copied()
        .filter(|&n| n <= largest)
        .map(|n| -> SimResult<ConvergenceRow> {
            let sample_mean = series
                .mean_at(n)
                .ok_or(SimulationError::Lookup { checkpoint: n })?;
            Ok(ConvergenceRow {
                sample_size: n,
                sample_mean,
                distance: (sample_mean - population_mean).abs(),
            })
        })
        .collect()
}

/// Fixed-width terminal rendering of the convergence rows.
pub struct TextTable<'a>(pub &'a [ConvergenceRow]);

impl fmt::Display for TextTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 3]> = self
            .0
            .iter()
            .map(|row| {
                [
                    row.sample_size.to_string(),
                    row.display_mean(),
                    row.display_distance(),
                ]
            })
            .collect();

        let headers = [SAMPLE_SIZE_HEADER, SAMPLE_MEAN_HEADER, DISTANCE_HEADER];
        let mut widths = headers.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        let [w0, w1, w2] = widths;

        writeln!(f, "{:<w0$}  {:>w1$}  {:>w2$}", headers[0], headers[1], headers[2])?;
        writeln!(f, "{}  {}  {}", "-".repeat(w0), "-".repeat(w1), "-".repeat(w2))?;
        for [size, mean, distance] in &cells {
            writeln!(f, "{size:<w0$}  {mean:>w1$}  {distance:>w2$}")?;
        }
        Ok(())
    }
}

pub fn render_text_table(rows: &[ConvergenceRow]) -> String {
    TextTable(rows).to_string()
}
