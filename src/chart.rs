//! Plot descriptions handed to the renderers.
//!
//! The browser draws these panels on a canvas; the terminal renderer below
//! draws a coarse sparkline of the same data.

use serde::{Deserialize, Serialize};

use crate::simulator::ConvergenceSeries;

pub const X_LABEL: &str = "Sample Size";
pub const Y_LABEL: &str = "Sample Mean Age";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series_label: String,
    pub points: Vec<(usize, f64)>,
    pub reference: ReferenceLine,
}

impl ChartPanel {
    fn new(title: &str, points: Vec<(usize, f64)>, reference: ReferenceLine) -> Self {
        Self {
            title: title.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            series_label: "Sample Means".to_string(),
            points,
            reference,
        }
    }
}

/// Full-range panel and the zoomed panel over the later half of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPanels {
    pub full: ChartPanel,
    pub zoomed: ChartPanel,
}

pub fn zoom_start(len: usize) -> usize {
    len / 2
}

pub fn build_panels(series: &ConvergenceSeries, population_mean: f64) -> ChartPanels {
    let points: Vec<(usize, f64)> = series.points().collect();
    let zoomed_points = points[zoom_start(points.len())..].to_vec();

    ChartPanels {
        full: ChartPanel::new(
            "Convergence of Sample Mean",
            points,
            ReferenceLine {
                value: population_mean,
                label: format!("True Population Mean ({population_mean:.2})"),
            },
        ),
        zoomed: ChartPanel::new(
            "Zoomed: Later Convergence",
            zoomed_points,
            ReferenceLine {
                value: population_mean,
                label: "Population Mean".to_string(),
            },
        ),
    }
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders a panel as a single-row sparkline, at most `width` columns wide.
/// The reference value is included in the vertical scale.
pub fn render_sparkline(panel: &ChartPanel, width: usize) -> String {
    if panel.points.is_empty() || width == 0 {
        return String::new();
    }

    let bucket = panel.points.len().div_ceil(width);
    let values: Vec<f64> = panel
        .points
        .chunks(bucket)
        .map(|chunk| chunk.iter().map(|(_, y)| y).sum::<f64>() / chunk.len() as f64)
        .collect();

    let (lo, hi) = values.iter().fold(
        (panel.reference.value, panel.reference.value),
        |(lo, hi), &v| (lo.min(v), hi.max(v)),
    );
    let span = hi - lo;
    let top = SPARK_LEVELS.len() - 1;

    values
        .iter()
        .map(|&v| {
            let level = if span > 0.0 {
                (((v - lo) / span) * top as f64).round() as usize
            } else {
                top / 2
            };
            SPARK_LEVELS[level.min(top)]
        })
        .collect()
}
