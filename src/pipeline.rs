use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::{
    chart::build_panels,
    config::SimulationConfig,
    error::{SimResult, SimulationError},
    population::{Population, PopulationSummary},
    report::{SimulationReport, SUMMARY_MESSAGE},
    rng::SimulationRng,
    simulator::simulate_with_hook,
    table::build_convergence_table,
};

/// Receives progress from a run. Returning `Break` from either callback
/// stops the run with [`SimulationError::Cancelled`].
pub trait RunObserver {
    /// Called once, after the population is generated and before sampling.
    fn population(&mut self, _summary: &PopulationSummary) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn sample(&mut self, sample_size: usize, sample_mean: f64) -> ControlFlow<()>;
}

struct Silent;

impl RunObserver for Silent {
    fn sample(&mut self, _sample_size: usize, _sample_mean: f64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Runs the whole pipeline for one configuration: population, sampling,
/// panels and table. The output depends only on `config`.
pub fn run(config: &SimulationConfig) -> SimResult<SimulationReport> {
    run_with_observer(config, &mut Silent)
}

/// Same as [`run`], reporting the population and each sample mean to
/// `observer` as they are produced.
pub fn run_with_observer<O>(
    config: &SimulationConfig,
    observer: &mut O,
) -> SimResult<SimulationReport>
where
    O: RunObserver + ?Sized,
{
    config.validate()?;

    let mut rng = SimulationRng::new(config.seed);
    let population = Population::generate(&config.population, &mut rng)?;
    let population_mean = population.mean();
    let summary = population.summary();
    debug!(
        seed = config.seed,
        size = summary.size,
        population_mean,
        "generated population"
    );
    if observer.population(&summary).is_break() {
        return Err(SimulationError::Cancelled { completed: 0 });
    }

    let series = simulate_with_hook(&population, config.max_sample_size, &mut rng, |n, mean| {
        observer.sample(n, mean)
    })?;
    let panels = build_panels(&series, population_mean);
    let table = build_convergence_table(&series, &config.checkpoints, population_mean)?;

    info!(
        name = %config.name,
        seed = config.seed,
        max_sample_size = config.max_sample_size,
        population_mean,
        samples = series.len(),
        checkpoints = table.len(),
        "simulation complete"
    );

    Ok(SimulationReport {
        name: config.name.clone(),
        seed: config.seed,
        max_sample_size: config.max_sample_size,
        population: summary,
        series,
        panels,
        table,
        summary: SUMMARY_MESSAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        population_mean: Option<f64>,
        samples_before_population: usize,
        samples: Vec<(usize, f64)>,
        stop_after: Option<usize>,
    }

    impl RunObserver for Recorder {
        fn population(&mut self, summary: &PopulationSummary) -> ControlFlow<()> {
            self.population_mean = Some(summary.mean);
            self.samples_before_population = self.samples.len();
            ControlFlow::Continue(())
        }

        fn sample(&mut self, sample_size: usize, sample_mean: f64) -> ControlFlow<()> {
            self.samples.push((sample_size, sample_mean));
            match self.stop_after {
                Some(limit) if self.samples.len() >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        }
    }

    #[test]
    fn report_is_deterministic() {
        let config = SimulationConfig::default();
        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_config_is_rejected_before_sampling() {
        let config = SimulationConfig::default().with_max_sample_size(5);
        let mut recorder = Recorder::default();
        let err = run_with_observer(&config, &mut recorder).unwrap_err();

        assert!(err.is_configuration());
        assert!(recorder.population_mean.is_none());
        assert!(recorder.samples.is_empty());
    }

    #[test]
    fn observer_hears_population_mean_before_samples() {
        let config = SimulationConfig::default().with_max_sample_size(300);
        let mut recorder = Recorder::default();
        let report = run_with_observer(&config, &mut recorder).unwrap();

        assert_eq!(recorder.population_mean, Some(report.population_mean()));
        assert_eq!(recorder.samples_before_population, 0);
        assert_eq!(recorder.samples, report.series.points().collect::<Vec<_>>());
        assert_eq!(recorder.samples.len(), 30);
    }

    #[test]
    fn observer_can_stop_the_run() {
        let config = SimulationConfig::default();
        let mut recorder = Recorder {
            stop_after: Some(4),
            ..Recorder::default()
        };
        let err = run_with_observer(&config, &mut recorder).unwrap_err();

        assert_eq!(err, SimulationError::Cancelled { completed: 4 });
        assert_eq!(recorder.samples.len(), 4);
    }

    #[test]
    fn report_echoes_config() {
        let config = SimulationConfig::default().with_seed(9).with_max_sample_size(200);
        let report = run(&config).unwrap();

        assert_eq!(report.seed, 9);
        assert_eq!(report.max_sample_size, 200);
        assert_eq!(report.population.size, 10_000);
        assert_eq!(report.summary, SUMMARY_MESSAGE);
        assert!(report.final_distance().is_some());
    }
}
