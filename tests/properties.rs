use kangaroo_lln::{
    config::{PopulationConfig, SimulationConfig},
    pipeline,
    population::Population,
    rng::SimulationRng,
    simulator::simulate,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn series_shape_holds_for_any_seed(seed in any::<u64>(), max in 10usize..=400) {
        let mut rng = SimulationRng::new(seed);
        let config = PopulationConfig { size: 1_000, ..PopulationConfig::default() };
        let population = Population::generate(&config, &mut rng).unwrap();
        let series = simulate(&population, max, &mut rng).unwrap();

        prop_assert_eq!(series.sample_sizes.len(), max / 10);
        prop_assert_eq!(series.sample_means.len(), series.sample_sizes.len());
        prop_assert!(series.sample_sizes.windows(2).all(|w| w[1] == w[0] + 10));

        let lo = population.min() as f64;
        let hi = population.max() as f64;
        prop_assert!(series.sample_means.iter().all(|&m| m >= lo && m <= hi));
    }

    #[test]
    fn table_only_holds_reachable_checkpoints(seed in 0u64..10_000, steps in 1usize..=20) {
        let max = steps * 100;
        let config = SimulationConfig::default().with_seed(seed).with_max_sample_size(max);
        let report = pipeline::run(&config).unwrap();

        let expected: Vec<usize> = [50, 100, 200, 500, 1_000]
            .into_iter()
            .filter(|&n| n <= max)
            .collect();
        let actual: Vec<usize> = report.table.iter().map(|row| row.sample_size).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(report.table.iter().all(|row| row.distance >= 0.0));
    }
}
