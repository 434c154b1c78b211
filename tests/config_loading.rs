use std::fs;

use kangaroo_lln::{config::ConfigLoader, pipeline};
use tempfile::tempdir;

#[test]
fn loads_shipped_profile() {
    let loader = ConfigLoader::new(env!("CARGO_MANIFEST_DIR"));
    let config = loader
        .load("scenarios/kangaroo.yaml")
        .expect("profile parses");

    assert_eq!(config.name, "kangaroo_ages");
    assert_eq!(config.seed, 42);
    assert_eq!(config.max_sample_size, 1_000);
    assert_eq!(config.population.size, 10_000);
    assert_eq!(config.checkpoints, vec![50, 100, 200, 500, 1_000]);
}

#[test]
fn shipped_profile_matches_defaults() {
    let loader = ConfigLoader::new(env!("CARGO_MANIFEST_DIR"));
    let config = loader.load("scenarios/kangaroo.yaml").unwrap();

    let from_file = pipeline::run(&config).unwrap();
    let from_defaults = pipeline::run(&Default::default()).unwrap();
    assert_eq!(from_file.series, from_defaults.series);
}

#[test]
fn custom_profile_overrides_fields() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("small.yaml"),
        "name: small\nseed: 5\nmax_sample_size: 200\npopulation:\n  size: 500\ncheckpoints: [50, 150]\n",
    )
    .unwrap();

    let config = ConfigLoader::new(dir.path()).load("small.yaml").unwrap();
    assert_eq!(config.population.size, 500);
    assert_eq!(config.population.max_age_exclusive, 20);

    let report = pipeline::run(&config).unwrap();
    let sizes: Vec<usize> = report.table.iter().map(|row| row.sample_size).collect();
    assert_eq!(sizes, vec![50, 150]);
}

#[test]
fn invalid_profile_is_rejected_with_path() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.yaml"), "max_sample_size: 5\n").unwrap();

    let err = ConfigLoader::new(dir.path()).load("bad.yaml").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("bad.yaml"));
    assert!(message.contains("max_sample_size"));
}

#[test]
fn missing_file_reports_context() {
    let dir = tempdir().unwrap();
    let err = ConfigLoader::new(dir.path()).load("absent.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn checkpoint_off_sampling_grid_is_rejected_on_load() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("odd.yaml"), "checkpoints: [50, 55]\n").unwrap();

    let err = ConfigLoader::new(dir.path()).load("odd.yaml").unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("odd.yaml"));
    assert!(message.contains("checkpoint 55 is not a multiple of 10"));
}
