use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kangaroo_lln::{
    chart::render_sparkline,
    config::{ConfigLoader, SimulationConfig, SliderBounds},
    logging, pipeline,
    report::SimulationReport,
    table::TextTable,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Law of Large Numbers: kangaroo age simulation")]
struct Cli {
    /// Path to a YAML config file (built-in defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the maximum sample size (100-2000, step 100)
    #[arg(long, global = true)]
    max_sample_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one simulation and print the convergence table
    Run {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Also draw both panels as terminal sparklines
        #[arg(long)]
        plot: bool,
    },
    /// Serve the interactive dashboard
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(".").load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(max_sample_size) = cli.max_sample_size {
        config.max_sample_size = SliderBounds::default()
            .check(max_sample_size)
            .context("Invalid --max-sample-size")?;
    }
    Ok(config)
}

fn print_report(report: &SimulationReport, plot: bool) {
    println!(
        "Law of Large Numbers: '{}' (seed {}, max sample size {})",
        report.name, report.seed, report.max_sample_size
    );
    println!(
        "True population mean age: {:.2} ({} kangaroos, ages {}-{})",
        report.population.mean, report.population.size, report.population.min, report.population.max
    );

    if plot {
        for panel in [&report.panels.full, &report.panels.zoomed] {
            println!();
            println!("{} [{}]", panel.title, panel.reference.label);
            println!("{}", render_sparkline(panel, 60));
        }
    }

    println!();
    println!("Convergence Analysis");
    print!("{}", TextTable(&report.table));
    println!();
    println!("{}", report.summary);
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None => {
            let report = pipeline::run(&config)?;
            print_report(&report, false);
        }
        Some(Command::Run { json, plot }) => {
            let report = pipeline::run(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, plot);
            }
        }
        Some(Command::Serve { host, port }) => {
            web::run(WebServerConfig {
                base: config,
                host,
                port,
            })
            .await?;
        }
    }
    Ok(())
}
