pub mod chart;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod population;
pub mod report;
pub mod rng;
pub mod simulator;
pub mod table;
pub mod web;

pub use config::{SimulationConfig, SliderBounds};
pub use error::SimulationError;
pub use pipeline::run;
pub use report::SimulationReport;
pub use rng::SimulationRng;
