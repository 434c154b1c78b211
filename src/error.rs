use thiserror::Error;

/// Errors raised by the simulation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A configuration value is outside what the pipeline accepts.
    #[error("invalid {field}: {message}")]
    Configuration { field: &'static str, message: String },

    /// A checkpoint has no matching generated sample size.
    #[error("no sample mean recorded for checkpoint {checkpoint}")]
    Lookup { checkpoint: usize },

    /// The observer asked the run to stop before every sample was drawn.
    #[error("run stopped after {completed} sample sizes")]
    Cancelled { completed: usize },
}

impl SimulationError {
    pub fn configuration(field: &'static str, message: impl Into<String>) -> Self {
        SimulationError::Configuration {
            field,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, SimulationError::Configuration { .. })
    }
}

pub type SimResult<T> = std::result::Result<T, SimulationError>;
