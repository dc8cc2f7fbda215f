use thiserror::Error;

/// Error type that captures common conversation and persistence failures.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("A simulation is already running; commit or discard it first")]
    SimulationActive,
    #[error("No simulation is running")]
    NoSimulation,
}
