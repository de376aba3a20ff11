//! Error types for case loading and running.

use pp_equilibrium::EquilibriumError;
use pp_performance::PerformanceError;
use pp_thermo::ThermoError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("Failed to read case file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid case '{case}': {what}")]
    InvalidCase { case: String, what: String },

    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),

    #[error("Equilibrium error: {0}")]
    Equilibrium(#[from] EquilibriumError),

    #[error("Performance error: {0}")]
    Performance(#[from] PerformanceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CaseResult<T> = Result<T, CaseError>;
