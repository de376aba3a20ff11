//! Error types for nozzle performance evaluation.

use pp_core::PpError;
use pp_equilibrium::EquilibriumError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PerformanceError {
    #[error("No equilibrium: {0}")]
    NoEquilibrium(#[from] EquilibriumError),

    #[error("Area ratio {value} out of range (must be finite and > 1)")]
    BadAreaRatio { value: f64 },

    #[error("Unknown exit condition type: {tag}")]
    BadRatioType { tag: String },

    #[error("Exit pressure {value} atm out of range (0, {chamber} atm)")]
    BadExitPressure { value: f64, chamber: f64 },
}

pub type PerformanceResult<T> = Result<T, PerformanceError>;

impl From<PerformanceError> for PpError {
    fn from(e: PerformanceError) -> Self {
        match e {
            PerformanceError::NoEquilibrium(inner) => inner.into(),
            other => PpError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equilibrium_errors_convert() {
        let err: PerformanceError = EquilibriumError::MissingTargetEntropy.into();
        assert!(matches!(err, PerformanceError::NoEquilibrium(_)));

        let pp: PpError = PerformanceError::BadAreaRatio { value: 0.5 }.into();
        assert!(matches!(pp, PpError::InvalidArg { .. }));
    }
}
