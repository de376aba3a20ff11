//! Error types for equilibrium solving.

use pp_core::PpError;
use pp_thermo::ThermoError;
use thiserror::Error;

/// Hard failures of an equilibrium solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquilibriumError {
    #[error("Propellant has {count} elements (limit {limit})")]
    TooManyElements { count: usize, limit: usize },

    #[error("Too many candidate products (limit {limit})")]
    TooManyProducts { limit: usize },

    #[error("Singular system could not be recovered after {iterations} iterations")]
    SingularRecoveryExhausted { iterations: usize },

    #[error("No convergence within {limit} iterations ({what})")]
    TooManyIterations { limit: usize, what: &'static str },

    #[error("Propellant mixture is empty")]
    EmptyPropellant,

    #[error("Entropy target missing for a fixed-entropy problem")]
    MissingTargetEntropy,

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),
}

pub type EquilibriumResult<T> = Result<T, EquilibriumError>;

impl From<EquilibriumError> for PpError {
    fn from(e: EquilibriumError) -> Self {
        match e {
            EquilibriumError::TooManyElements { limit, .. } => PpError::Capacity {
                what: "propellant elements",
                limit,
            },
            EquilibriumError::TooManyProducts { limit } => PpError::Capacity {
                what: "candidate products",
                limit,
            },
            EquilibriumError::Thermo(inner) => inner.into(),
            other => PpError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_limits() {
        let err = EquilibriumError::TooManyIterations {
            limit: 100,
            what: "newton",
        };
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn converts_to_pp_error() {
        let err: PpError = EquilibriumError::TooManyProducts { limit: 400 }.into();
        assert!(matches!(err, PpError::Capacity { limit: 400, .. }));

        let err: PpError = EquilibriumError::Thermo(ThermoError::EmptyPropellant).into();
        assert!(matches!(err, PpError::InvalidArg { .. }));
    }
}
