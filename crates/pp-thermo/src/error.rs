//! Thermochemical data errors.

use pp_core::PpError;
use thiserror::Error;

/// Result type for property-model operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors raised while building or querying thermochemical data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Element symbol not in the periodic table.
    #[error("Unknown element symbol: {symbol}")]
    UnknownElement { symbol: String },

    /// Chemical formula could not be parsed.
    #[error("Invalid formula '{formula}': {what}")]
    InvalidFormula { formula: String, what: &'static str },

    /// Product species lookup failed.
    #[error("Unknown species: {name}")]
    UnknownSpecies { name: String },

    /// Propellant ingredient lookup failed.
    #[error("Unknown propellant: {name}")]
    UnknownPropellant { name: String },

    /// Two records share the same name in one table.
    #[error("Duplicate entry: {name}")]
    Duplicate { name: String },

    /// Species record without usable temperature intervals.
    #[error("Invalid species data for {name}: {what}")]
    InvalidData { name: String, what: &'static str },

    /// Propellant mixture holds more ingredients than supported.
    #[error("Too many propellant components (limit {limit})")]
    TooManyComponents { limit: usize },

    /// Propellant mixture without ingredients or with zero mass.
    #[error("Propellant mixture is empty")]
    EmptyPropellant,

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<ThermoError> for PpError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::TooManyComponents { limit } => PpError::Capacity {
                what: "propellant components",
                limit,
            },
            ThermoError::InvalidData { name, what } => PpError::Invariant {
                what: format!("species data for {name}: {what}"),
            },
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
    fn error_display() {
        let err = ThermoError::UnknownElement { symbol: "Xx".into() };
        assert!(err.to_string().contains("Xx"));

        let err = ThermoError::InvalidFormula {
            formula: "h2o".into(),
            what: "expected element symbol",
        };
        assert!(err.to_string().contains("h2o"));
    }

    #[test]
    fn error_to_pp_error() {
        let err: PpError = ThermoError::TooManyComponents { limit: 20 }.into();
        assert!(matches!(err, PpError::Capacity { limit: 20, .. }));

        let err: PpError = ThermoError::EmptyPropellant.into();
        assert!(matches!(err, PpError::InvalidArg { .. }));
    }
}
