//! Iteration controls for the throat and exit searches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Entropy-matching temperature iterations (frozen flow)
    pub max_temperature_iterations: usize,
    /// Throat pressure-ratio iterations
    pub max_throat_iterations: usize,
    /// Exit pressure-ratio iterations
    pub max_exit_iterations: usize,
    /// Bound on `|dln T|` in the temperature match
    pub temperature_tol: f64,
    /// Bound on `|v^2 - a^2| / v^2` at the throat
    pub throat_tol: f64,
    /// Bound on the change of `ln(Pc/Pe)`
    pub exit_tol: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_temperature_iterations: 8,
            max_throat_iterations: 5,
            max_exit_iterations: 6,
            temperature_tol: 0.5e-4,
            throat_tol: 0.4e-4,
            exit_tol: 0.4e-4,
        }
    }
}
