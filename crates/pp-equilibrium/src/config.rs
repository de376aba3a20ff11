//! Equilibrium solver configuration.

use serde::{Deserialize, Serialize};

/// Newton iteration controls for the equilibrium engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumConfig {
    /// Newton iterations allowed between species-set revisions
    pub max_iterations: usize,
    /// Species-set revisions (inclusions, removals, singular recoveries) per solve
    pub max_set_revisions: usize,
    /// Bound on `n_j |dln n_j| / sum n` and the condensed analog
    pub composition_tol: f64,
    /// Bound on `|dln T|`
    pub temperature_tol: f64,
    /// `ln(n_j/n)` at or below which a gas species counts as absent
    pub log_concentration_floor: f64,
    /// Temperature estimate for the first fixed-enthalpy/entropy solve [K]
    pub initial_temperature: f64,
    /// Total gas moles per gram used to seed the first solve
    pub initial_moles: f64,
    /// Moles given back to absent gas species during singular recovery
    pub reinserted_moles: f64,
    /// Distance from a phase transition beyond which a condensed phase is replaced, not doubled [K]
    pub phase_replace_margin: f64,
    /// Lowest temperature of the property data; a fixed-enthalpy/entropy
    /// iterate falling below it triggers a condensed inclusion test [K]
    pub min_temperature: f64,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_set_revisions: 50,
            composition_tol: 0.5e-5,
            temperature_tol: 1.0e-4,
            log_concentration_floor: -18.420_681,
            initial_temperature: 3800.0,
            initial_moles: 0.1,
            reinserted_moles: 1e-6,
            phase_replace_margin: 50.0,
            min_temperature: 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_is_mole_fraction_1e_minus_8() {
        let cfg = EquilibriumConfig::default();
        assert!((cfg.log_concentration_floor.exp() - 1e-8).abs() < 1e-12);
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg: EquilibriumConfig = serde_json::from_str(r#"{"max_iterations": 40}"#).unwrap();
        assert_eq!(cfg.max_iterations, 40);
        assert_eq!(cfg.initial_temperature, 3800.0);
    }
}
