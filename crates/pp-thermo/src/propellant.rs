//! Propellant ingredient records.

use crate::error::{ThermoError, ThermoResult};
use crate::formula::Formula;
use serde::{Deserialize, Serialize};

/// An ingredient that can be loaded into a propellant mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropellantSpecies {
    name: String,
    formula: Formula,
    /// Heat of formation at 298.15 K [J/mol].
    heat_of_formation: f64,
    /// Density [g/cm^3].
    density: f64,
    molar_mass: f64,
}

impl PropellantSpecies {
    pub fn new(
        name: impl Into<String>,
        formula: Formula,
        heat_of_formation: f64,
        density: f64,
    ) -> ThermoResult<Self> {
        let name = name.into();
        if formula.is_empty() {
            return Err(ThermoError::InvalidData {
                name,
                what: "empty formula",
            });
        }
        if !heat_of_formation.is_finite() || !density.is_finite() || density < 0.0 {
            return Err(ThermoError::InvalidData {
                name,
                what: "non-physical heat of formation or density",
            });
        }
        let molar_mass = formula.molar_mass();
        Ok(Self {
            name,
            formula,
            heat_of_formation,
            density,
            molar_mass,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// [J/mol]
    pub fn heat_of_formation(&self) -> f64 {
        self.heat_of_formation
    }

    /// [g/cm^3]
    pub fn density(&self) -> f64 {
        self.density
    }

    /// [g/mol]
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }
}
