//! Equilibrium problem state.

use crate::products::ProductSet;
use pp_core::constants::R_GAS;
use pp_core::units::{Pressure, Temperature, atm, k, to_atm, to_kelvin};
use pp_core::SpeciesId;
use pp_thermo::{Element, Propellant, SpeciesDatabase};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which pair of state variables is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    /// Temperature and pressure
    Tp,
    /// Enthalpy (of the propellant) and pressure
    Hp,
    /// Entropy (an assigned target) and pressure
    Sp,
}

impl ProblemType {
    pub fn fixes_temperature(self) -> bool {
        self == ProblemType::Tp
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProblemType::Tp => "TP",
            ProblemType::Hp => "HP",
            ProblemType::Sp => "SP",
        })
    }
}

/// Bulk properties of the product mixture, per unit mass of propellant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoProperties {
    /// [kJ/kg]
    pub enthalpy: f64,
    /// [kJ/kg]
    pub internal_energy: f64,
    /// [kJ/kg]
    pub gibbs: f64,
    /// [kJ/(kg K)]
    pub entropy: f64,
    /// Molar mass of the gas phase, 1/n [g/mol]
    pub molar_mass: f64,
    /// [kJ/(kg K)]
    pub cp: f64,
    /// [kJ/(kg K)]
    pub cv: f64,
    /// (dln V / dln T) at constant P
    pub dlnv_dlnt: f64,
    /// (dln V / dln P) at constant T
    pub dlnv_dlnp: f64,
    pub isentropic_exponent: f64,
    /// [m/s]
    pub sound_speed: f64,
}

/// Newton iteration variables for the gas phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct IterationState {
    pub ln_nj: Vec<f64>,
    pub delta_ln_nj: Vec<f64>,
    /// Total gas moles per gram
    pub n: f64,
    pub ln_n: f64,
    /// Sum of the gas mole numbers above the concentration floor
    pub sumn: f64,
    pub delta_ln_n: f64,
    pub delta_ln_t: f64,
}

/// One equilibrium problem: inputs, current composition and results.
///
/// States are plain values; cloning gives an independent copy, which is
/// how nozzle stations are seeded from the chamber.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumState {
    propellant: Propellant,
    /// [K]
    pub(crate) temperature: f64,
    /// [atm]
    pressure: f64,
    /// Dimensionless entropy target `S/R` per gram
    target_entropy: Option<f64>,
    pub(crate) products: Option<ProductSet>,
    pub(crate) itn: IterationState,
    pub(crate) properties: ThermoProperties,
    pub(crate) equilibrated: bool,
    pub(crate) properties_computed: bool,
    pub(crate) converged_once: bool,
    pub(crate) last_problem: Option<ProblemType>,
}

impl EquilibriumState {
    /// New state at 298.15 K and 1 atm.
    pub fn new(propellant: Propellant) -> Self {
        Self {
            propellant,
            temperature: 298.15,
            pressure: 1.0,
            target_entropy: None,
            products: None,
            itn: IterationState::default(),
            properties: ThermoProperties::default(),
            equilibrated: false,
            properties_computed: false,
            converged_once: false,
            last_problem: None,
        }
    }

    pub fn with_conditions(propellant: Propellant, temperature: Temperature, pressure: Pressure) -> Self {
        let mut state = Self::new(propellant);
        state.temperature = to_kelvin(temperature);
        state.pressure = to_atm(pressure);
        state
    }

    pub fn propellant(&self) -> &Propellant {
        &self.propellant
    }

    /// Replace the propellant. Candidate products are listed again on the next solve.
    pub fn set_propellant(&mut self, propellant: Propellant) {
        self.propellant = propellant;
        self.products = None;
        self.itn = IterationState::default();
        self.converged_once = false;
        self.invalidate();
    }

    pub fn temperature(&self) -> Temperature {
        k(self.temperature)
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, t: Temperature) {
        self.temperature = to_kelvin(t);
        self.invalidate();
    }

    pub fn pressure(&self) -> Pressure {
        atm(self.pressure)
    }

    pub fn pressure_atm(&self) -> f64 {
        self.pressure
    }

    pub fn set_pressure(&mut self, p: Pressure) {
        self.pressure = to_atm(p);
        self.invalidate();
    }

    /// Entropy target for fixed-entropy problems [kJ/(kg K)].
    pub fn target_entropy(&self) -> Option<f64> {
        self.target_entropy.map(|s| s * R_GAS)
    }

    pub fn set_target_entropy(&mut self, entropy: f64) {
        self.target_entropy = Some(entropy / R_GAS);
        self.invalidate();
    }

    pub(crate) fn target_entropy_dimensionless(&self) -> Option<f64> {
        self.target_entropy
    }

    /// Composition is the equilibrium one for the current inputs.
    pub fn is_equilibrated(&self) -> bool {
        self.equilibrated
    }

    pub fn properties_computed(&self) -> bool {
        self.properties_computed
    }

    /// Problem type of the last successful solve.
    pub fn last_problem(&self) -> Option<ProblemType> {
        self.last_problem
    }

    pub fn properties(&self) -> &ThermoProperties {
        &self.properties
    }

    pub fn products(&self) -> Option<&ProductSet> {
        self.products.as_ref()
    }

    /// Total gas moles per gram of propellant.
    pub fn gas_moles(&self) -> f64 {
        self.itn.n
    }

    /// Moles per gram of every active product (gas first, then condensed).
    pub fn species_moles(&self) -> Vec<(SpeciesId, f64)> {
        let Some(p) = &self.products else {
            return Vec::new();
        };
        p.gas_species()
            .iter()
            .copied()
            .zip(p.gas_moles().iter().copied())
            .chain(p.condensed().active().iter().map(|c| (c.species, c.moles)))
            .collect()
    }

    /// Mole fractions over all active products, condensed included.
    pub fn mole_fractions(&self) -> Vec<(SpeciesId, f64)> {
        let moles = self.species_moles();
        let total: f64 = moles.iter().map(|(_, m)| m.max(0.0)).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        moles
            .into_iter()
            .map(|(id, m)| (id, m.max(0.0) / total))
            .collect()
    }

    /// Moles of `element` per gram held by the products.
    pub fn element_moles(&self, db: &SpeciesDatabase, element: Element) -> f64 {
        self.products
            .as_ref()
            .and_then(|p| {
                p.elements()
                    .iter()
                    .position(|e| *e == element)
                    .map(|i| p.element_moles(db, i))
            })
            .unwrap_or(0.0)
    }

    pub(crate) fn invalidate(&mut self) {
        self.equilibrated = false;
        self.properties_computed = false;
    }
}
