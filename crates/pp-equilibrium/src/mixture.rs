//! Dimensionless sums over the current product composition.
//!
//! All quantities are per gram of propellant: enthalpy as `H/RT`,
//! entropy as `S/R`, heat capacity as `Cp/R`.

use crate::state::{EquilibriumState, ThermoProperties};
use pp_core::constants::R_GAS;
use pp_core::units::{Pressure, Temperature, to_kelvin};
use pp_thermo::{SpeciesDatabase, gas_entropy};

/// `sum n_j H_j/RT` over active products at temperature `t`.
pub fn product_enthalpy(db: &SpeciesDatabase, state: &EquilibriumState, t: f64) -> f64 {
    state
        .species_moles()
        .iter()
        .map(|(id, n)| n * db.species(*id).enthalpy0(t))
        .sum()
}

/// `sum n_j S_j/R` at the state's own temperature and pressure.
pub fn product_entropy(db: &SpeciesDatabase, state: &EquilibriumState) -> f64 {
    product_entropy_at(db, state, state.pressure_atm(), state.temperature_k())
}

/// `sum n_j S_j/R` with the composition frozen, at `p_atm` and `t`.
pub fn product_entropy_at(db: &SpeciesDatabase, state: &EquilibriumState, p_atm: f64, t: f64) -> f64 {
    let Some(products) = state.products() else {
        return 0.0;
    };
    let itn = &state.itn;
    let gas: f64 = products
        .gas_species()
        .iter()
        .zip(products.gas_moles())
        .zip(&itn.ln_nj)
        .map(|((id, n), ln_nj)| n * gas_entropy(db.species(*id).entropy0(t), ln_nj - itn.ln_n, p_atm))
        .sum();
    let condensed: f64 = products
        .condensed()
        .active()
        .iter()
        .map(|c| c.moles * db.species(c.species).entropy0(t))
        .sum();
    gas + condensed
}

/// `sum n_j Cp_j/R` with the composition frozen, at `t`.
pub fn mixture_specific_heat0(db: &SpeciesDatabase, state: &EquilibriumState, t: f64) -> f64 {
    state
        .species_moles()
        .iter()
        .map(|(id, n)| n * db.species(*id).specific_heat0(t))
        .sum()
}

/// Fill H, U, G, S and M from the current composition.
pub(crate) fn fill_bulk_properties(db: &SpeciesDatabase, state: &EquilibriumState, props: &mut ThermoProperties) {
    let t = state.temperature_k();
    let n = state.gas_moles();
    let h = product_enthalpy(db, state, t);
    let s = product_entropy(db, state);

    props.enthalpy = h * R_GAS * t;
    props.internal_energy = (h - n) * R_GAS * t;
    props.gibbs = (h - s) * R_GAS * t;
    props.entropy = s * R_GAS;
    props.molar_mass = if n > 0.0 { 1.0 / n } else { 0.0 };
}

/// Properties of the composition held fixed (no reaction on expansion).
pub fn frozen_properties(db: &SpeciesDatabase, state: &EquilibriumState) -> ThermoProperties {
    let t = state.temperature_k();
    let n = state.gas_moles();
    let mut props = ThermoProperties::default();
    fill_bulk_properties(db, state, &mut props);

    props.cp = mixture_specific_heat0(db, state, t) * R_GAS;
    props.cv = props.cp - n * R_GAS;
    props.dlnv_dlnt = 1.0;
    props.dlnv_dlnp = -1.0;
    props.isentropic_exponent = props.cp / props.cv;
    props.sound_speed = (1000.0 * n * R_GAS * t * props.isentropic_exponent).sqrt();
    props
}

impl EquilibriumState {
    /// Move to `temperature` and `pressure` keeping the current composition,
    /// and fill frozen-flow properties. The state is no longer an equilibrium one.
    pub fn freeze_at(&mut self, db: &SpeciesDatabase, temperature: Temperature, pressure: Pressure) {
        self.set_pressure(pressure);
        self.temperature = to_kelvin(temperature);
        self.properties = frozen_properties(db, self);
        self.properties_computed = true;
    }
}
