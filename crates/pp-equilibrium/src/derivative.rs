//! Temperature and pressure derivatives of the equilibrium composition.
//!
//! Two right-hand sides against the fixed-temperature system at the
//! converged composition give `(dln n_j/dln T)_P` and `(dln n_j/dln P)_T`,
//! from which the equilibrium heat capacities, volume derivatives,
//! isentropic exponent and sound speed follow.

use crate::equilibrium::fill_common;
use crate::linear;
use crate::matrix::MatrixLayout;
use crate::state::{EquilibriumState, ThermoProperties};
use nalgebra::{DMatrix, DVector};
use pp_core::constants::R_GAS;
use pp_thermo::SpeciesDatabase;
use tracing::warn;

/// Responses obtained from the temperature right-hand side.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TemperatureResponse {
    /// [J/(g K)]
    cp: f64,
    dlnv_dlnt: f64,
}

/// Fill the derivative properties of a converged state.
///
/// Each system updates only the values it determines; the combined ones
/// (Cv, isentropic exponent, sound speed) need both. Returns `false` when
/// either system is singular, leaving its values at their previous state.
pub fn derive_properties(db: &SpeciesDatabase, state: &mut EquilibriumState) -> bool {
    let Some(products) = state.products() else {
        return false;
    };
    let t = state.temperature;
    let n = state.itn.n;
    let ne = products.n_elements();
    let ng = products.n_gas();
    let active = products.condensed().active();
    let layout = MatrixLayout::without_temperature(ne, active.len());
    let size = layout.size();
    let idx_n = layout.total_moles();

    let mut m = DMatrix::zeros(size, size);
    fill_common(db, products, &layout, &mut m);

    let nj = products.gas_moles();
    let h_gas: Vec<f64> = products
        .gas_species()
        .iter()
        .map(|id| db.species(*id).enthalpy0(t))
        .collect();
    let h_cond: Vec<f64> = active.iter().map(|c| db.species(c.species).enthalpy0(t)).collect();

    let mut rhs_t = DVector::zeros(size);
    let mut rhs_p = DVector::zeros(size);
    let mut anh = vec![0.0; ne];
    for j in 0..ne {
        let mut an = 0.0;
        for k in 0..ng {
            let a = products.gas_coef(j, k) * nj[k];
            an += a;
            anh[j] += a * h_gas[k];
        }
        rhs_t[layout.element(j)] = -anh[j];
        rhs_p[layout.element(j)] = an;
    }
    for c in 0..active.len() {
        rhs_t[layout.condensed(c)] = -h_cond[c];
    }
    let sum_nh: f64 = (0..ng).map(|k| nj[k] * h_gas[k]).sum();
    rhs_t[idx_n] = -sum_nh;
    rhs_p[idx_n] = nj.iter().sum();

    let temperature = match linear::solve(m.clone(), &rhs_t) {
        Ok(sol_t) => {
            let frozen_cp: f64 = state
                .species_moles()
                .iter()
                .map(|(id, moles)| moles * db.species(*id).specific_heat0(t))
                .sum();
            let reaction_cp: f64 = (0..ne).map(|i| anh[i] * sol_t[layout.element(i)]).sum::<f64>()
                + (0..active.len())
                    .map(|c| h_cond[c] * sol_t[layout.condensed(c)])
                    .sum::<f64>()
                + sum_nh * sol_t[idx_n]
                + (0..ng).map(|k| nj[k] * h_gas[k] * h_gas[k]).sum::<f64>();
            Some(TemperatureResponse {
                cp: (frozen_cp + reaction_cp) * R_GAS,
                dlnv_dlnt: 1.0 + sol_t[idx_n],
            })
        }
        Err(_) => {
            warn!(temperature = t, "singular temperature derivative matrix");
            None
        }
    };
    let dlnv_dlnp = match linear::solve(m, &rhs_p) {
        Ok(sol_p) => Some(sol_p[idx_n] - 1.0),
        Err(_) => {
            warn!(temperature = t, "singular pressure derivative matrix");
            None
        }
    };

    apply_responses(&mut state.properties, n, t, temperature, dlnv_dlnp)
}

fn apply_responses(
    props: &mut ThermoProperties,
    n: f64,
    t: f64,
    temperature: Option<TemperatureResponse>,
    dlnv_dlnp: Option<f64>,
) -> bool {
    if let Some(r) = temperature {
        props.cp = r.cp;
        props.dlnv_dlnt = r.dlnv_dlnt;
    }
    if let Some(d) = dlnv_dlnp {
        props.dlnv_dlnp = d;
    }
    let (Some(_), Some(_)) = (temperature, dlnv_dlnp) else {
        return false;
    };

    let cv = props.cp + n * R_GAS * props.dlnv_dlnt * props.dlnv_dlnt / props.dlnv_dlnp;
    let gamma = -(props.cp / cv) / props.dlnv_dlnp;
    props.cv = cv;
    props.isentropic_exponent = gamma;
    props.sound_speed = (1000.0 * n * R_GAS * t * gamma).sqrt();
    true
}

#[cfg(test)]
mod tests {
    use crate::equilibrium::Equilibrium;
    use crate::state::{EquilibriumState, ProblemType};
    use pp_core::units::{atm, k};
    use pp_thermo::{Propellant, SpeciesDatabase};

    fn solved(t: f64) -> (SpeciesDatabase, EquilibriumState) {
        let db = SpeciesDatabase::standard();
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
        p.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
        let mut state = EquilibriumState::with_conditions(p, k(t), atm(68.0));
        Equilibrium::new(&db).solve(&mut state, ProblemType::Tp).unwrap();
        (db, state)
    }

    #[test]
    fn dissociating_mixture_derivatives() {
        let (_db, state) = solved(3000.0);
        let props = state.properties();
        // Dissociation raises the volume response above the frozen values.
        assert!(props.dlnv_dlnt > 1.0, "dlnV/dlnT = {}", props.dlnv_dlnt);
        assert!(props.dlnv_dlnp < -1.0, "dlnV/dlnP = {}", props.dlnv_dlnp);
        assert!(props.cp > props.cv);
        assert!(props.isentropic_exponent > 1.0 && props.isentropic_exponent < 1.4);
        assert!(props.sound_speed > 1000.0 && props.sound_speed < 2000.0);
    }

    #[test]
    fn one_sided_failure_keeps_the_other_response() {
        let (_db, state) = solved(3000.0);
        let mut props = *state.properties();
        let before = props;

        let complete = super::apply_responses(
            &mut props,
            state.gas_moles(),
            3000.0,
            Some(super::TemperatureResponse {
                cp: before.cp * 1.1,
                dlnv_dlnt: before.dlnv_dlnt + 0.01,
            }),
            None,
        );
        assert!(!complete);
        assert_eq!(props.cp, before.cp * 1.1);
        assert_eq!(props.dlnv_dlnt, before.dlnv_dlnt + 0.01);
        assert_eq!(props.dlnv_dlnp, before.dlnv_dlnp);
        assert_eq!(props.cv, before.cv);
        assert_eq!(props.sound_speed, before.sound_speed);

        let mut props = before;
        let complete = super::apply_responses(&mut props, state.gas_moles(), 3000.0, None, Some(-1.05));
        assert!(!complete);
        assert_eq!(props.dlnv_dlnp, -1.05);
        assert_eq!(props.cp, before.cp);
        assert_eq!(props.isentropic_exponent, before.isentropic_exponent);
    }

    #[test]
    fn equilibrium_cp_exceeds_frozen_cp() {
        let (db, state) = solved(3000.0);
        let frozen = crate::mixture::frozen_properties(&db, &state);
        assert!(state.properties().cp > frozen.cp);
    }
}
