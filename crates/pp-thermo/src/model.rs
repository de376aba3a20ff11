//! Dimensionless property functions evaluated from interval polynomials.
//!
//! Outside the tabulated range the nearest interval's polynomial is used.

use crate::species::{TemperatureInterval, ThermoSpecies};
use pp_core::constants::{ATM_TO_BAR, R_GAS};

/// Reference temperature for heats of formation [K].
pub const T_REF: f64 = 298.15;

fn cp_over_r(iv: &TemperatureInterval, t: f64) -> f64 {
    let a = &iv.a;
    a[0] / (t * t) + a[1] / t + a[2] + t * (a[3] + t * (a[4] + t * (a[5] + t * a[6])))
}

fn h_over_rt(iv: &TemperatureInterval, t: f64) -> f64 {
    let a = &iv.a;
    -a[0] / (t * t)
        + a[1] * t.ln() / t
        + a[2]
        + a[3] * t / 2.0
        + a[4] * t * t / 3.0
        + a[5] * t.powi(3) / 4.0
        + a[6] * t.powi(4) / 5.0
        + iv.b1 / t
}

fn s_over_r(iv: &TemperatureInterval, t: f64) -> f64 {
    let a = &iv.a;
    -a[0] / (2.0 * t * t) - a[1] / t
        + a[2] * t.ln()
        + a[3] * t
        + a[4] * t * t / 2.0
        + a[5] * t.powi(3) / 3.0
        + a[6] * t.powi(4) / 4.0
        + iv.b2
}

impl ThermoSpecies {
    /// Interval used at `t`: first below the range, last at or above the top.
    pub fn interval_for(&self, t: f64) -> &TemperatureInterval {
        let ivs = self.intervals();
        let last = ivs.len() - 1;
        if t < ivs[0].t_low {
            return &ivs[0];
        }
        if t >= ivs[last].t_high {
            return &ivs[last];
        }
        ivs.iter()
            .find(|iv| t >= iv.t_low && t < iv.t_high)
            .unwrap_or(&ivs[last])
    }

    /// `Cp°/R`
    pub fn specific_heat0(&self, t: f64) -> f64 {
        cp_over_r(self.interval_for(t), t)
    }

    /// `H°/RT`
    pub fn enthalpy0(&self, t: f64) -> f64 {
        h_over_rt(self.interval_for(t), t)
    }

    /// `S°/R` at the 1 bar standard state.
    pub fn entropy0(&self, t: f64) -> f64 {
        s_over_r(self.interval_for(t), t)
    }

    /// `G°/RT = H°/RT - S°/R`
    pub fn gibbs0(&self, t: f64) -> f64 {
        let iv = self.interval_for(t);
        h_over_rt(iv, t) - s_over_r(iv, t)
    }

    /// Inclusive check against the outermost interval bounds.
    pub fn temperature_in_range(&self, t: f64) -> bool {
        t >= self.t_min() && t <= self.t_max()
    }

    /// Whichever outer bound of the data is nearest to `t`.
    pub fn transition_temperature(&self, t: f64) -> f64 {
        let low = self.t_min();
        let high = self.t_max();
        if (t - high).abs() < (t - low).abs() {
            high
        } else {
            low
        }
    }

    /// Enthalpy at 298.15 K [J/mol], i.e. the assigned heat of formation.
    pub fn heat_of_formation(&self) -> f64 {
        self.enthalpy0(T_REF) * R_GAS * T_REF
    }
}

/// `ln(P / 1 bar)` for a pressure in atmospheres.
pub fn standard_state_pressure_term(p_atm: f64) -> f64 {
    (p_atm * ATM_TO_BAR).ln()
}

/// Chemical potential `mu/RT` of a gas with mole fraction `exp(ln_nj_n)`.
pub fn gas_gibbs(g0: f64, ln_nj_n: f64, p_atm: f64) -> f64 {
    g0 + ln_nj_n + standard_state_pressure_term(p_atm)
}

/// Partial molar entropy `s/R` of a gas with mole fraction `exp(ln_nj_n)`.
pub fn gas_entropy(s0: f64, ln_nj_n: f64, p_atm: f64) -> f64 {
    s0 - ln_nj_n - standard_state_pressure_term(p_atm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SpeciesDatabase;
    use crate::formula::Formula;
    use crate::species::Phase;

    fn species(db: &SpeciesDatabase, name: &str) -> ThermoSpecies {
        let id = db.find_species(name).unwrap();
        db.species(id).clone()
    }

    #[test]
    fn water_vapour_at_reference() {
        let db = SpeciesDatabase::standard();
        let h2o = species(&db, "H2O");

        // Cp ~ 33.6 J/(mol K), Hf ~ -241.8 kJ/mol, S ~ 188.8 J/(mol K)
        let cp = h2o.specific_heat0(T_REF) * R_GAS;
        assert!((cp - 33.6).abs() < 0.3, "cp = {cp}");

        let hf = h2o.heat_of_formation();
        assert!((hf + 241_826.0).abs() < 300.0, "hf = {hf}");

        let s = h2o.entropy0(T_REF) * R_GAS;
        assert!((s - 188.8).abs() < 0.5, "s = {s}");
    }

    #[test]
    fn elements_in_reference_state_have_zero_enthalpy() {
        let db = SpeciesDatabase::standard();
        for name in ["H2", "O2", "N2", "C(gr)"] {
            let hf = species(&db, name).heat_of_formation();
            assert!(hf.abs() < 50.0, "{name}: hf = {hf}");
        }
    }

    #[test]
    fn gibbs_is_enthalpy_minus_entropy() {
        let db = SpeciesDatabase::standard();
        let oh = species(&db, "OH");
        for t in [300.0, 999.0, 1500.0, 3000.0] {
            let g = oh.gibbs0(t);
            assert!((g - (oh.enthalpy0(t) - oh.entropy0(t))).abs() < 1e-12);
        }
    }

    #[test]
    fn properties_are_nearly_continuous_at_interval_joint() {
        let db = SpeciesDatabase::standard();
        let co2 = species(&db, "CO2");
        let below = co2.enthalpy0(1000.0 - 1e-6);
        let above = co2.enthalpy0(1000.0);
        assert!((below - above).abs() < 1e-3);
    }

    #[test]
    fn interval_selection_clamps() {
        let iv_lo = TemperatureInterval::from_nasa7(200.0, 1000.0, [3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let iv_hi = TemperatureInterval::from_nasa7(1000.0, 3000.0, [4.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let sp = ThermoSpecies::new(
            "X",
            Phase::Gas,
            Formula::parse("O2").unwrap(),
            vec![iv_lo, iv_hi],
        )
        .unwrap();

        assert_eq!(sp.specific_heat0(50.0), 3.5);
        assert_eq!(sp.specific_heat0(999.0), 3.5);
        assert_eq!(sp.specific_heat0(1000.0), 4.5);
        assert_eq!(sp.specific_heat0(3000.0), 4.5);
        assert_eq!(sp.specific_heat0(6000.0), 4.5);
    }

    #[test]
    fn range_check_is_inclusive() {
        let db = SpeciesDatabase::standard();
        let gr = species(&db, "C(gr)");
        assert!(gr.temperature_in_range(gr.t_min()));
        assert!(gr.temperature_in_range(gr.t_max()));
        assert!(!gr.temperature_in_range(gr.t_max() + 1e-6));
        assert!(!gr.temperature_in_range(gr.t_min() - 1e-6));
    }

    #[test]
    fn transition_temperature_picks_nearest_bound() {
        let db = SpeciesDatabase::standard();
        let liquid = species(&db, "H2O(L)");
        assert_eq!(liquid.transition_temperature(280.0), liquid.t_min());
        assert_eq!(liquid.transition_temperature(500.0), liquid.t_max());
    }

    #[test]
    fn mixing_terms() {
        // pure gas at 1 bar: chemical potential equals g0
        let p_atm = 1.0 / ATM_TO_BAR;
        assert!((gas_gibbs(-20.0, 0.0, p_atm) + 20.0).abs() < 1e-12);
        assert!((gas_entropy(25.0, 0.0, p_atm) - 25.0).abs() < 1e-12);

        // diluting raises entropy, lowers potential
        let x = 0.25_f64.ln();
        assert!(gas_gibbs(-20.0, x, p_atm) < -20.0);
        assert!(gas_entropy(25.0, x, p_atm) > 25.0);
    }
}
