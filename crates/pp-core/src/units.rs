// pp-core/src/units.rs

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn atm(v: f64) -> Pressure {
    use uom::si::pressure::atmosphere;
    Pressure::new::<atmosphere>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

/// Pressure in standard atmospheres, the unit the equilibrium engine works in.
#[inline]
pub fn to_atm(p: Pressure) -> f64 {
    use uom::si::pressure::atmosphere;
    p.get::<atmosphere>()
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    /// Molar gas constant [J/(mol K)].
    pub const R_GAS: f64 = 8.314_51;

    /// Standard gravity [m/s^2].
    pub const G0_MPS2: f64 = 9.806_65;

    /// Conversion from atmospheres to bar (species data use a 1 bar standard state).
    pub const ATM_TO_BAR: f64 = 1.013_25;

    /// Conversion from atmospheres to pascal.
    pub const ATM_TO_PA: f64 = 101_325.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _b = bar(1.0);
        let _t = k(300.0);
    }

    #[test]
    fn atm_round_trip() {
        let p = pa(constants::ATM_TO_PA * 68.0);
        assert!((to_atm(p) - 68.0).abs() < 1e-9);
        assert!((to_atm(atm(3.5)) - 3.5).abs() < 1e-12);
        assert!((to_kelvin(k(3000.0)) - 3000.0).abs() < 1e-12);
    }

    #[test]
    fn bar_is_close_to_atm() {
        let ratio = to_atm(bar(constants::ATM_TO_BAR));
        assert!((ratio - 1.0).abs() < 1e-9);
    }
}
