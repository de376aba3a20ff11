//! Chemical elements by atomic number.

use crate::error::{ThermoError, ThermoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbols and molar masses [g/mol], indexed by atomic number - 1.
const ELEMENTS: [(&str, f64); 93] = [
    ("H", 1.00794),
    ("He", 4.002602),
    ("Li", 6.941),
    ("Be", 9.012182),
    ("B", 10.811),
    ("C", 12.0107),
    ("N", 14.00674),
    ("O", 15.9994),
    ("F", 18.9984032),
    ("Ne", 20.1797),
    ("Na", 22.989770),
    ("Mg", 24.305),
    ("Al", 26.981538),
    ("Si", 28.0855),
    ("P", 30.973761),
    ("S", 32.066),
    ("Cl", 35.4527),
    ("Ar", 39.948),
    ("K", 39.0983),
    ("Ca", 40.078),
    ("Sc", 44.95591),
    ("Ti", 47.88),
    ("V", 50.9415),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.847),
    ("Co", 58.9332),
    ("Ni", 58.6934),
    ("Cu", 63.546),
    ("Zn", 65.39),
    ("Ga", 69.723),
    ("Ge", 72.61),
    ("As", 74.9216),
    ("Se", 78.96),
    ("Br", 79.904),
    ("Kr", 83.80),
    ("Rb", 85.4678),
    ("Sr", 87.62),
    ("Y", 88.9059),
    ("Zr", 91.224),
    ("Nb", 92.9064),
    ("Mo", 95.94),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.9055),
    ("Pd", 106.42),
    ("Ag", 107.868),
    ("Cd", 112.41),
    ("In", 114.82),
    ("Sn", 118.71),
    ("Sb", 121.757),
    ("Te", 127.60),
    ("I", 126.9045),
    ("Xe", 131.29),
    ("Cs", 132.9054),
    ("Ba", 137.33),
    ("La", 138.9055),
    ("Ce", 140.12),
    ("Pr", 140.9077),
    ("Nd", 144.24),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.965),
    ("Gd", 157.25),
    ("Tb", 158.9253),
    ("Dy", 162.50),
    ("Ho", 164.9303),
    ("Er", 167.26),
    ("Tm", 168.9342),
    ("Yb", 173.04),
    ("Lu", 174.967),
    ("Hf", 178.49),
    ("Ta", 180.9479),
    ("W", 183.85),
    ("Re", 186.207),
    ("Os", 190.2),
    ("Ir", 192.22),
    ("Pt", 195.08),
    ("Au", 196.9665),
    ("Hg", 200.59),
    ("Tl", 204.383),
    ("Pb", 207.2),
    ("Bi", 208.9804),
    ("Po", 209.0),
    ("At", 210.0),
    ("Rn", 222.0),
    ("Fr", 223.0),
    ("Ra", 226.0254),
    ("Ac", 227.0),
    ("Th", 232.0381),
    ("Pa", 231.0359),
    ("U", 238.029),
    ("Np", 237.0482),
];

/// A chemical element, stored as its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Element(u8);

impl Element {
    pub const H: Element = Element(1);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);

    /// Element from its atomic number, if known.
    pub fn from_atomic_number(z: u8) -> Option<Self> {
        if z >= 1 && (z as usize) <= ELEMENTS.len() {
            Some(Self(z))
        } else {
            None
        }
    }

    /// Case-insensitive symbol lookup ("O", "Cl", "CL" all work).
    pub fn from_symbol(symbol: &str) -> ThermoResult<Self> {
        ELEMENTS
            .iter()
            .position(|(s, _)| s.eq_ignore_ascii_case(symbol))
            .map(|i| Self(i as u8 + 1))
            .ok_or_else(|| ThermoError::UnknownElement {
                symbol: symbol.to_string(),
            })
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        ELEMENTS[self.0 as usize - 1].0
    }

    /// Standard atomic weight [g/mol].
    pub fn molar_mass(self) -> f64 {
        ELEMENTS[self.0 as usize - 1].1
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
