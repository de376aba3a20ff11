//! Product species records.

use crate::error::{ThermoError, ThermoResult};
use crate::formula::Formula;
use serde::{Deserialize, Serialize};

/// Product species carry at most this many distinct elements.
pub const MAX_FORMULA_ELEMENTS: usize = 5;

/// Aggregation state of a product species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Gas,
    Condensed,
}

/// One temperature interval of polynomial property data.
///
/// `a` holds the seven heat-capacity coefficients of
/// `Cp/R = a1/T^2 + a2/T + a3 + a4 T + a5 T^2 + a6 T^3 + a7 T^4`,
/// `b1` and `b2` the enthalpy and entropy integration constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureInterval {
    pub t_low: f64,
    pub t_high: f64,
    pub a: [f64; 7],
    pub b1: f64,
    pub b2: f64,
}

impl TemperatureInterval {
    pub fn new(t_low: f64, t_high: f64, a: [f64; 7], b1: f64, b2: f64) -> Self {
        Self {
            t_low,
            t_high,
            a,
            b1,
            b2,
        }
    }

    /// Map a 7-coefficient record (`Cp/R = a1 + a2 T + ... + a5 T^4`,
    /// `a6`, `a7` integration constants) onto the 9-coefficient layout.
    pub fn from_nasa7(t_low: f64, t_high: f64, c: [f64; 7]) -> Self {
        Self {
            t_low,
            t_high,
            a: [0.0, 0.0, c[0], c[1], c[2], c[3], c[4]],
            b1: c[5],
            b2: c[6],
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.t_low && t <= self.t_high
    }
}

/// A product species: identity, phase, composition and property data.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoSpecies {
    name: String,
    phase: Phase,
    formula: Formula,
    molar_mass: f64,
    intervals: Vec<TemperatureInterval>,
}

impl ThermoSpecies {
    /// Validates that intervals are non-empty, ordered and non-degenerate.
    pub fn new(
        name: impl Into<String>,
        phase: Phase,
        formula: Formula,
        intervals: Vec<TemperatureInterval>,
    ) -> ThermoResult<Self> {
        let name = name.into();
        let invalid = |what| ThermoError::InvalidData {
            name: name.clone(),
            what,
        };

        if formula.is_empty() {
            return Err(invalid("empty formula"));
        }
        if formula.len() > MAX_FORMULA_ELEMENTS {
            return Err(invalid("too many elements in formula"));
        }
        if intervals.is_empty() {
            return Err(invalid("no temperature intervals"));
        }
        for iv in &intervals {
            let finite = iv.a.iter().all(|c| c.is_finite()) && iv.b1.is_finite() && iv.b2.is_finite();
            if !finite {
                return Err(invalid("non-finite coefficient"));
            }
            if !(iv.t_low > 0.0 && iv.t_high > iv.t_low) {
                return Err(invalid("bad interval bounds"));
            }
        }
        if intervals.windows(2).any(|w| w[1].t_low < w[0].t_high - 1e-9) {
            return Err(invalid("intervals overlap or are unordered"));
        }

        let molar_mass = formula.molar_mass();
        Ok(Self {
            name,
            phase,
            formula,
            molar_mass,
            intervals,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_gas(&self) -> bool {
        self.phase == Phase::Gas
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.molar_mass
    }

    pub fn intervals(&self) -> &[TemperatureInterval] {
        &self.intervals
    }

    /// Lowest temperature covered by the data [K].
    pub fn t_min(&self) -> f64 {
        self.intervals.first().map_or(0.0, |iv| iv.t_low)
    }

    /// Highest temperature covered by the data [K].
    pub fn t_max(&self) -> f64 {
        self.intervals.last().map_or(0.0, |iv| iv.t_high)
    }
}
