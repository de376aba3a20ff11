//! Performance figures per nozzle station.

use pp_core::constants::G0_MPS2;
use pp_core::units::{Pressure, to_atm};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composition treatment during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Composition fixed at the chamber equilibrium
    Frozen,
    /// Composition re-equilibrated at every station
    Shifting,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Frozen => "frozen",
            Mode::Shifting => "shifting",
        })
    }
}

/// Results at the throat or the exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPerformance {
    /// [atm]
    pub pressure: f64,
    /// [K]
    pub temperature: f64,
    /// Specific impulse as an effective velocity [m/s]
    pub isp: f64,
    /// Area per unit mass flow [m/s/atm]
    pub a_dotm: f64,
    /// A/At
    pub area_ratio: f64,
    /// Characteristic velocity [m/s]
    pub cstar: f64,
    /// Thrust coefficient
    pub cf: f64,
    /// Vacuum specific impulse [m/s]
    pub ivac: f64,
    /// [m/s]
    pub sound_speed: f64,
    /// Flow velocity over local sound speed
    pub mach: f64,
}

impl StationPerformance {
    /// Specific impulse [s].
    pub fn isp_seconds(&self) -> f64 {
        self.isp / G0_MPS2
    }

    pub fn ivac_seconds(&self) -> f64 {
        self.ivac / G0_MPS2
    }

    /// Specific impulse against an ambient pressure [m/s].
    pub fn ambient_isp(&self, ambient: Pressure) -> f64 {
        self.isp + (self.pressure - to_atm(ambient)) * self.a_dotm
    }
}

/// Refinement loop that stopped at its cap; the figures are usable but less accurate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerformanceWarning {
    TemperatureNotConverged { pressure: f64, iterations: usize },
    ThroatNotConverged { iterations: usize },
    ExitNotConverged { iterations: usize },
    /// Station derivative properties could not be updated
    DerivativesIncomplete { pressure: f64 },
}

impl fmt::Display for PerformanceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemperatureNotConverged { pressure, iterations } => write!(
                f,
                "temperature at {pressure:.4} atm not converged in {iterations} iterations"
            ),
            Self::ThroatNotConverged { iterations } => {
                write!(f, "throat pressure not converged in {iterations} iterations")
            }
            Self::ExitNotConverged { iterations } => {
                write!(f, "exit pressure not converged in {iterations} iterations")
            }
            Self::DerivativesIncomplete { pressure } => {
                write!(f, "derivative properties incomplete at {pressure:.4} atm")
            }
        }
    }
}

/// Throat and exit figures of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSolution {
    pub mode: Mode,
    /// [atm]
    pub chamber_pressure: f64,
    /// [K]
    pub chamber_temperature: f64,
    pub throat: StationPerformance,
    pub exit: StationPerformance,
    pub warnings: Vec<PerformanceWarning>,
}

impl PerformanceSolution {
    /// No refinement loop hit its cap.
    pub fn is_reliable(&self) -> bool {
        self.warnings.is_empty()
    }
}
