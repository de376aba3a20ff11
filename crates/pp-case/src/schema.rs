//! Case file schema.

use pp_equilibrium::EquilibriumConfig;
use pp_performance::PerformanceConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    #[serde(default)]
    pub cases: Vec<CaseDef>,
    /// Solver overrides applied to every case
    #[serde(default)]
    pub equilibrium: EquilibriumConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub name: String,
    pub propellants: Vec<IngredientDef>,
    #[serde(default)]
    pub problems: Vec<ProblemDef>,
}

/// One ingredient, given either in moles or in grams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moles: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grams: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemDef {
    /// Fixed temperature and pressure
    Tp { pressure_atm: f64, temperature_k: f64 },
    /// Adiabatic combustion at fixed pressure
    Hp { pressure_atm: f64 },
    /// Frozen-flow nozzle expansion
    Frozen { pressure_atm: f64, exit: ExitDef },
    /// Shifting-equilibrium nozzle expansion
    Shifting { pressure_atm: f64, exit: ExitDef },
}

/// Exit condition as written in a case file; pressures in atm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExitDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}
