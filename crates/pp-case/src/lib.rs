//! pp-case: YAML case files, batch runner and reports.
//!
//! A case names a propellant mixture and a list of problems (fixed T/P
//! equilibrium, adiabatic combustion, frozen or shifting nozzle
//! expansion). Cases are evaluated in parallel.

pub mod error;
pub mod report;
pub mod runner;
pub mod schema;

pub use error::{CaseError, CaseResult};
pub use report::{
    CaseReport, EquilibriumReport, PerformanceReport, ProblemOutcome, SpeciesFraction, TRACE_FRACTION, composition,
    render_text,
};
pub use runner::{build_propellant, load_case_file, parse_case_file, run_case, run_file};
pub use schema::{CaseDef, CaseFile, ExitDef, IngredientDef, ProblemDef};
