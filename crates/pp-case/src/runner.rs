//! Case execution.
//!
//! Cases are independent and run in parallel; every problem inside a case
//! owns its own states and runs sequentially.

use crate::error::{CaseError, CaseResult};
use crate::report::{CaseReport, EquilibriumReport, PerformanceReport, ProblemOutcome, composition};
use crate::schema::{CaseDef, CaseFile, ProblemDef};
use pp_core::units::{atm, k};
use pp_equilibrium::{Equilibrium, EquilibriumConfig, EquilibriumState, ProblemType};
use pp_performance::{ExitCondition, Mode, NozzleStates, PerformanceConfig, PerformanceEvaluator};
use pp_thermo::{Propellant, SpeciesDatabase};
use rayon::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Temperature at which the ingredients are taken for fixed-enthalpy problems [K].
const INITIAL_TEMPERATURE: f64 = 298.15;

pub fn parse_case_file(text: &str) -> CaseResult<CaseFile> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn load_case_file(path: &Path) -> CaseResult<CaseFile> {
    let text = std::fs::read_to_string(path).map_err(|source| CaseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_case_file(&text)
}

/// Run every case of a file. Results keep the file order.
pub fn run_file(db: &SpeciesDatabase, file: &CaseFile) -> Vec<CaseResult<CaseReport>> {
    file.cases
        .par_iter()
        .map(|case| run_case(db, case, file.equilibrium, file.performance))
        .collect()
}

/// Build the propellant mixture of a case.
pub fn build_propellant(db: &SpeciesDatabase, case: &CaseDef) -> CaseResult<Propellant> {
    let mut propellant = Propellant::new();
    for ingredient in &case.propellants {
        let id = db.require_propellant(&ingredient.name)?;
        match (ingredient.moles, ingredient.grams) {
            (Some(moles), None) => propellant.add_moles(id, moles)?,
            (None, Some(grams)) => propellant.add_grams(db, id, grams)?,
            _ => {
                return Err(CaseError::InvalidCase {
                    case: case.name.clone(),
                    what: format!("ingredient '{}' needs exactly one of moles or grams", ingredient.name),
                });
            }
        }
    }
    Ok(propellant)
}

/// Run one case. Problem failures are recorded in the report; only an
/// invalid propellant fails the whole case.
pub fn run_case(
    db: &SpeciesDatabase,
    case: &CaseDef,
    equilibrium: EquilibriumConfig,
    performance: PerformanceConfig,
) -> CaseResult<CaseReport> {
    let propellant = build_propellant(db, case)?;
    let mut report = CaseReport {
        name: case.name.clone(),
        propellant_enthalpy: propellant.enthalpy(db)?,
        propellant_density: propellant.density(db).ok(),
        results: Vec::with_capacity(case.problems.len()),
    };

    for problem in &case.problems {
        let outcome = match run_problem(db, &case.name, &propellant, problem, equilibrium, performance) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(case = %case.name, problem = problem_label(problem), error = %err, "problem failed");
                ProblemOutcome::Failed {
                    problem: problem_label(problem).to_string(),
                    error: err.to_string(),
                }
            }
        };
        report.results.push(outcome);
    }

    info!(case = %case.name, problems = report.results.len(), failures = report.failures(), "case finished");
    Ok(report)
}

fn problem_label(problem: &ProblemDef) -> &'static str {
    match problem {
        ProblemDef::Tp { .. } => "tp",
        ProblemDef::Hp { .. } => "hp",
        ProblemDef::Frozen { .. } => "frozen",
        ProblemDef::Shifting { .. } => "shifting",
    }
}

fn check_positive(case: &str, what: &str, value: f64) -> CaseResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CaseError::InvalidCase {
            case: case.to_string(),
            what: format!("{what} must be positive, got {value}"),
        })
    }
}

fn run_problem(
    db: &SpeciesDatabase,
    case: &str,
    propellant: &Propellant,
    problem: &ProblemDef,
    equilibrium: EquilibriumConfig,
    performance: PerformanceConfig,
) -> CaseResult<ProblemOutcome> {
    match problem {
        ProblemDef::Tp {
            pressure_atm,
            temperature_k,
        } => {
            check_positive(case, "pressure", *pressure_atm)?;
            check_positive(case, "temperature", *temperature_k)?;
            let mut state = EquilibriumState::with_conditions(propellant.clone(), k(*temperature_k), atm(*pressure_atm));
            let summary = Equilibrium::with_config(db, equilibrium).solve(&mut state, ProblemType::Tp)?;
            Ok(ProblemOutcome::Equilibrium(EquilibriumReport::from_state(db, &state, summary)))
        }
        ProblemDef::Hp { pressure_atm } => {
            check_positive(case, "pressure", *pressure_atm)?;
            let mut state =
                EquilibriumState::with_conditions(propellant.clone(), k(INITIAL_TEMPERATURE), atm(*pressure_atm));
            let summary = Equilibrium::with_config(db, equilibrium).solve(&mut state, ProblemType::Hp)?;
            Ok(ProblemOutcome::Equilibrium(EquilibriumReport::from_state(db, &state, summary)))
        }
        ProblemDef::Frozen { pressure_atm, exit } | ProblemDef::Shifting { pressure_atm, exit } => {
            check_positive(case, "pressure", *pressure_atm)?;
            let mode = if matches!(problem, ProblemDef::Frozen { .. }) {
                Mode::Frozen
            } else {
                Mode::Shifting
            };
            let exit = ExitCondition::from_tag(&exit.kind, exit.value)?;

            let mut chamber =
                EquilibriumState::with_conditions(propellant.clone(), k(INITIAL_TEMPERATURE), atm(*pressure_atm));
            let engine = Equilibrium::with_config(db, equilibrium);
            let summary = engine.solve(&mut chamber, ProblemType::Hp)?;

            let mut states = NozzleStates::new(chamber);
            let solution = PerformanceEvaluator::with_config(db, equilibrium, performance).evaluate(&mut states, mode, exit)?;
            Ok(ProblemOutcome::Performance(PerformanceReport {
                chamber: EquilibriumReport::from_state(db, &states.chamber, summary),
                exit_composition: composition(db, &states.exit),
                solution,
            }))
        }
    }
}
