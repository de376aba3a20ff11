//! Case results and their text rendering.

use pp_equilibrium::{EquilibriumState, ProblemType, SolveSummary, ThermoProperties};
use pp_performance::{PerformanceSolution, StationPerformance};
use pp_thermo::SpeciesDatabase;
use serde::Serialize;
use std::fmt::Write;

/// Mole fractions below this are left out of composition listings.
pub const TRACE_FRACTION: f64 = 5e-6;

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    /// Propellant enthalpy [kJ/kg]
    pub propellant_enthalpy: f64,
    /// Propellant density [g/cm^3]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propellant_density: Option<f64>,
    pub results: Vec<ProblemOutcome>,
}

impl CaseReport {
    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, ProblemOutcome::Failed { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemOutcome {
    Equilibrium(EquilibriumReport),
    Performance(PerformanceReport),
    Failed { problem: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesFraction {
    pub name: String,
    pub mole_fraction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquilibriumReport {
    pub problem: ProblemType,
    pub pressure_atm: f64,
    pub temperature_k: f64,
    pub summary: SolveSummary,
    pub properties: ThermoProperties,
    pub composition: Vec<SpeciesFraction>,
}

impl EquilibriumReport {
    pub fn from_state(db: &SpeciesDatabase, state: &EquilibriumState, summary: SolveSummary) -> Self {
        Self {
            problem: summary.problem,
            pressure_atm: state.pressure_atm(),
            temperature_k: state.temperature_k(),
            summary,
            properties: *state.properties(),
            composition: composition(db, state),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub chamber: EquilibriumReport,
    pub exit_composition: Vec<SpeciesFraction>,
    pub solution: PerformanceSolution,
}

/// Mole fractions above the trace level, largest first.
pub fn composition(db: &SpeciesDatabase, state: &EquilibriumState) -> Vec<SpeciesFraction> {
    let mut out: Vec<SpeciesFraction> = state
        .mole_fractions()
        .into_iter()
        .filter(|(_, x)| *x >= TRACE_FRACTION)
        .map(|(id, x)| SpeciesFraction {
            name: db.species(id).name().to_string(),
            mole_fraction: x,
        })
        .collect();
    out.sort_by(|a, b| b.mole_fraction.total_cmp(&a.mole_fraction));
    out
}

pub fn render_text(report: &CaseReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", report.name);
    let _ = write!(out, "Propellant enthalpy: {:.2} kJ/kg", report.propellant_enthalpy);
    if let Some(rho) = report.propellant_density {
        let _ = write!(out, ", density: {rho:.4} g/cm^3");
    }
    out.push('\n');

    for result in &report.results {
        out.push('\n');
        match result {
            ProblemOutcome::Equilibrium(eq) => render_equilibrium(&mut out, eq),
            ProblemOutcome::Performance(perf) => {
                let _ = writeln!(out, "--- {} performance ---", perf.solution.mode);
                render_equilibrium(&mut out, &perf.chamber);
                render_station(&mut out, "Throat", &perf.solution.throat);
                render_station(&mut out, "Exit", &perf.solution.exit);
                let _ = writeln!(out, "Exit composition:");
                render_composition(&mut out, &perf.exit_composition);
                for w in &perf.solution.warnings {
                    let _ = writeln!(out, "warning: {w}");
                }
            }
            ProblemOutcome::Failed { problem, error } => {
                let _ = writeln!(out, "--- {problem} FAILED: {error}");
            }
        }
    }
    out
}

fn render_equilibrium(out: &mut String, eq: &EquilibriumReport) {
    let p = &eq.properties;
    let _ = writeln!(
        out,
        "{} equilibrium: P = {:.4} atm, T = {:.2} K ({} iterations{})",
        eq.problem,
        eq.pressure_atm,
        eq.temperature_k,
        eq.summary.iterations,
        if eq.summary.derivatives_complete { "" } else { ", derivatives incomplete" }
    );
    let _ = writeln!(out, "  H = {:>10.3} kJ/kg    U = {:>10.3} kJ/kg", p.enthalpy, p.internal_energy);
    let _ = writeln!(out, "  G = {:>10.3} kJ/kg    S = {:>10.5} kJ/(kg K)", p.gibbs, p.entropy);
    let _ = writeln!(out, "  M = {:>10.4} g/mol    Cp = {:>9.5} kJ/(kg K)", p.molar_mass, p.cp);
    let _ = writeln!(
        out,
        "  gamma = {:.5}    a = {:.2} m/s    dlnV/dlnT = {:.5}    dlnV/dlnP = {:.5}",
        p.isentropic_exponent, p.sound_speed, p.dlnv_dlnt, p.dlnv_dlnp
    );
    render_composition(out, &eq.composition);
}

fn render_composition(out: &mut String, species: &[SpeciesFraction]) {
    for s in species {
        let _ = writeln!(out, "  {:<12} {:.5e}", s.name, s.mole_fraction);
    }
}

fn render_station(out: &mut String, label: &str, s: &StationPerformance) {
    let _ = writeln!(
        out,
        "{label}: P = {:.4} atm, T = {:.2} K, Ae/At = {:.4}, M = {:.4}",
        s.pressure, s.temperature, s.area_ratio, s.mach
    );
    let _ = writeln!(
        out,
        "  Isp = {:.2} m/s ({:.2} s)    Ivac = {:.2} m/s    C* = {:.2} m/s    Cf = {:.5}",
        s.isp,
        s.isp_seconds(),
        s.ivac,
        s.cstar,
        s.cf
    );
}
