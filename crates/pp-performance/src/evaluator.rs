//! Isentropic nozzle expansion from an equilibrium chamber.
//!
//! The chamber entropy is the invariant. The throat is found by driving
//! the flow velocity to the local sound speed; an area-ratio exit by
//! driving the mass-flux ratio to the requested `Ae/At`. Frozen stations
//! keep the chamber composition, shifting stations re-equilibrate at
//! fixed entropy.

use crate::config::PerformanceConfig;
use crate::error::PerformanceResult;
use crate::exit::ExitCondition;
use crate::record::{Mode, PerformanceSolution, PerformanceWarning, StationPerformance};
use pp_core::constants::R_GAS;
use pp_core::units::{atm, k, to_atm};
use pp_equilibrium::{
    Equilibrium, EquilibriumConfig, EquilibriumState, ProblemType, frozen_properties, mixture_specific_heat0,
    product_entropy, product_entropy_at,
};
use pp_thermo::SpeciesDatabase;
use tracing::{debug, info, warn};

/// Chamber, throat and exit states of one nozzle.
#[derive(Debug, Clone, PartialEq)]
pub struct NozzleStates {
    pub chamber: EquilibriumState,
    pub throat: EquilibriumState,
    pub exit: EquilibriumState,
}

impl NozzleStates {
    pub fn new(chamber: EquilibriumState) -> Self {
        Self {
            throat: chamber.clone(),
            exit: chamber.clone(),
            chamber,
        }
    }
}

/// Flow quantities at one station.
#[derive(Debug, Clone, Copy)]
struct Flow {
    /// [atm]
    pressure: f64,
    /// [K]
    temperature: f64,
    /// [m/s]
    velocity: f64,
    /// [m/s]
    sound_speed: f64,
    gamma: f64,
    /// Gas moles per gram
    n: f64,
}

impl Flow {
    /// Area per unit mass flow, with velocity `isp` [m/s/atm].
    fn a_dotm(&self, isp: f64) -> f64 {
        1000.0 * R_GAS * self.temperature * self.n / (self.pressure * isp)
    }
}

pub struct PerformanceEvaluator<'db> {
    equilibrium: Equilibrium<'db>,
    config: PerformanceConfig,
}

impl<'db> PerformanceEvaluator<'db> {
    pub fn new(db: &'db SpeciesDatabase) -> Self {
        Self::with_config(db, EquilibriumConfig::default(), PerformanceConfig::default())
    }

    pub fn with_config(db: &'db SpeciesDatabase, equilibrium: EquilibriumConfig, config: PerformanceConfig) -> Self {
        Self {
            equilibrium: Equilibrium::with_config(db, equilibrium),
            config,
        }
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    fn db(&self) -> &'db SpeciesDatabase {
        self.equilibrium.database()
    }

    /// Expand the chamber state through the throat to the exit.
    ///
    /// The exit condition is checked before any state is touched. The
    /// chamber is solved at fixed enthalpy only if it is not already in
    /// equilibrium, and is not modified afterwards.
    pub fn evaluate(
        &self,
        states: &mut NozzleStates,
        mode: Mode,
        exit: ExitCondition,
    ) -> PerformanceResult<PerformanceSolution> {
        let pc = states.chamber.pressure_atm();
        exit.validate(pc)?;

        if !states.chamber.is_equilibrated() {
            self.equilibrium.solve(&mut states.chamber, ProblemType::Hp)?;
        }

        let db = self.db();
        let chamber = &states.chamber;
        let frozen = frozen_properties(db, chamber);
        let equilibrium_gamma = chamber.properties().isentropic_exponent;
        let (gamma0, frozen_entropy) = match mode {
            Mode::Frozen => (frozen.isentropic_exponent, product_entropy(db, chamber)),
            Mode::Shifting if equilibrium_gamma > 1.0 => (equilibrium_gamma, 0.0),
            Mode::Shifting => (frozen.isentropic_exponent, 0.0),
        };

        states.throat = chamber.clone();
        states.exit = chamber.clone();
        if mode == Mode::Shifting {
            let s = chamber.properties().entropy;
            states.throat.set_target_entropy(s);
            states.exit.set_target_entropy(s);
        }

        let mut warnings = Vec::new();
        let mut pc_pt = ((gamma0 + 1.0) / 2.0).powf(gamma0 / (gamma0 - 1.0));

        // Throat: v = a
        let max = self.config.max_throat_iterations.max(1);
        let mut iterations = 0;
        let throat = loop {
            let flow = self.station(chamber, &mut states.throat, mode, pc / pc_pt, frozen_entropy, &mut warnings)?;
            iterations += 1;
            let v2 = flow.velocity * flow.velocity;
            let a2 = flow.sound_speed * flow.sound_speed;
            debug!(iterations, pc_pt, velocity = flow.velocity, sound_speed = flow.sound_speed, "throat search");
            if v2 > 0.0 && ((v2 - a2) / v2).abs() <= self.config.throat_tol {
                break flow;
            }
            if iterations >= max {
                warn!(iterations, "throat pressure not converged");
                warnings.push(PerformanceWarning::ThroatNotConverged { iterations });
                break flow;
            }
            pc_pt /= 1.0 + (v2 - a2) / (1000.0 * (flow.gamma + 1.0) * flow.n * R_GAS * flow.temperature);
        };
        let throat_a_dotm = throat.a_dotm(throat.sound_speed);

        // Exit
        let exit_pressure = match exit.seed_log_pressure_ratio(pc_pt, throat.gamma) {
            None => match exit {
                ExitCondition::Pressure(p) => to_atm(p),
                _ => pc,
            },
            Some(seed) => {
                let target = exit.area_ratio().unwrap_or(1.0).ln();
                let max = self.config.max_exit_iterations.max(1);
                let mut log_ratio = seed;
                let mut iterations = 0;
                loop {
                    let flow =
                        self.station(chamber, &mut states.exit, mode, pc / log_ratio.exp(), frozen_entropy, &mut warnings)?;
                    iterations += 1;
                    let v2 = flow.velocity * flow.velocity;
                    let a2 = flow.sound_speed * flow.sound_speed;
                    let area_ratio = flow.a_dotm(flow.velocity) / throat_a_dotm;
                    let step = flow.gamma * v2 / (v2 - a2) * (target - area_ratio.ln());
                    debug!(iterations, log_ratio, area_ratio, "exit search");
                    if !step.is_finite() {
                        warn!(iterations, "exit pressure search left the physical range");
                        warnings.push(PerformanceWarning::ExitNotConverged { iterations });
                        break;
                    }
                    log_ratio += step;
                    if step.abs() <= self.config.exit_tol {
                        break;
                    }
                    if iterations >= max {
                        warn!(iterations, "exit pressure not converged");
                        warnings.push(PerformanceWarning::ExitNotConverged { iterations });
                        break;
                    }
                }
                pc / log_ratio.exp()
            }
        };
        let exit_flow = self.station(chamber, &mut states.exit, mode, exit_pressure, frozen_entropy, &mut warnings)?;

        let throat_record = StationPerformance {
            pressure: throat.pressure,
            temperature: throat.temperature,
            isp: throat.sound_speed,
            a_dotm: throat_a_dotm,
            area_ratio: 1.0,
            cstar: pc * throat_a_dotm,
            cf: throat.sound_speed / (pc * throat_a_dotm),
            ivac: throat.sound_speed + throat.pressure * throat_a_dotm,
            sound_speed: throat.sound_speed,
            mach: throat.velocity / throat.sound_speed,
        };
        let exit_a_dotm = exit_flow.a_dotm(exit_flow.velocity);
        let exit_record = StationPerformance {
            pressure: exit_flow.pressure,
            temperature: exit_flow.temperature,
            isp: exit_flow.velocity,
            a_dotm: exit_a_dotm,
            area_ratio: exit_a_dotm / throat_a_dotm,
            cstar: pc * throat_a_dotm,
            cf: exit_flow.velocity / (pc * throat_a_dotm),
            ivac: exit_flow.velocity + exit_flow.pressure * exit_a_dotm,
            sound_speed: exit_flow.sound_speed,
            mach: exit_flow.velocity / exit_flow.sound_speed,
        };

        info!(
            %mode,
            isp = exit_record.isp,
            cf = exit_record.cf,
            area_ratio = exit_record.area_ratio,
            warnings = warnings.len(),
            "nozzle performance evaluated"
        );

        Ok(PerformanceSolution {
            mode,
            chamber_pressure: pc,
            chamber_temperature: chamber.temperature_k(),
            throat: throat_record,
            exit: exit_record,
            warnings,
        })
    }

    /// Bring `station` to `p_atm` at the chamber entropy and measure the flow.
    fn station(
        &self,
        chamber: &EquilibriumState,
        station: &mut EquilibriumState,
        mode: Mode,
        p_atm: f64,
        frozen_entropy: f64,
        warnings: &mut Vec<PerformanceWarning>,
    ) -> PerformanceResult<Flow> {
        match mode {
            Mode::Frozen => {
                let t = self.frozen_temperature(chamber, p_atm, frozen_entropy, warnings);
                station.freeze_at(self.db(), k(t), atm(p_atm));
            }
            Mode::Shifting => {
                station.set_pressure(atm(p_atm));
                let summary = self.equilibrium.solve(station, ProblemType::Sp)?;
                if !summary.derivatives_complete {
                    warnings.push(PerformanceWarning::DerivativesIncomplete { pressure: p_atm });
                }
            }
        }

        let drop = chamber.properties().enthalpy - station.properties().enthalpy;
        let props = station.properties();
        Ok(Flow {
            pressure: p_atm,
            temperature: station.temperature_k(),
            velocity: (2000.0 * drop).max(0.0).sqrt(),
            sound_speed: props.sound_speed,
            gamma: props.isentropic_exponent,
            n: station.gas_moles(),
        })
    }

    /// Temperature at which the chamber composition has entropy `s_target` at `p_atm`.
    fn frozen_temperature(
        &self,
        chamber: &EquilibriumState,
        p_atm: f64,
        s_target: f64,
        warnings: &mut Vec<PerformanceWarning>,
    ) -> f64 {
        let db = self.db();
        let max = self.config.max_temperature_iterations;
        let mut t = chamber.temperature_k();
        for _ in 0..max {
            let delta = (s_target - product_entropy_at(db, chamber, p_atm, t)) / mixture_specific_heat0(db, chamber, t);
            t = (t.ln() + delta).exp();
            if delta.abs() < self.config.temperature_tol {
                return t;
            }
        }
        warn!(pressure = p_atm, iterations = max, "frozen temperature not converged");
        warnings.push(PerformanceWarning::TemperatureNotConverged {
            pressure: p_atm,
            iterations: max,
        });
        t
    }
}
