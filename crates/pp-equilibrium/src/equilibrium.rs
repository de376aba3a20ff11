//! Gibbs minimization by damped Newton iteration on the Lagrangian.
//!
//! The unknowns are corrections to the element multipliers, condensed
//! mole numbers, `ln n` and (fixed enthalpy or entropy) `ln T`. After every
//! converged pass the condensed species set is revised; the pass is only
//! accepted once the set no longer changes.

use crate::config::EquilibriumConfig;
use crate::derivative::derive_properties;
use crate::error::{EquilibriumError, EquilibriumResult};
use crate::linear;
use crate::matrix::MatrixLayout;
use crate::mixture::fill_bulk_properties;
use crate::products::ProductSet;
use crate::state::{EquilibriumState, ProblemType};
use nalgebra::{DMatrix, DVector};
use pp_core::SpeciesId;
use pp_core::constants::R_GAS;
use pp_thermo::{SpeciesDatabase, gas_entropy, gas_gibbs};
use serde::Serialize;
use tracing::{debug, info, warn};

/// `ln(1e4)`: a species coming back from below the floor may climb at most
/// this far above it in one step.
const FLOOR_REENTRY_GAP: f64 = 9.210_340_4;

/// Outcome of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveSummary {
    pub problem: ProblemType,
    /// Newton iterations in the accepted pass
    pub iterations: usize,
    /// Species-set changes and singular recoveries
    pub set_revisions: usize,
    /// Condensed candidates set aside after they left the set right after inclusion
    pub rejected_condensed: usize,
    /// Served from an already equilibrated state
    pub cached: bool,
    /// Derivative properties were updated (false after a singular derivative solve)
    pub derivatives_complete: bool,
    /// [K]
    pub temperature: f64,
}

/// Property values of the active products at the current T and P.
pub(crate) struct Potentials {
    pub mu_gas: Vec<f64>,
    pub h_gas: Vec<f64>,
    pub s_gas: Vec<f64>,
    pub cp_gas: Vec<f64>,
    pub g_cond: Vec<f64>,
    pub h_cond: Vec<f64>,
    pub s_cond: Vec<f64>,
    pub cp_cond: Vec<f64>,
}

impl Potentials {
    pub(crate) fn evaluate(db: &SpeciesDatabase, state: &EquilibriumState, products: &ProductSet) -> Self {
        let t = state.temperature;
        let p = state.pressure_atm();
        let ln_n = state.itn.ln_n;
        let gas = products.gas_species();

        let mut out = Self {
            mu_gas: Vec::with_capacity(gas.len()),
            h_gas: Vec::with_capacity(gas.len()),
            s_gas: Vec::with_capacity(gas.len()),
            cp_gas: Vec::with_capacity(gas.len()),
            g_cond: Vec::new(),
            h_cond: Vec::new(),
            s_cond: Vec::new(),
            cp_cond: Vec::new(),
        };
        for (k, id) in gas.iter().enumerate() {
            let sp = db.species(*id);
            let ln_frac = state.itn.ln_nj[k] - ln_n;
            out.mu_gas.push(gas_gibbs(sp.gibbs0(t), ln_frac, p));
            out.h_gas.push(sp.enthalpy0(t));
            out.s_gas.push(gas_entropy(sp.entropy0(t), ln_frac, p));
            out.cp_gas.push(sp.specific_heat0(t));
        }
        for c in products.condensed().active() {
            let sp = db.species(c.species);
            out.g_cond.push(sp.gibbs0(t));
            out.h_cond.push(sp.enthalpy0(t));
            out.s_cond.push(sp.entropy0(t));
            out.cp_cond.push(sp.specific_heat0(t));
        }
        out
    }
}

/// Element-balance block, condensed coupling and the `ln n` border shared
/// by the equilibrium and derivative systems.
pub(crate) fn fill_common(db: &SpeciesDatabase, products: &ProductSet, layout: &MatrixLayout, m: &mut DMatrix<f64>) {
    let ne = layout.n_elements();
    let ng = products.n_gas();
    let nj = products.gas_moles();
    let idx_n = layout.total_moles();

    for j in 0..ne {
        for i in 0..=j {
            let v: f64 = (0..ng)
                .map(|k| products.gas_coef(j, k) * products.gas_coef(i, k) * nj[k])
                .sum();
            m[(layout.element(j), layout.element(i))] = v;
            m[(layout.element(i), layout.element(j))] = v;
        }
        let v: f64 = (0..ng).map(|k| products.gas_coef(j, k) * nj[k]).sum();
        m[(layout.element(j), idx_n)] = v;
        m[(idx_n, layout.element(j))] = v;
    }

    for (c, entry) in products.condensed().active().iter().enumerate() {
        let col = layout.condensed(c);
        for j in 0..ne {
            let a = products.species_coef(db, j, entry.species);
            m[(layout.element(j), col)] = a;
            m[(col, layout.element(j))] = a;
        }
    }
}

/// Problem-specific targets fixed for the duration of one solve.
struct Targets {
    /// Element moles per gram of propellant
    b0: Vec<f64>,
    /// Propellant `H/R` per gram [K mol/g]
    enthalpy: f64,
    /// Propellant `S/R` per gram
    entropy: f64,
}

/// Equilibrium engine bound to a species database.
pub struct Equilibrium<'db> {
    db: &'db SpeciesDatabase,
    config: EquilibriumConfig,
}

impl<'db> Equilibrium<'db> {
    pub fn new(db: &'db SpeciesDatabase) -> Self {
        Self::with_config(db, EquilibriumConfig::default())
    }

    pub fn with_config(db: &'db SpeciesDatabase, config: EquilibriumConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &EquilibriumConfig {
        &self.config
    }

    pub fn database(&self) -> &'db SpeciesDatabase {
        self.db
    }

    /// List candidate products for the state's propellant. No-op when already listed.
    pub fn list_products(&self, state: &mut EquilibriumState) -> EquilibriumResult<()> {
        if state.products.is_none() {
            state.products = Some(ProductSet::enumerate(self.db, state.propellant())?);
        }
        Ok(())
    }

    /// Bring `state` to chemical equilibrium holding the pair selected by `problem` fixed.
    pub fn solve(&self, state: &mut EquilibriumState, problem: ProblemType) -> EquilibriumResult<SolveSummary> {
        if state.equilibrated && state.last_problem == Some(problem) {
            return Ok(SolveSummary {
                problem,
                iterations: 0,
                set_revisions: 0,
                rejected_condensed: 0,
                cached: true,
                derivatives_complete: state.properties_computed,
                temperature: state.temperature,
            });
        }
        if problem == ProblemType::Sp && state.target_entropy_dimensionless().is_none() {
            return Err(EquilibriumError::MissingTargetEntropy);
        }

        self.list_products(state)?;
        let targets = self.targets(state)?;

        if !state.converged_once {
            self.seed(state)?;
            if !problem.fixes_temperature() {
                state.temperature = self.config.initial_temperature;
            }
        }
        state.equilibrated = false;
        state.properties_computed = false;

        let mut k = 0;
        let mut revisions = 0;
        let mut gas_reinserted = false;
        // Condensed species included since the last converged pass.
        let mut probation: Option<SpeciesId> = None;
        // Candidates that left the set right after inclusion; not retried in this solve.
        let mut rejected: Vec<SpeciesId> = Vec::new();
        loop {
            if k >= self.config.max_iterations {
                return Err(EquilibriumError::TooManyIterations {
                    limit: self.config.max_iterations,
                    what: "equilibrium newton",
                });
            }

            let (layout, matrix, rhs, potentials) = self.assemble(state, problem, &targets)?;
            let sol = match linear::solve(matrix, &rhs) {
                Ok(sol) => sol,
                Err(_) => {
                    warn!(iteration = k, temperature = state.temperature, "singular equilibrium matrix");
                    match probation {
                        // A fresh zero-mole candidate: bring back the absent gases first.
                        Some(_) if !gas_reinserted => {
                            self.reinsert_gas(state);
                            gas_reinserted = true;
                        }
                        Some(species) => {
                            self.reject_condensed(state, species);
                            rejected.push(species);
                            probation = None;
                            gas_reinserted = false;
                        }
                        None => {
                            if self.remove_condensed(state) {
                                gas_reinserted = false;
                            } else if gas_reinserted {
                                return Err(EquilibriumError::SingularRecoveryExhausted { iterations: k });
                            } else {
                                self.reinsert_gas(state);
                                gas_reinserted = true;
                            }
                        }
                    }
                    revisions += 1;
                    self.check_revisions(revisions)?;
                    k = 0;
                    continue;
                }
            };

            let lambda = self.update(state, &layout, &sol, &potentials);
            k += 1;
            debug!(
                iteration = k,
                temperature = state.temperature,
                total_moles = state.itn.n,
                lambda,
                "newton step"
            );

            let multipliers: Vec<f64> = (0..layout.n_elements()).map(|i| sol[layout.element(i)]).collect();

            // Below the data range the gas phase alone cannot meet the target.
            if !problem.fixes_temperature() && state.temperature < self.config.min_temperature {
                let t = state.temperature;
                state.temperature = self.config.min_temperature;
                if let Some(species) = self.include_condensed(state, &multipliers, &rejected) {
                    debug!(temperature = t, "temperature below data range");
                    probation = Some(species);
                    gas_reinserted = false;
                    revisions += 1;
                    self.check_revisions(revisions)?;
                    k = 0;
                    continue;
                }
                state.temperature = t;
            }

            if !self.converged(state, &layout, &sol) {
                continue;
            }

            gas_reinserted = false;
            // Removal first; inclusion is evaluated only against a stable set.
            let mut changed = self.remove_condensed(state);
            if let Some(species) = probation.take() {
                let kept = state
                    .products()
                    .is_some_and(|p| p.condensed().active_position(species).is_some());
                if !kept {
                    debug!(species = self.db.species(species).name(), "condensed species dropped after inclusion");
                    rejected.push(species);
                }
            }
            if !changed {
                probation = self.include_condensed(state, &multipliers, &rejected);
                changed = probation.is_some();
            }
            if changed {
                revisions += 1;
                self.check_revisions(revisions)?;
                debug!(revisions, "condensed species set revised");
                k = 0;
                continue;
            }
            break;
        }

        self.balance_elements(state, &targets.b0);

        state.equilibrated = true;
        state.converged_once = true;
        state.last_problem = Some(problem);

        let mut props = state.properties;
        fill_bulk_properties(self.db, state, &mut props);
        state.properties = props;
        let derivatives_complete = derive_properties(self.db, state);
        state.properties_computed = true;

        info!(
            problem = %problem,
            iterations = k,
            revisions,
            rejected = rejected.len(),
            temperature = state.temperature,
            "equilibrium converged"
        );

        Ok(SolveSummary {
            problem,
            iterations: k,
            set_revisions: revisions,
            rejected_condensed: rejected.len(),
            cached: false,
            derivatives_complete,
            temperature: state.temperature,
        })
    }

    fn check_revisions(&self, revisions: usize) -> EquilibriumResult<()> {
        if revisions > self.config.max_set_revisions {
            return Err(EquilibriumError::TooManyIterations {
                limit: self.config.max_set_revisions,
                what: "species set revisions",
            });
        }
        Ok(())
    }

    fn targets(&self, state: &EquilibriumState) -> EquilibriumResult<Targets> {
        let products = state.products().ok_or_else(|| EquilibriumError::InvalidState {
            what: "products not listed".to_string(),
        })?;
        let propellant = state.propellant();
        let b0 = products
            .elements()
            .iter()
            .map(|e| propellant.element_moles_per_gram(self.db, *e))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Targets {
            b0,
            enthalpy: propellant.enthalpy(self.db)? / R_GAS,
            entropy: state.target_entropy_dimensionless().unwrap_or(0.0),
        })
    }

    /// Even split of the initial moles over the gas candidates, no condensed species.
    fn seed(&self, state: &mut EquilibriumState) -> EquilibriumResult<()> {
        let n0 = self.config.initial_moles;
        let Some(products) = state.products.as_mut() else {
            return Err(EquilibriumError::InvalidState {
                what: "products not listed".to_string(),
            });
        };
        let ng = products.n_gas();
        if ng == 0 {
            return Err(EquilibriumError::InvalidState {
                what: "no gaseous product candidates".to_string(),
            });
        }
        let nj = n0 / ng as f64;
        products.gas_moles = vec![nj; ng];
        products.condensed.reset();

        let itn = &mut state.itn;
        itn.ln_nj = vec![nj.ln(); ng];
        itn.delta_ln_nj = vec![0.0; ng];
        itn.n = n0;
        itn.ln_n = n0.ln();
        itn.sumn = n0;
        itn.delta_ln_n = 0.0;
        itn.delta_ln_t = 0.0;
        Ok(())
    }

    fn assemble(
        &self,
        state: &EquilibriumState,
        problem: ProblemType,
        targets: &Targets,
    ) -> EquilibriumResult<(MatrixLayout, DMatrix<f64>, DVector<f64>, Potentials)> {
        let products = state.products().ok_or_else(|| EquilibriumError::InvalidState {
            what: "products not listed".to_string(),
        })?;
        let ne = products.n_elements();
        let ng = products.n_gas();
        if state.itn.ln_nj.len() != ng {
            return Err(EquilibriumError::InvalidState {
                what: format!("{} log mole numbers for {ng} gas products", state.itn.ln_nj.len()),
            });
        }
        let layout = MatrixLayout::new(ne, products.condensed().active_len(), problem);
        let size = layout.size();
        let mut m = DMatrix::zeros(size, size);
        let mut rhs = DVector::zeros(size);
        fill_common(self.db, products, &layout, &mut m);

        let pot = Potentials::evaluate(self.db, state, products);
        let nj = products.gas_moles();
        let active = products.condensed().active();
        let idx_n = layout.total_moles();
        let it = layout.temperature();
        let t = state.temperature;
        let itn = &state.itn;

        for j in 0..ne {
            let row = layout.element(j);
            let mut r = targets.b0[j];
            let mut hsum = 0.0;
            for k in 0..ng {
                let an = products.gas_coef(j, k) * nj[k];
                r += an * (pot.mu_gas[k] - 1.0);
                hsum += an * pot.h_gas[k];
            }
            for c in active {
                r -= products.species_coef(self.db, j, c.species) * c.moles;
            }
            rhs[row] = r;
            if let Some(it) = it {
                m[(row, it)] = hsum;
            }
        }

        for c in 0..active.len() {
            let row = layout.condensed(c);
            rhs[row] = pot.g_cond[c];
            if let Some(it) = it {
                m[(row, it)] = pot.h_cond[c];
            }
        }

        let sum_nj: f64 = nj.iter().sum();
        let sum_nh: f64 = (0..ng).map(|k| nj[k] * pot.h_gas[k]).sum();
        let sum_nmu: f64 = (0..ng).map(|k| nj[k] * pot.mu_gas[k]).sum();
        m[(idx_n, idx_n)] = itn.sumn - itn.n;
        rhs[idx_n] = itn.n - itn.sumn + sum_nmu;
        if let Some(it) = it {
            m[(idx_n, it)] = sum_nh;
        }

        let Some(it) = it else {
            return Ok((layout, m, rhs, pot));
        };

        let cp_sum: f64 = (0..ng).map(|k| nj[k] * pot.cp_gas[k]).sum::<f64>()
            + active.iter().zip(&pot.cp_cond).map(|(c, cp)| c.moles * cp).sum::<f64>();

        match problem {
            ProblemType::Hp => {
                for i in 0..ne {
                    m[(it, layout.element(i))] = (0..ng)
                        .map(|k| products.gas_coef(i, k) * nj[k] * pot.h_gas[k])
                        .sum();
                }
                for c in 0..active.len() {
                    m[(it, layout.condensed(c))] = pot.h_cond[c];
                }
                m[(it, idx_n)] = sum_nh;
                m[(it, it)] = cp_sum + (0..ng).map(|k| nj[k] * pot.h_gas[k] * pot.h_gas[k]).sum::<f64>();

                let h_prod = sum_nh + active.iter().zip(&pot.h_cond).map(|(c, h)| c.moles * h).sum::<f64>();
                let nhmu: f64 = (0..ng).map(|k| nj[k] * pot.h_gas[k] * pot.mu_gas[k]).sum();
                rhs[it] = targets.enthalpy / t - h_prod + nhmu;
            }
            ProblemType::Sp => {
                for i in 0..ne {
                    m[(it, layout.element(i))] = (0..ng)
                        .map(|k| products.gas_coef(i, k) * nj[k] * pot.s_gas[k])
                        .sum();
                }
                for c in 0..active.len() {
                    m[(it, layout.condensed(c))] = pot.s_cond[c];
                }
                m[(it, idx_n)] = (0..ng).map(|k| nj[k] * pot.s_gas[k]).sum();
                m[(it, it)] = cp_sum + (0..ng).map(|k| nj[k] * pot.h_gas[k] * pot.s_gas[k]).sum::<f64>();

                let s_gas: f64 = (0..ng).map(|k| nj[k] * pot.s_gas[k]).sum();
                let s_prod = s_gas + active.iter().zip(&pot.s_cond).map(|(c, s)| c.moles * s).sum::<f64>();
                let nmus: f64 = (0..ng).map(|k| nj[k] * pot.mu_gas[k] * pot.s_gas[k]).sum();
                rhs[it] = targets.entropy - s_prod + itn.n - sum_nj + nmus;
            }
            ProblemType::Tp => {}
        }

        Ok((layout, m, rhs, pot))
    }

    /// Apply a damped Newton step. Returns the damping factor used.
    fn update(&self, state: &mut EquilibriumState, layout: &MatrixLayout, sol: &DVector<f64>, pot: &Potentials) -> f64 {
        let floor = self.config.log_concentration_floor;
        let delta_ln_n = sol[layout.total_moles()];
        let delta_ln_t = layout.temperature().map_or(0.0, |it| sol[it]);
        let Some(products) = state.products.as_mut() else {
            return 0.0;
        };
        let itn = &mut state.itn;
        let ng = products.n_gas();

        itn.delta_ln_nj = (0..ng)
            .map(|k| {
                let pi: f64 = (0..layout.n_elements())
                    .map(|i| products.gas_coef(i, k) * sol[layout.element(i)])
                    .sum();
                -pot.mu_gas[k] + pi + delta_ln_n + pot.h_gas[k] * delta_ln_t
            })
            .collect();

        let mut lambda1 = 5.0 * delta_ln_t.abs().max(delta_ln_n.abs());
        let mut lambda2 = 1.0_f64;
        for k in 0..ng {
            let d = itn.delta_ln_nj[k];
            if d <= 0.0 {
                continue;
            }
            if itn.ln_nj[k] - itn.ln_n <= floor {
                let bound = ((-itn.ln_nj[k] + itn.ln_n - FLOOR_REENTRY_GAP) / (d - delta_ln_n)).abs();
                lambda2 = lambda2.min(bound);
            } else if d > lambda1 {
                lambda1 = d;
            }
        }
        let lambda = 1.0_f64.min(2.0 / lambda1).min(lambda2);

        let mut sumn = 0.0;
        for k in 0..ng {
            itn.ln_nj[k] += lambda * itn.delta_ln_nj[k];
            if itn.ln_nj[k] - itn.ln_n <= floor {
                products.gas_moles[k] = 0.0;
            } else {
                let nj = itn.ln_nj[k].exp();
                products.gas_moles[k] = nj;
                sumn += nj;
            }
        }
        itn.sumn = sumn;

        for (c, entry) in products.condensed.active_mut().iter_mut().enumerate() {
            entry.moles += lambda * sol[layout.condensed(c)];
        }

        if layout.temperature().is_some() {
            state.temperature = (state.temperature.ln() + lambda * delta_ln_t).exp();
        }
        itn.ln_n += lambda * delta_ln_n;
        itn.n = itn.ln_n.exp();
        itn.delta_ln_n = delta_ln_n;
        itn.delta_ln_t = delta_ln_t;
        lambda
    }

    fn converged(&self, state: &EquilibriumState, layout: &MatrixLayout, sol: &DVector<f64>) -> bool {
        let Some(products) = state.products() else {
            return false;
        };
        let itn = &state.itn;
        let mol = itn.sumn;
        if mol <= 0.0 || !mol.is_finite() {
            return false;
        }
        let tol = self.config.composition_tol;

        let gas_ok = products
            .gas_moles()
            .iter()
            .zip(&itn.delta_ln_nj)
            .all(|(nj, d)| nj * d.abs() / mol <= tol);
        let condensed_ok =
            (0..layout.n_condensed()).all(|c| sol[layout.condensed(c)].abs() / mol <= tol);
        let total_ok = itn.n * itn.delta_ln_n.abs() / mol <= tol;
        let temperature_ok = itn.delta_ln_t.abs() <= self.config.temperature_tol;

        gas_ok && condensed_ok && total_ok && temperature_ok
    }

    /// Drop condensed species that are absent or outside their data range.
    /// An out-of-range species is replaced by (or joined with) another phase
    /// of the same formula when one is valid at T.
    fn remove_condensed(&self, state: &mut EquilibriumState) -> bool {
        let t = state.temperature;
        let margin = self.config.phase_replace_margin;
        let Some(products) = state.products.as_mut() else {
            return false;
        };
        let set = &mut products.condensed;
        let mut changed = false;

        let mut i = 0;
        while i < set.active_len() {
            let Some(entry) = set.get(i).copied() else {
                break;
            };
            if entry.moles <= 0.0 {
                debug!(species = self.db.species(entry.species).name(), "condensed species absent, removed");
                set.exclude(i);
                changed = true;
                continue;
            }

            let sp = self.db.species(entry.species);
            if sp.temperature_in_range(t) {
                i += 1;
                continue;
            }

            let partner = set.inactive_positions().find(|&pos| {
                set.get(pos).is_some_and(|cand| {
                    let other = self.db.species(cand.species);
                    cand.species != entry.species
                        && other.formula().same_composition(sp.formula())
                        && other.temperature_in_range(t)
                })
            });

            match partner {
                Some(pos) => {
                    let Some(cand) = set.get(pos).copied() else {
                        break;
                    };
                    let other = self.db.species(cand.species);
                    if (t - other.transition_temperature(t)).abs() > margin {
                        debug!(out = sp.name(), into = other.name(), "condensed phase replaced");
                        set.replace(i, pos);
                        i += 1;
                    } else {
                        debug!(species = other.name(), "condensed phase added near transition");
                        set.include(pos);
                        i += 1;
                    }
                }
                None => {
                    debug!(species = sp.name(), temperature = t, "condensed species out of range, removed");
                    set.exclude(i);
                }
            }
            changed = true;
        }
        changed
    }

    /// Include the best inactive candidate not in `skip`; returns its species.
    fn include_condensed(
        &self,
        state: &mut EquilibriumState,
        multipliers: &[f64],
        skip: &[SpeciesId],
    ) -> Option<SpeciesId> {
        let t = state.temperature;
        let products = state.products.as_mut()?;
        let pos = best_condensed_candidate(self.db, products, t, multipliers, skip)?;
        let species = products.condensed.get(pos)?.species;
        debug!(species = self.db.species(species).name(), "condensed species included");
        products.condensed.include(pos).then_some(species)
    }

    fn reject_condensed(&self, state: &mut EquilibriumState, species: SpeciesId) {
        let Some(products) = state.products.as_mut() else {
            return;
        };
        if let Some(pos) = products.condensed.active_position(species) {
            products.condensed.exclude(pos);
            warn!(
                species = self.db.species(species).name(),
                "no solvable system with condensed species, set aside"
            );
        }
    }

    /// Project the converged mole numbers onto the element balance.
    ///
    /// Newton stops with a residual of the order of the composition
    /// tolerance, and trace species dropped below the floor in the last
    /// step take their element content with them. The correction
    /// `dn = N A^T y` with `(A N A^T) y = b0 - b` moves every present
    /// product in proportion to its moles; a rank-deficient block (one
    /// product carrying several elements in fixed ratio) is handled by
    /// the pseudo-inverse.
    fn balance_elements(&self, state: &mut EquilibriumState, b0: &[f64]) {
        let Some(products) = state.products.as_mut() else {
            return;
        };
        let ne = products.n_elements();
        let ng = products.n_gas();

        let residual = DVector::from_iterator(ne, (0..ne).map(|i| b0[i] - products.element_moles(self.db, i)));
        let scale = b0.iter().fold(0.0_f64, |m, b| m.max(b.abs()));
        if scale <= 0.0 || residual.amax() <= f64::EPSILON * scale {
            return;
        }

        // Element columns and moles of every active product, gas first.
        let columns: Vec<(Vec<f64>, f64)> = (0..ng)
            .map(|k| ((0..ne).map(|i| products.gas_coef(i, k)).collect(), products.gas_moles[k]))
            .chain(products.condensed.active().iter().map(|c| {
                (
                    (0..ne).map(|i| products.species_coef(self.db, i, c.species)).collect(),
                    c.moles,
                )
            }))
            .collect();

        let mut m = DMatrix::<f64>::zeros(ne, ne);
        for (a, w) in columns.iter().filter(|(_, w)| *w > 0.0) {
            for i in 0..ne {
                for j in 0..ne {
                    m[(i, j)] += a[i] * a[j] * w;
                }
            }
        }
        let eps = m.amax() * 1e-12;
        let y = match m.svd(true, true).solve(&residual, eps) {
            Ok(y) => y,
            Err(e) => {
                warn!(error = e, "element balance correction skipped");
                return;
            }
        };

        let factors: Vec<f64> = columns
            .iter()
            .map(|(a, w)| if *w > 0.0 { (0..ne).map(|i| a[i] * y[i]).sum() } else { 0.0 })
            .collect();
        if factors.iter().any(|f| !f.is_finite() || *f <= -1.0) {
            warn!("element balance correction would remove a product, skipped");
            return;
        }

        let itn = &mut state.itn;
        let mut sumn = 0.0;
        for k in 0..ng {
            let nj = products.gas_moles[k];
            if nj > 0.0 {
                let corrected = nj * (1.0 + factors[k]);
                products.gas_moles[k] = corrected;
                itn.ln_nj[k] = corrected.ln();
                sumn += corrected;
            }
        }
        for (c, f) in products.condensed.active_mut().iter_mut().zip(&factors[ng..]) {
            c.moles *= 1.0 + f;
        }
        itn.sumn = sumn;
        if sumn > 0.0 {
            itn.n = sumn;
            itn.ln_n = sumn.ln();
        }
        debug!(residual = residual.amax() / scale, "element balance corrected");
    }

    /// Give every gas species stuck at zero a small amount back.
    fn reinsert_gas(&self, state: &mut EquilibriumState) {
        let n0 = self.config.reinserted_moles;
        let Some(products) = state.products.as_mut() else {
            return;
        };
        let itn = &mut state.itn;
        let mut count = 0;
        for (k, nj) in products.gas_moles.iter_mut().enumerate() {
            if *nj == 0.0 {
                *nj = n0;
                itn.ln_nj[k] = n0.ln();
                count += 1;
            }
        }
        itn.sumn = products.gas_moles.iter().sum();
        warn!(count, "reinserted absent gas species");
    }
}

/// Inactive condensed candidate, valid at `t` and not in `skip`, with the most
/// negative `g0 - sum(pi_i a_i)`; `None` when no candidate would lower the Gibbs energy.
pub(crate) fn best_condensed_candidate(
    db: &SpeciesDatabase,
    products: &ProductSet,
    t: f64,
    multipliers: &[f64],
    skip: &[SpeciesId],
) -> Option<usize> {
    let mut best = None;
    let mut best_value = 0.0;
    for pos in products.condensed().inactive_positions() {
        let Some(entry) = products.condensed().get(pos) else {
            continue;
        };
        let sp = db.species(entry.species);
        if !sp.temperature_in_range(t) || skip.contains(&entry.species) {
            continue;
        }
        let pi: f64 = multipliers
            .iter()
            .enumerate()
            .map(|(i, pi)| pi * products.species_coef(db, i, entry.species))
            .sum();
        let value = sp.gibbs0(t) - pi;
        if value < best_value {
            best_value = value;
            best = Some(pos);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_core::units::{atm, k};
    use pp_thermo::{Element, Propellant};

    fn h2_o2(db: &SpeciesDatabase) -> Propellant {
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
        p.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
        p
    }

    #[test]
    fn list_products_is_idempotent() {
        let db = SpeciesDatabase::standard();
        let eq = Equilibrium::new(&db);
        let mut state = EquilibriumState::new(h2_o2(&db));
        eq.list_products(&mut state).unwrap();
        let first = state.products().cloned();
        eq.list_products(&mut state).unwrap();
        assert_eq!(state.products().cloned(), first);
    }

    #[test]
    fn tp_water_dominates() {
        let db = SpeciesDatabase::standard();
        let eq = Equilibrium::new(&db);
        let mut state = EquilibriumState::with_conditions(h2_o2(&db), k(3000.0), atm(68.0));
        let summary = eq.solve(&mut state, ProblemType::Tp).unwrap();

        assert!(!summary.cached);
        assert!(summary.derivatives_complete);
        assert!(state.is_equilibrated());
        assert!((state.temperature_k() - 3000.0).abs() < 1e-9);

        let water = db.find_species("H2O").unwrap();
        let fractions = state.mole_fractions();
        let (top, x) = fractions
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert_eq!(top, water);
        assert!(x > 0.5, "x(H2O) = {x}");
    }

    #[test]
    fn second_solve_is_cached() {
        let db = SpeciesDatabase::standard();
        let eq = Equilibrium::new(&db);
        let mut state = EquilibriumState::with_conditions(h2_o2(&db), k(3000.0), atm(68.0));
        eq.solve(&mut state, ProblemType::Tp).unwrap();
        let before = state.clone();
        let summary = eq.solve(&mut state, ProblemType::Tp).unwrap();
        assert!(summary.cached);
        assert_eq!(state, before);
    }

    #[test]
    fn sp_without_target_fails() {
        let db = SpeciesDatabase::standard();
        let eq = Equilibrium::new(&db);
        let mut state = EquilibriumState::with_conditions(h2_o2(&db), k(3000.0), atm(68.0));
        let err = eq.solve(&mut state, ProblemType::Sp).unwrap_err();
        assert_eq!(err, EquilibriumError::MissingTargetEntropy);
    }

    #[test]
    fn iteration_cap_is_enforced() {
        let db = SpeciesDatabase::standard();
        let cfg = EquilibriumConfig {
            max_iterations: 1,
            ..EquilibriumConfig::default()
        };
        let eq = Equilibrium::with_config(&db, cfg);
        let mut state = EquilibriumState::with_conditions(h2_o2(&db), k(3000.0), atm(68.0));
        let err = eq.solve(&mut state, ProblemType::Tp).unwrap_err();
        assert!(matches!(err, EquilibriumError::TooManyIterations { limit: 1, .. }));
        assert!(!state.is_equilibrated());
    }

    fn graphite_products(db: &SpeciesDatabase) -> ProductSet {
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("C(gr)").unwrap(), 1.0).unwrap();
        p.add_moles(db.find_propellant("O2").unwrap(), 0.25).unwrap();
        ProductSet::enumerate(db, &p).unwrap()
    }

    #[test]
    fn candidate_valid_at_upper_bound() {
        let db = SpeciesDatabase::standard();
        let products = graphite_products(&db);
        let graphite = db.find_species("C(gr)").unwrap();
        let t_high = db.species(graphite).t_max();

        // A large carbon multiplier makes the solid favourable.
        let c_index = products.elements().iter().position(|e| *e == Element::C).unwrap();
        let mut pi = vec![0.0; products.n_elements()];
        pi[c_index] = 50.0;

        let pos = best_condensed_candidate(&db, &products, t_high, &pi, &[]).unwrap();
        assert_eq!(products.condensed().get(pos).unwrap().species, graphite);
        assert!(best_condensed_candidate(&db, &products, t_high + 1e-6, &pi, &[]).is_none());
    }

    #[test]
    fn no_candidate_when_gibbs_rises() {
        let db = SpeciesDatabase::standard();
        let products = graphite_products(&db);
        let pi = vec![-50.0; products.n_elements()];
        assert!(best_condensed_candidate(&db, &products, 2000.0, &pi, &[]).is_none());
    }

    #[test]
    fn skipped_candidate_is_not_offered() {
        let db = SpeciesDatabase::standard();
        let products = graphite_products(&db);
        let graphite = db.find_species("C(gr)").unwrap();
        let c_index = products.elements().iter().position(|e| *e == Element::C).unwrap();
        let mut pi = vec![0.0; products.n_elements()];
        pi[c_index] = 50.0;

        let offered = best_condensed_candidate(&db, &products, 2000.0, &pi, &[graphite])
            .map(|pos| products.condensed().get(pos).unwrap().species);
        assert_ne!(offered, Some(graphite));
    }
}
