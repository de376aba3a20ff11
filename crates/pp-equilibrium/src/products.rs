//! Candidate product enumeration.

use crate::candidates::CandidateSet;
use crate::error::{EquilibriumError, EquilibriumResult};
use nalgebra::DMatrix;
use pp_core::SpeciesId;
use pp_thermo::{Element, Phase, Propellant, SpeciesDatabase};
use tracing::debug;

/// Most distinct elements a propellant may contain.
pub const MAX_ELEMENTS: usize = 15;

/// Most candidate products (gas + condensed) one problem may carry.
pub const MAX_PRODUCTS: usize = 400;

/// Elements and candidate products of one equilibrium problem, plus
/// the current product mole numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSet {
    elements: Vec<Element>,
    gas: Vec<SpeciesId>,
    /// Element-by-gas-species stoichiometric coefficients.
    incidence: DMatrix<f64>,
    pub(crate) gas_moles: Vec<f64>,
    pub(crate) condensed: CandidateSet,
}

impl ProductSet {
    /// Enumerate every species built only from the propellant's elements,
    /// split by phase and kept in table order.
    pub fn enumerate(db: &SpeciesDatabase, propellant: &Propellant) -> EquilibriumResult<Self> {
        if propellant.is_empty() {
            return Err(EquilibriumError::EmptyPropellant);
        }

        let elements = propellant.elements(db);
        if elements.len() > MAX_ELEMENTS {
            return Err(EquilibriumError::TooManyElements {
                count: elements.len(),
                limit: MAX_ELEMENTS,
            });
        }

        let mut gas = Vec::new();
        let mut condensed = Vec::new();
        for id in db.species_ids() {
            let sp = db.species(id);
            if !sp.formula().is_composed_of(&elements) {
                continue;
            }
            match sp.phase() {
                Phase::Gas => gas.push(id),
                Phase::Condensed => condensed.push(id),
            }
            if gas.len() + condensed.len() > MAX_PRODUCTS {
                return Err(EquilibriumError::TooManyProducts {
                    limit: MAX_PRODUCTS,
                });
            }
        }

        let incidence = DMatrix::from_fn(elements.len(), gas.len(), |i, k| {
            f64::from(db.species(gas[k]).formula().count(elements[i]))
        });

        debug!(
            elements = elements.len(),
            gas = gas.len(),
            condensed = condensed.len(),
            "listed candidate products"
        );

        Ok(Self {
            elements,
            gas_moles: vec![0.0; gas.len()],
            gas,
            incidence,
            condensed: CandidateSet::new(condensed),
        })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn gas_species(&self) -> &[SpeciesId] {
        &self.gas
    }

    pub fn gas_moles(&self) -> &[f64] {
        &self.gas_moles
    }

    pub fn condensed(&self) -> &CandidateSet {
        &self.condensed
    }

    /// Coefficient of element `i` in gas species `k`.
    pub fn gas_coef(&self, i: usize, k: usize) -> f64 {
        self.incidence[(i, k)]
    }

    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn n_gas(&self) -> usize {
        self.gas.len()
    }

    /// Coefficient of element `i` in an arbitrary species.
    pub fn species_coef(&self, db: &SpeciesDatabase, i: usize, species: SpeciesId) -> f64 {
        f64::from(db.species(species).formula().count(self.elements[i]))
    }

    /// Moles of element `i` held by all active products (per gram of propellant).
    pub fn element_moles(&self, db: &SpeciesDatabase, i: usize) -> f64 {
        let gas: f64 = (0..self.gas.len())
            .map(|k| self.incidence[(i, k)] * self.gas_moles[k])
            .sum();
        let condensed: f64 = self
            .condensed
            .active()
            .iter()
            .map(|c| self.species_coef(db, i, c.species) * c.moles)
            .sum();
        gas + condensed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pp_thermo::{Formula, PropellantSpecies, SpeciesDatabaseBuilder, TemperatureInterval, ThermoSpecies};

    fn propellant(db: &SpeciesDatabase, names: &[&str]) -> Propellant {
        let mut p = Propellant::new();
        for name in names {
            p.add_moles(db.find_propellant(name).unwrap(), 1.0).unwrap();
        }
        p
    }

    fn names(db: &SpeciesDatabase, ids: impl IntoIterator<Item = SpeciesId>) -> Vec<String> {
        ids.into_iter().map(|id| db.species(id).name().to_string()).collect()
    }

    #[test]
    fn hydrogen_oxygen_products() {
        let db = SpeciesDatabase::standard();
        let set = ProductSet::enumerate(&db, &propellant(&db, &["H2", "O2"])).unwrap();

        assert_eq!(set.elements(), &[Element::H, Element::O]);
        assert_eq!(
            names(&db, set.gas_species().iter().copied()),
            vec!["H", "H2", "O", "O2", "OH", "H2O", "HO2", "H2O2"]
        );
        let condensed = names(&db, set.condensed().inactive().iter().map(|c| c.species));
        assert_eq!(condensed, vec!["H2O(L)"]);
        assert_eq!(set.condensed().active_len(), 0);
    }

    #[test]
    fn carbon_species_require_carbon() {
        let db = SpeciesDatabase::standard();
        let set = ProductSet::enumerate(&db, &propellant(&db, &["CH4", "O2"])).unwrap();
        let gas = names(&db, set.gas_species().iter().copied());
        assert!(gas.contains(&"CO2".to_string()));
        assert!(!gas.contains(&"NO".to_string()));

        let set = ProductSet::enumerate(&db, &propellant(&db, &["H2", "O2"])).unwrap();
        let gas = names(&db, set.gas_species().iter().copied());
        assert!(!gas.contains(&"CO".to_string()));
    }

    #[test]
    fn incidence_matches_formulas() {
        let db = SpeciesDatabase::standard();
        let set = ProductSet::enumerate(&db, &propellant(&db, &["H2", "O2"])).unwrap();
        let h2o = set
            .gas_species()
            .iter()
            .position(|id| db.species(*id).name() == "H2O")
            .unwrap();
        assert_eq!(set.gas_coef(0, h2o), 2.0);
        assert_eq!(set.gas_coef(1, h2o), 1.0);
    }

    #[test]
    fn empty_propellant_is_rejected() {
        let db = SpeciesDatabase::standard();
        assert!(matches!(
            ProductSet::enumerate(&db, &Propellant::new()),
            Err(EquilibriumError::EmptyPropellant)
        ));
    }

    #[test]
    fn too_many_elements() {
        let symbols = [
            "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
        ];
        let mut builder = SpeciesDatabaseBuilder::new();
        let mut ids = Vec::new();
        for s in symbols {
            let f = Formula::parse(s).unwrap();
            ids.push(builder.add_propellant(PropellantSpecies::new(s, f, 0.0, 1.0).unwrap()).unwrap());
        }
        let db = builder.build();
        let mut p = Propellant::new();
        for id in ids {
            p.add_moles(id, 1.0).unwrap();
        }
        assert!(matches!(
            ProductSet::enumerate(&db, &p),
            Err(EquilibriumError::TooManyElements { count: 16, limit: MAX_ELEMENTS })
        ));
    }

    #[test]
    fn too_many_products() {
        let mut builder = SpeciesDatabaseBuilder::new();
        let iv = TemperatureInterval::from_nasa7(200.0, 6000.0, [3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        for i in 0..=MAX_PRODUCTS {
            let sp = ThermoSpecies::new(format!("H2_{i}"), Phase::Gas, Formula::parse("H2").unwrap(), vec![iv])
                .unwrap();
            builder.add_species(sp).unwrap();
        }
        let h2 = builder
            .add_propellant(PropellantSpecies::new("H2", Formula::parse("H2").unwrap(), 0.0, 1.0).unwrap())
            .unwrap();
        let db = builder.build();
        let mut p = Propellant::new();
        p.add_moles(h2, 1.0).unwrap();
        assert!(matches!(
            ProductSet::enumerate(&db, &p),
            Err(EquilibriumError::TooManyProducts { .. })
        ));
    }
}
