//! Immutable species and ingredient tables.

use crate::data::{PROPELLANTS, SPECIES};
use crate::error::{ThermoError, ThermoResult};
use crate::formula::Formula;
use crate::propellant::PropellantSpecies;
use crate::species::{TemperatureInterval, ThermoSpecies};
use pp_core::{Id, PropellantId, SpeciesId};
use tracing::{debug, warn};

/// Product species and propellant ingredients, fixed after construction.
///
/// Solvers borrow the database; species and ingredients are addressed by
/// the ids it hands out.
#[derive(Debug, Clone, Default)]
pub struct SpeciesDatabase {
    species: Vec<ThermoSpecies>,
    propellants: Vec<PropellantSpecies>,
}

/// Incremental construction of a [`SpeciesDatabase`].
#[derive(Debug, Default)]
pub struct SpeciesDatabaseBuilder {
    db: SpeciesDatabase,
}

impl SpeciesDatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a product species. Names are unique (case-insensitive).
    pub fn add_species(&mut self, species: ThermoSpecies) -> ThermoResult<SpeciesId> {
        if self.db.find_species(species.name()).is_some() {
            return Err(ThermoError::Duplicate {
                name: species.name().to_string(),
            });
        }
        let id = Id::from_index(self.db.species.len() as u32);
        self.db.species.push(species);
        Ok(id)
    }

    /// Append a propellant ingredient. Names are unique (case-insensitive).
    pub fn add_propellant(&mut self, propellant: PropellantSpecies) -> ThermoResult<PropellantId> {
        if self.db.find_propellant(propellant.name()).is_some() {
            return Err(ThermoError::Duplicate {
                name: propellant.name().to_string(),
            });
        }
        let id = Id::from_index(self.db.propellants.len() as u32);
        self.db.propellants.push(propellant);
        Ok(id)
    }

    pub fn build(self) -> SpeciesDatabase {
        debug!(
            species = self.db.species.len(),
            propellants = self.db.propellants.len(),
            "species database built"
        );
        self.db
    }
}

impl SpeciesDatabase {
    /// Built-in H/O/C/N data set.
    pub fn standard() -> Self {
        let mut builder = SpeciesDatabaseBuilder::new();

        for rec in SPECIES {
            let intervals = rec
                .intervals
                .iter()
                .map(|(lo, hi, c)| TemperatureInterval::from_nasa7(*lo, *hi, *c))
                .collect();
            let added = Formula::parse(rec.formula)
                .and_then(|f| ThermoSpecies::new(rec.name, rec.phase, f, intervals))
                .and_then(|s| builder.add_species(s));
            if let Err(err) = added {
                warn!(name = rec.name, %err, "skipping built-in species");
            }
        }

        for rec in PROPELLANTS {
            let added = Formula::parse(rec.formula)
                .and_then(|f| PropellantSpecies::new(rec.name, f, rec.heat_of_formation, rec.density))
                .and_then(|p| builder.add_propellant(p));
            if let Err(err) = added {
                warn!(name = rec.name, %err, "skipping built-in propellant");
            }
        }

        builder.build()
    }

    /// Species by id. Panics if `id` was not issued by this database.
    pub fn species(&self, id: SpeciesId) -> &ThermoSpecies {
        &self.species[id.as_usize()]
    }

    pub fn get_species(&self, id: SpeciesId) -> Option<&ThermoSpecies> {
        self.species.get(id.as_usize())
    }

    /// Ingredient by id. Panics if `id` was not issued by this database.
    pub fn propellant(&self, id: PropellantId) -> &PropellantSpecies {
        &self.propellants[id.as_usize()]
    }

    pub fn get_propellant(&self, id: PropellantId) -> Option<&PropellantSpecies> {
        self.propellants.get(id.as_usize())
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn propellant_count(&self) -> usize {
        self.propellants.len()
    }

    /// Species ids in table order.
    pub fn species_ids(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        (0..self.species.len()).map(|i| Id::from_index(i as u32))
    }

    /// Ingredient ids in table order.
    pub fn propellant_ids(&self) -> impl Iterator<Item = PropellantId> + '_ {
        (0..self.propellants.len()).map(|i| Id::from_index(i as u32))
    }

    /// Case-insensitive exact name lookup.
    pub fn find_species(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|s| s.name().eq_ignore_ascii_case(name))
            .map(|i| Id::from_index(i as u32))
    }

    /// Case-insensitive exact name lookup.
    pub fn find_propellant(&self, name: &str) -> Option<PropellantId> {
        self.propellants
            .iter()
            .position(|p| p.name().eq_ignore_ascii_case(name))
            .map(|i| Id::from_index(i as u32))
    }

    /// Like [`find_species`](Self::find_species) but reports unknown names.
    pub fn require_species(&self, name: &str) -> ThermoResult<SpeciesId> {
        self.find_species(name).ok_or_else(|| ThermoError::UnknownSpecies {
            name: name.to_string(),
        })
    }

    /// Like [`find_propellant`](Self::find_propellant) but reports unknown names.
    pub fn require_propellant(&self, name: &str) -> ThermoResult<PropellantId> {
        self.find_propellant(name)
            .ok_or_else(|| ThermoError::UnknownPropellant {
                name: name.to_string(),
            })
    }

    /// Species whose name contains `query` (case-insensitive). Empty matches all.
    pub fn search_species(&self, query: &str) -> Vec<SpeciesId> {
        let query = query.trim().to_ascii_lowercase();
        self.species_ids()
            .filter(|id| self.species(*id).name().to_ascii_lowercase().contains(&query))
            .collect()
    }

    /// Ingredients whose name contains `query` (case-insensitive). Empty matches all.
    pub fn search_propellants(&self, query: &str) -> Vec<PropellantId> {
        let query = query.trim().to_ascii_lowercase();
        self.propellant_ids()
            .filter(|id| {
                self.propellant(*id)
                    .name()
                    .to_ascii_lowercase()
                    .contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Phase;

    #[test]
    fn standard_database_loads_everything() {
        let db = SpeciesDatabase::standard();
        assert_eq!(db.species_count(), SPECIES.len());
        assert_eq!(db.propellant_count(), PROPELLANTS.len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let db = SpeciesDatabase::standard();
        let a = db.find_species("h2o(l)").unwrap();
        let b = db.find_species("H2O(L)").unwrap();
        assert_eq!(a, b);
        assert_eq!(db.species(a).phase(), Phase::Condensed);
        assert!(db.find_species("XYZ").is_none());
        assert!(matches!(
            db.require_propellant("XYZ"),
            Err(ThermoError::UnknownPropellant { .. })
        ));
    }

    #[test]
    fn search_by_substring() {
        let db = SpeciesDatabase::standard();
        let names: Vec<_> = db
            .search_species("h2o")
            .into_iter()
            .map(|id| db.species(id).name().to_string())
            .collect();
        assert!(names.contains(&"H2O".to_string()));
        assert!(names.contains(&"H2O2".to_string()));
        assert!(names.contains(&"H2O(L)".to_string()));
        assert_eq!(db.search_species("").len(), db.species_count());
        assert!(!db.search_propellants("(l)").is_empty());
    }

    #[test]
    fn duplicates_rejected() {
        let mut builder = SpeciesDatabaseBuilder::new();
        let iv = TemperatureInterval::from_nasa7(200.0, 1000.0, [3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let make = |name| {
            ThermoSpecies::new(name, Phase::Gas, Formula::parse("N2").unwrap(), vec![iv]).unwrap()
        };
        builder.add_species(make("N2")).unwrap();
        assert!(matches!(
            builder.add_species(make("n2")),
            Err(ThermoError::Duplicate { .. })
        ));
    }
}
