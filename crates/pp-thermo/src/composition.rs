//! Propellant mixtures.

use crate::database::SpeciesDatabase;
use crate::element::Element;
use crate::error::{ThermoError, ThermoResult};
use pp_core::{PropellantId, ensure_positive};

/// Maximum number of ingredients in one mixture.
pub const MAX_COMPONENTS: usize = 20;

/// Ordered list of (ingredient, moles). Quantities are absolute moles;
/// the equilibrium engine normalizes them per gram of mixture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propellant {
    components: Vec<(PropellantId, f64)>,
}

impl Propellant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `moles` of an ingredient. Adding an ingredient twice sums the amounts.
    pub fn add_moles(&mut self, id: PropellantId, moles: f64) -> ThermoResult<()> {
        ensure_positive(moles, "propellant moles").map_err(|_| ThermoError::InvalidArg {
            what: "propellant amount must be positive and finite",
        })?;
        if let Some((_, m)) = self.components.iter_mut().find(|(c, _)| *c == id) {
            *m += moles;
            return Ok(());
        }
        if self.components.len() >= MAX_COMPONENTS {
            return Err(ThermoError::TooManyComponents {
                limit: MAX_COMPONENTS,
            });
        }
        self.components.push((id, moles));
        Ok(())
    }

    /// Add an ingredient by mass [g].
    pub fn add_grams(&mut self, db: &SpeciesDatabase, id: PropellantId, grams: f64) -> ThermoResult<()> {
        let molar_mass = db.propellant(id).molar_mass();
        self.add_moles(id, grams / molar_mass)
    }

    pub fn components(&self) -> &[(PropellantId, f64)] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Total mass [g].
    pub fn mass(&self, db: &SpeciesDatabase) -> f64 {
        self.components
            .iter()
            .map(|(id, n)| n * db.propellant(*id).molar_mass())
            .sum()
    }

    /// Enthalpy per unit mass [J/g].
    pub fn enthalpy(&self, db: &SpeciesDatabase) -> ThermoResult<f64> {
        let mass = self.checked_mass(db)?;
        let h: f64 = self
            .components
            .iter()
            .map(|(id, n)| n * db.propellant(*id).heat_of_formation())
            .sum();
        Ok(h / mass)
    }

    /// Distinct elements in order of first appearance.
    pub fn elements(&self, db: &SpeciesDatabase) -> Vec<Element> {
        let mut out = Vec::new();
        for (id, _) in &self.components {
            for e in db.propellant(*id).formula().elements() {
                if !out.contains(&e) {
                    out.push(e);
                }
            }
        }
        out
    }

    /// Moles of `element` per gram of mixture.
    pub fn element_moles_per_gram(&self, db: &SpeciesDatabase, element: Element) -> ThermoResult<f64> {
        let mass = self.checked_mass(db)?;
        let moles: f64 = self
            .components
            .iter()
            .map(|(id, n)| n * f64::from(db.propellant(*id).formula().count(element)))
            .sum();
        Ok(moles / mass)
    }

    /// Mass-weighted density [g/cm^3] (ideal volume mixing).
    pub fn density(&self, db: &SpeciesDatabase) -> ThermoResult<f64> {
        let mass = self.checked_mass(db)?;
        let mut volume = 0.0;
        for (id, n) in &self.components {
            let p = db.propellant(*id);
            if p.density() <= 0.0 {
                return Err(ThermoError::InvalidArg {
                    what: "ingredient without density",
                });
            }
            volume += n * p.molar_mass() / p.density();
        }
        Ok(mass / volume)
    }

    fn checked_mass(&self, db: &SpeciesDatabase) -> ThermoResult<f64> {
        let mass = self.mass(db);
        if self.components.is_empty() || mass <= 0.0 {
            return Err(ThermoError::EmptyPropellant);
        }
        Ok(mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SpeciesDatabaseBuilder;
    use crate::formula::Formula;
    use crate::propellant::PropellantSpecies;

    fn h2_o2(db: &SpeciesDatabase) -> Propellant {
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
        p.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
        p
    }

    #[test]
    fn element_order_follows_components() {
        let db = SpeciesDatabase::standard();
        let p = h2_o2(&db);
        assert_eq!(p.elements(&db), vec![Element::H, Element::O]);
    }

    #[test]
    fn element_moles_per_gram() {
        let db = SpeciesDatabase::standard();
        let p = h2_o2(&db);
        let mass = p.mass(&db);
        let b_h = p.element_moles_per_gram(&db, Element::H).unwrap();
        let b_o = p.element_moles_per_gram(&db, Element::O).unwrap();
        assert!((b_h * mass - 4.0).abs() < 1e-12);
        assert!((b_o * mass - 2.0).abs() < 1e-12);
        assert_eq!(p.element_moles_per_gram(&db, Element::C).unwrap(), 0.0);
    }

    #[test]
    fn repeated_add_sums() {
        let db = SpeciesDatabase::standard();
        let h2 = db.find_propellant("H2").unwrap();
        let mut p = Propellant::new();
        p.add_moles(h2, 1.0).unwrap();
        p.add_moles(h2, 0.5).unwrap();
        assert_eq!(p.components(), &[(h2, 1.5)]);
    }

    #[test]
    fn add_grams_converts_to_moles() {
        let db = SpeciesDatabase::standard();
        let o2 = db.find_propellant("O2").unwrap();
        let mut p = Propellant::new();
        p.add_grams(&db, o2, 31.9988).unwrap();
        assert!((p.components()[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn liquid_enthalpy_is_negative() {
        let db = SpeciesDatabase::standard();
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("H2(L)").unwrap(), 2.0).unwrap();
        p.add_moles(db.find_propellant("O2(L)").unwrap(), 1.0).unwrap();
        assert!(p.enthalpy(&db).unwrap() < 0.0);
        assert!(h2_o2(&db).enthalpy(&db).unwrap().abs() < 1e-12);
    }

    #[test]
    fn empty_and_invalid() {
        let db = SpeciesDatabase::standard();
        let p = Propellant::new();
        assert_eq!(p.enthalpy(&db), Err(ThermoError::EmptyPropellant));

        let mut p = Propellant::new();
        let h2 = db.find_propellant("H2").unwrap();
        assert!(p.add_moles(h2, 0.0).is_err());
        assert!(p.add_moles(h2, f64::NAN).is_err());
    }

    #[test]
    fn component_limit() {
        let mut builder = SpeciesDatabaseBuilder::new();
        for i in 0..=MAX_COMPONENTS {
            let species = PropellantSpecies::new(format!("P{i}"), Formula::parse("H2").unwrap(), 0.0, 1.0)
                .unwrap();
            builder.add_propellant(species).unwrap();
        }
        let db = builder.build();

        let mut p = Propellant::new();
        for id in db.propellant_ids().take(MAX_COMPONENTS) {
            p.add_moles(id, 1.0).unwrap();
        }
        let last = db.propellant_ids().last().unwrap();
        assert_eq!(
            p.add_moles(last, 1.0),
            Err(ThermoError::TooManyComponents {
                limit: MAX_COMPONENTS
            })
        );
    }
}
