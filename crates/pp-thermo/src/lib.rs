//! pp-thermo: thermochemical property model for propep.
//!
//! Provides:
//! - Element table (symbols and molar masses)
//! - Chemical formulas and their parser
//! - Product species records with piecewise polynomial property data
//! - Propellant ingredient records and propellant mixtures
//! - `SpeciesDatabase`, the immutable table every solver borrows
//!
//! # Property model
//!
//! Species data use the 9-coefficient polynomial form (7 heat capacity
//! coefficients plus two integration constants per temperature interval).
//! 7-coefficient records are accepted and mapped onto the same layout.
//! All property functions are dimensionless: `H/RT`, `S/R`, `Cp/R`, `G/RT`.
//!
//! # Example
//!
//! ```
//! use pp_thermo::{Propellant, SpeciesDatabase};
//!
//! let db = SpeciesDatabase::standard();
//! let h2o = db.find_species("H2O").unwrap();
//! let cp = db.species(h2o).specific_heat0(298.15);
//! assert!(cp > 3.5 && cp < 4.5);
//!
//! let mut prop = Propellant::new();
//! prop.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
//! prop.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
//! assert!((prop.mass(&db) - 36.03).abs() < 0.01);
//! ```

pub mod composition;
mod data;
pub mod database;
pub mod element;
pub mod error;
pub mod formula;
pub mod model;
pub mod propellant;
pub mod species;

pub use composition::{MAX_COMPONENTS, Propellant};
pub use database::{SpeciesDatabase, SpeciesDatabaseBuilder};
pub use element::Element;
pub use error::{ThermoError, ThermoResult};
pub use formula::Formula;
pub use model::{gas_entropy, gas_gibbs, standard_state_pressure_term};
pub use propellant::PropellantSpecies;
pub use species::{MAX_FORMULA_ELEMENTS, Phase, TemperatureInterval, ThermoSpecies};
