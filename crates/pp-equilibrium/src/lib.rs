//! pp-equilibrium: chemical equilibrium of propellant combustion products.
//!
//! Contains:
//! - Candidate product enumeration from a propellant's elements
//! - Gibbs-minimization engine for fixed (T,P), (H,P) and (S,P) problems
//! - Equilibrium derivative properties (Cp, Cv, gamma, sound speed)
//! - Dense LU solve with singularity detection
//!
//! States are plain values owned by the caller; the engine borrows the
//! species database and mutates one state per call.

pub mod candidates;
pub mod config;
pub mod derivative;
pub mod equilibrium;
pub mod error;
pub mod linear;
pub mod matrix;
pub mod mixture;
pub mod products;
pub mod state;

pub use candidates::{CandidateSet, CondensedEntry};
pub use config::EquilibriumConfig;
pub use derivative::derive_properties;
pub use equilibrium::{Equilibrium, SolveSummary};
pub use error::{EquilibriumError, EquilibriumResult};
pub use linear::Singular;
pub use matrix::MatrixLayout;
pub use mixture::{frozen_properties, mixture_specific_heat0, product_enthalpy, product_entropy, product_entropy_at};
pub use products::{MAX_ELEMENTS, MAX_PRODUCTS, ProductSet};
pub use state::{EquilibriumState, ProblemType, ThermoProperties};
