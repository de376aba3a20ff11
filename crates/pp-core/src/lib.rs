//! pp-core: shared foundation for the propep workspace.
//!
//! Contains:
//! - units (uom SI types, constructors and physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for species and propellant ingredients)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{PpError, PpResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
