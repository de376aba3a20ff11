//! pp-performance: rocket nozzle performance from an equilibrium chamber.
//!
//! Provides:
//! - Frozen and shifting isentropic expansion to throat and exit
//! - Exit conditions by pressure or by sub/supersonic area ratio
//! - Isp, C*, Cf, vacuum Isp and area per unit mass flow per station
//! - Warnings for refinement loops that stopped at their iteration cap

pub mod config;
pub mod error;
pub mod evaluator;
pub mod exit;
pub mod record;

pub use config::PerformanceConfig;
pub use error::{PerformanceError, PerformanceResult};
pub use evaluator::{NozzleStates, PerformanceEvaluator};
pub use exit::ExitCondition;
pub use record::{Mode, PerformanceSolution, PerformanceWarning, StationPerformance};
