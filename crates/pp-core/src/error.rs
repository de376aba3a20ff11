use thiserror::Error;

pub type PpResult<T> = Result<T, PpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Capacity exceeded: {what} (limit={limit})")]
    Capacity { what: &'static str, limit: usize },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
