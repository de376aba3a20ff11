//! Dense linear solve with singularity detection.
//!
//! LU factorization with partial pivoting (nalgebra). A pivot that is zero
//! relative to the matrix scale is reported as singular instead of
//! producing a meaningless solution.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("matrix is singular")]
pub struct Singular;

/// Solve `A x = b`.
pub fn solve(a: DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, Singular> {
    let n = a.nrows();
    if n == 0 || n != a.ncols() || n != b.len() {
        return Err(Singular);
    }

    let scale = a.amax();
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Singular);
    }
    let pivot_tol = scale * n as f64 * f64::EPSILON;

    let lu = a.lu();
    let u = lu.u();
    if (0..n).any(|i| u[(i, i)].abs() <= pivot_tol) {
        return Err(Singular);
    }

    let x = lu.solve(b).ok_or(Singular)?;
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(Singular)
    }
}
