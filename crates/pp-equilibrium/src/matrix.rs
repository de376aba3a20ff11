//! Named partitions of the Newton system.
//!
//! Rows and columns are ordered: element multipliers, active condensed
//! species, total gas moles, and (fixed enthalpy/entropy only) temperature.

use crate::state::ProblemType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLayout {
    n_elements: usize,
    n_condensed: usize,
    with_temperature: bool,
}

impl MatrixLayout {
    pub fn new(n_elements: usize, n_condensed: usize, problem: ProblemType) -> Self {
        Self {
            n_elements,
            n_condensed,
            with_temperature: !problem.fixes_temperature(),
        }
    }

    /// Layout of the derivative system: no temperature row.
    pub fn without_temperature(n_elements: usize, n_condensed: usize) -> Self {
        Self {
            n_elements,
            n_condensed,
            with_temperature: false,
        }
    }

    pub fn size(&self) -> usize {
        self.n_elements + self.n_condensed + if self.with_temperature { 2 } else { 1 }
    }

    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    pub fn n_condensed(&self) -> usize {
        self.n_condensed
    }

    /// Row/column of the multiplier for element `i`.
    pub fn element(&self, i: usize) -> usize {
        i
    }

    /// Row/column of active condensed species `j`.
    pub fn condensed(&self, j: usize) -> usize {
        self.n_elements + j
    }

    /// Row/column of `dln n`.
    pub fn total_moles(&self) -> usize {
        self.n_elements + self.n_condensed
    }

    /// Row/column of `dln T`, when temperature is free.
    pub fn temperature(&self) -> Option<usize> {
        self.with_temperature
            .then_some(self.n_elements + self.n_condensed + 1)
    }
}
