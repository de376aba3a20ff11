//! Elemental composition of a species or ingredient.

use crate::element::Element;
use crate::error::{ThermoError, ThermoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element/count pairs in order of first appearance, duplicates merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Formula {
    items: Vec<(Element, u32)>,
}

impl Formula {
    /// Build from explicit pairs. Zero counts are dropped, repeats are summed.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Element, u32)>,
    {
        let mut formula = Self::default();
        for (element, count) in pairs {
            formula.push(element, count);
        }
        formula
    }

    /// Parse a Hill-style formula such as `"H2O"`, `"C2H5OH"` or `"NH4ClO4"`.
    ///
    /// Symbols are an uppercase letter optionally followed by a lowercase
    /// letter. A missing count means one.
    pub fn parse(text: &str) -> ThermoResult<Self> {
        let invalid = |what| ThermoError::InvalidFormula {
            formula: text.to_string(),
            what,
        };

        let bytes = text.trim().as_bytes();
        if bytes.is_empty() {
            return Err(invalid("empty formula"));
        }

        let mut formula = Self::default();
        let mut i = 0;
        while i < bytes.len() {
            if !bytes[i].is_ascii_uppercase() {
                return Err(invalid("expected element symbol"));
            }
            let start = i;
            i += 1;
            if i < bytes.len() && bytes[i].is_ascii_lowercase() {
                i += 1;
            }
            let symbol = std::str::from_utf8(&bytes[start..i])
                .map_err(|_| invalid("non-ascii symbol"))?;
            let element = Element::from_symbol(symbol)?;

            let digits = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let count = if digits == i {
                1
            } else {
                std::str::from_utf8(&bytes[digits..i])
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok())
                    .ok_or_else(|| invalid("bad element count"))?
            };
            if count == 0 {
                return Err(invalid("zero element count"));
            }
            formula.push(element, count);
        }
        Ok(formula)
    }

    fn push(&mut self, element: Element, count: u32) {
        if count == 0 {
            return;
        }
        match self.items.iter_mut().find(|(e, _)| *e == element) {
            Some((_, c)) => *c += count,
            None => self.items.push((element, count)),
        }
    }

    /// Number of atoms of `element` per molecule (0 if absent).
    pub fn count(&self, element: Element) -> u32 {
        self.items
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.items.iter().map(|(e, _)| *e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when every element of this formula is in `set`.
    pub fn is_composed_of(&self, set: &[Element]) -> bool {
        self.elements().all(|e| set.contains(&e))
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        self.items
            .iter()
            .map(|(e, c)| e.molar_mass() * f64::from(*c))
            .sum()
    }

    /// Same elements with the same counts, regardless of order.
    pub fn same_composition(&self, other: &Formula) -> bool {
        self.len() == other.len() && self.iter().all(|(e, c)| other.count(e) == c)
    }
}

impl FromStr for Formula {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, count) in &self.items {
            if *count == 1 {
                write!(f, "{element}")?;
            } else {
                write!(f, "{element}{count}")?;
            }
        }
        Ok(())
    }
}
