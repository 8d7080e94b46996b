//! Partial boolean assignments.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Lit, Var};

/// A partial mapping from variables to truth values.
///
/// During search the engines keep unassigned variables *absent*, not
/// defaulted: [`Valuation::value`] answers `None` for them. Only formula
/// evaluation treats an absent variable as false (see
/// [`Valuation::truth`]), so a partial model can be read as one of its
/// total extensions.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Valuation {
    assignment: BTreeMap<Var, bool>,
}

impl Valuation {
    pub fn new() -> Self {
        Valuation::default()
    }

    /// The assigned value of `var`, or `None` if it is unassigned.
    pub fn value(&self, var: &Var) -> Option<bool> {
        self.assignment.get(var).copied()
    }

    /// The truth of `var` for evaluation purposes: unassigned means false.
    pub fn truth(&self, var: &Var) -> bool {
        self.value(var).unwrap_or(false)
    }

    pub fn is_assigned(&self, var: &Var) -> bool {
        self.assignment.contains_key(var)
    }

    /// Assigns `var` to `value`, overwriting any previous assignment.
    pub fn assign(&mut self, var: Var, value: bool) {
        self.assignment.insert(var, value);
    }

    /// Consuming variant of [`Valuation::assign`], for building extended
    /// valuations along a search branch.
    pub fn with(mut self, var: Var, value: bool) -> Self {
        self.assign(var, value);
        self
    }

    /// Extends the valuation so that `lit` holds.
    pub fn satisfy(&mut self, lit: &Lit) {
        self.assign(lit.var().clone(), lit.polarity());
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, bool)> {
        self.assignment.iter().map(|(var, &value)| (var, value))
    }
}

impl FromIterator<(Var, bool)> for Valuation {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Valuation {
            assignment: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Lit> for Valuation {
    fn from_iter<I: IntoIterator<Item = Lit>>(iter: I) -> Self {
        iter.into_iter()
            .map(|lit| (lit.var().clone(), lit.polarity()))
            .collect()
    }
}

impl fmt::Display for Valuation {
    /// Renders the assignment as a set of literals, e.g. `{p, ~q}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}{}", if value { "" } else { "~" }, var)?;
        }
        write!(f, "}}")
    }
}
