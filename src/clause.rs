//! Clauses, cubes and clause sets.
//!
//! A [`Clause`] is a *set* of literals read disjunctively; a [`Cube`] is the
//! conjunctive dual. Genuine set semantics (unordered, unique, structural
//! equality and hash) are load-bearing: subsumption and tautology checks
//! over an ordered sequence would be order-sensitive and wrong.
//!
//! Neither type is ever mutated in place by the engines; every operation
//! returns a new value.

use std::collections::BTreeSet;
use std::fmt;

use crate::formula::Formula;
use crate::types::{Lit, Var};

/// A working set of clauses.
///
/// The empty set is trivially satisfiable; a set containing the empty
/// clause is unsatisfiable. These two "empty" conditions are distinct and
/// must never be conflated.
pub type ClauseSet = BTreeSet<Clause>;

/// A set of cubes, as produced by DNF extraction.
pub type CubeSet = BTreeSet<Cube>;

/// A disjunction of literals.
///
/// The empty clause denotes ⊥ (a contradiction); a unit clause forces its
/// literal; a clause containing a literal and its complement is
/// tautological and semantically redundant.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Clause {
    literals: BTreeSet<Lit>,
}

impl Clause {
    /// The empty clause, ⊥.
    pub fn empty() -> Self {
        Clause::default()
    }

    /// A clause with a single literal.
    pub fn unit(lit: Lit) -> Self {
        Clause {
            literals: BTreeSet::from([lit]),
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, lit: &Lit) -> bool {
        self.literals.contains(lit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lit> {
        self.literals.iter()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// The forced literal of a unit clause, if this is one.
    pub fn unit_literal(&self) -> Option<&Lit> {
        if self.is_unit() {
            self.literals.iter().next()
        } else {
            None
        }
    }

    /// True iff the clause contains a literal together with its complement.
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .any(|lit| lit.is_positive() && self.literals.contains(&lit.complement()))
    }

    /// True iff every literal of `self` occurs in `other`.
    ///
    /// A subsuming clause is the more general one: `other` is then redundant
    /// in any clause set that also contains `self`.
    pub fn subsumes(&self, other: &Clause) -> bool {
        self.literals.is_subset(&other.literals)
    }

    /// A copy of the clause with `lit` removed (a no-op if absent).
    pub fn without(&self, lit: &Lit) -> Clause {
        let mut literals = self.literals.clone();
        literals.remove(lit);
        Clause { literals }
    }

    /// The set union of two clauses.
    pub fn union(&self, other: &Clause) -> Clause {
        Clause {
            literals: self.literals.union(&other.literals).cloned().collect(),
        }
    }

    pub fn variables(&self) -> BTreeSet<Var> {
        self.literals.iter().map(|lit| lit.var().clone()).collect()
    }

    /// The disjunction formula this clause denotes; ⊥ for the empty clause.
    pub fn to_formula(&self) -> Formula {
        Formula::disj(self.literals.iter().map(Lit::to_formula))
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<I: IntoIterator<Item = Lit>>(iter: I) -> Self {
        Clause {
            literals: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;
    type IntoIter = std::collections::btree_set::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

/// A conjunction of literals, the dual of [`Clause`].
///
/// The empty cube denotes ⊤; a cube containing complementary literals is
/// contradictory and discarded by the normalizer.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cube {
    literals: BTreeSet<Lit>,
}

impl Cube {
    /// The empty cube, ⊤.
    pub fn empty() -> Self {
        Cube::default()
    }

    pub fn unit(lit: Lit) -> Self {
        Cube {
            literals: BTreeSet::from([lit]),
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, lit: &Lit) -> bool {
        self.literals.contains(lit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lit> {
        self.literals.iter()
    }

    /// True iff the cube contains a literal together with its complement.
    pub fn is_contradictory(&self) -> bool {
        self.literals
            .iter()
            .any(|lit| lit.is_positive() && self.literals.contains(&lit.complement()))
    }

    pub fn variables(&self) -> BTreeSet<Var> {
        self.literals.iter().map(|lit| lit.var().clone()).collect()
    }

    /// The conjunction formula this cube denotes; ⊤ for the empty cube.
    pub fn to_formula(&self) -> Formula {
        Formula::conj(self.literals.iter().map(Lit::to_formula))
    }
}

impl FromIterator<Lit> for Cube {
    fn from_iter<I: IntoIterator<Item = Lit>>(iter: I) -> Self {
        Cube {
            literals: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cube {
    type Item = &'a Lit;
    type IntoIter = std::collections::btree_set::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " & ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

/// The set of variables occurring anywhere in a clause set.
pub fn vars_of(clauses: &ClauseSet) -> BTreeSet<Var> {
    clauses
        .iter()
        .flat_map(|clause| clause.iter().map(|lit| lit.var().clone()))
        .collect()
}
