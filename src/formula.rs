//! The propositional formula tree.
//!
//! [`Formula`] is a closed sum type over variables, the constants ⊤/⊥ and
//! the standard connectives. Trees are immutable and shared by structural
//! equality: two independently built formulas with the same shape compare
//! and hash equal. All transformations elsewhere in the crate return new
//! trees.
//!
//! Formulas can be assembled with the constructors or with the operator
//! DSL (`&`, `|`, `!`):
//!
//! ```
//! use decide_rs::formula::Formula;
//!
//! let p = Formula::var("p");
//! let q = Formula::var("q");
//! let f = p.clone() & (q.clone() | !p.clone());
//! assert_eq!(f, Formula::and(p.clone(), Formula::or(q, Formula::not(p))));
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::types::Var;
use crate::valuation::Valuation;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Formula {
    Top,
    Bottom,
    Var(Var),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Imp(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Var(Var::new(name))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    pub fn and(f: Formula, g: Formula) -> Self {
        Formula::And(Box::new(f), Box::new(g))
    }

    pub fn or(f: Formula, g: Formula) -> Self {
        Formula::Or(Box::new(f), Box::new(g))
    }

    pub fn imp(f: Formula, g: Formula) -> Self {
        Formula::Imp(Box::new(f), Box::new(g))
    }

    pub fn iff(f: Formula, g: Formula) -> Self {
        Formula::Iff(Box::new(f), Box::new(g))
    }

    /// The conjunction of all items; ⊤ for an empty sequence.
    pub fn conj(items: impl IntoIterator<Item = Formula>) -> Self {
        items
            .into_iter()
            .reduce(Formula::and)
            .unwrap_or(Formula::Top)
    }

    /// The disjunction of all items; ⊥ for an empty sequence.
    pub fn disj(items: impl IntoIterator<Item = Formula>) -> Self {
        items
            .into_iter()
            .reduce(Formula::or)
            .unwrap_or(Formula::Bottom)
    }

    /// Negation with double-negation collapse.
    ///
    /// Unlike [`Formula::not`], which always wraps, `negate` strips an
    /// outermost `Not` instead of stacking a second one.
    pub fn negate(&self) -> Formula {
        match self {
            Formula::Not(p) => (**p).clone(),
            _ => Formula::not(self.clone()),
        }
    }

    /// True iff the formula is an atom or a negated atom.
    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Var(_) => true,
            Formula::Not(p) => matches!(p.as_ref(), Formula::Var(_)),
            _ => false,
        }
    }

    /// The set of variables occurring in the formula.
    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<Var>) {
        match self {
            Formula::Top | Formula::Bottom => {}
            Formula::Var(v) => {
                vars.insert(v.clone());
            }
            Formula::Not(p) => p.collect_variables(vars),
            Formula::And(p, q)
            | Formula::Or(p, q)
            | Formula::Imp(p, q)
            | Formula::Iff(p, q) => {
                p.collect_variables(vars);
                q.collect_variables(vars);
            }
        }
    }

    /// The maximal top-level conjuncts: `(a & b) & c` yields `[a, b, c]`.
    /// A formula that is not a conjunction is its own single conjunct.
    pub fn conjuncts(&self) -> Vec<&Formula> {
        let mut out = Vec::new();
        self.collect_conjuncts(&mut out);
        out
    }

    fn collect_conjuncts<'a>(&'a self, out: &mut Vec<&'a Formula>) {
        match self {
            Formula::And(p, q) => {
                p.collect_conjuncts(out);
                q.collect_conjuncts(out);
            }
            _ => out.push(self),
        }
    }

    /// The maximal top-level disjuncts, dual to [`Formula::conjuncts`].
    pub fn disjuncts(&self) -> Vec<&Formula> {
        let mut out = Vec::new();
        self.collect_disjuncts(&mut out);
        out
    }

    fn collect_disjuncts<'a>(&'a self, out: &mut Vec<&'a Formula>) {
        match self {
            Formula::Or(p, q) => {
                p.collect_disjuncts(out);
                q.collect_disjuncts(out);
            }
            _ => out.push(self),
        }
    }

    /// The number of nodes in the tree (atoms and connectives).
    pub fn size(&self) -> usize {
        match self {
            Formula::Top | Formula::Bottom | Formula::Var(_) => 1,
            Formula::Not(p) => 1 + p.size(),
            Formula::And(p, q)
            | Formula::Or(p, q)
            | Formula::Imp(p, q)
            | Formula::Iff(p, q) => 1 + p.size() + q.size(),
        }
    }

    /// Evaluates the formula under the valuation.
    ///
    /// Variables the valuation leaves unassigned count as false, so a
    /// partial model can be checked directly.
    ///
    /// ```
    /// use decide_rs::formula::Formula;
    /// use decide_rs::types::Var;
    /// use decide_rs::valuation::Valuation;
    ///
    /// let f = Formula::or(Formula::var("p"), Formula::var("q"));
    /// let v: Valuation = [(Var::new("p"), true)].into_iter().collect();
    /// assert!(f.eval(&v));
    /// assert!(!f.eval(&Valuation::new()));
    /// ```
    pub fn eval(&self, valuation: &Valuation) -> bool {
        match self {
            Formula::Top => true,
            Formula::Bottom => false,
            Formula::Var(v) => valuation.truth(v),
            Formula::Not(p) => !p.eval(valuation),
            Formula::And(p, q) => p.eval(valuation) && q.eval(valuation),
            Formula::Or(p, q) => p.eval(valuation) || q.eval(valuation),
            Formula::Imp(p, q) => !p.eval(valuation) || q.eval(valuation),
            Formula::Iff(p, q) => p.eval(valuation) == q.eval(valuation),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Iff(..) => 1,
            Formula::Imp(..) => 2,
            Formula::Or(..) => 3,
            Formula::And(..) => 4,
            Formula::Not(..) => 5,
            Formula::Top | Formula::Bottom | Formula::Var(_) => 6,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < parent {
            write!(f, "(")?;
        }
        match self {
            Formula::Top => write!(f, "⊤")?,
            Formula::Bottom => write!(f, "⊥")?,
            Formula::Var(v) => write!(f, "{}", v)?,
            Formula::Not(p) => {
                write!(f, "~")?;
                p.fmt_prec(f, 5)?;
            }
            Formula::And(p, q) => {
                p.fmt_prec(f, prec)?;
                write!(f, " & ")?;
                q.fmt_prec(f, prec)?;
            }
            Formula::Or(p, q) => {
                p.fmt_prec(f, prec)?;
                write!(f, " | ")?;
                q.fmt_prec(f, prec)?;
            }
            Formula::Imp(p, q) => {
                // right-associative
                p.fmt_prec(f, prec + 1)?;
                write!(f, " -> ")?;
                q.fmt_prec(f, prec)?;
            }
            Formula::Iff(p, q) => {
                p.fmt_prec(f, prec + 1)?;
                write!(f, " <-> ")?;
                q.fmt_prec(f, prec)?;
            }
        }
        if prec < parent {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl std::ops::BitAnd for Formula {
    type Output = Formula;

    fn bitand(self, rhs: Self) -> Self::Output {
        Formula::And(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::BitOr for Formula {
    type Output = Formula;

    fn bitor(self, rhs: Self) -> Self::Output {
        Formula::Or(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Self::Output {
        Formula::Not(Box::new(self))
    }
}
