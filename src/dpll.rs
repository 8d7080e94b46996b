//! The DPLL satisfiability procedure.
//!
//! A recursive, depth-first search over a clause set with unit propagation
//! and pure-literal elimination. Every recursive call either shrinks the
//! clause set or assigns a previously-unassigned variable, so the search
//! terminates; recursion depth is bounded by the number of distinct
//! variables. Each invocation owns its clause set and valuation — nothing
//! is shared or mutated across calls.

use std::collections::BTreeMap;

use log::debug;

use crate::clause::ClauseSet;
use crate::formula::Formula;
use crate::normal::to_clausal_form;
use crate::types::{Lit, Var};
use crate::valuation::Valuation;

/// The single core rewrite of the search: applies `var := value` to a
/// clause set.
///
/// Clauses containing the satisfied literal are removed; the complementary
/// literal is removed from the clauses that remain. A clause reduced to
/// empty stays in the set, where the search detects it as a refuted branch.
pub fn apply_assignment(clauses: &ClauseSet, var: &Var, value: bool) -> ClauseSet {
    let satisfied = Lit::new(var.clone(), value);
    let falsified = satisfied.complement();
    clauses
        .iter()
        .filter(|clause| !clause.contains(&satisfied))
        .map(|clause| clause.without(&falsified))
        .collect()
}

/// The forced literal of the first unit clause, if any.
pub(crate) fn find_unit(clauses: &ClauseSet) -> Option<Lit> {
    clauses
        .iter()
        .find_map(|clause| clause.unit_literal().cloned())
}

/// A literal whose variable occurs with a single polarity across the whole
/// set, smallest variable first.
fn find_pure(clauses: &ClauseSet) -> Option<Lit> {
    let mut seen: BTreeMap<&Var, (bool, bool)> = BTreeMap::new();
    for clause in clauses {
        for lit in clause {
            let entry = seen.entry(lit.var()).or_insert((false, false));
            if lit.is_positive() {
                entry.0 = true;
            } else {
                entry.1 = true;
            }
        }
    }
    seen.into_iter()
        .find(|(_, (pos, neg))| pos != neg)
        .map(|(var, (pos, _))| Lit::new(var.clone(), pos))
}

/// Runs DPLL on a clause set; `Some(model)` on SAT, `None` on UNSAT.
///
/// The empty set is satisfiable by the empty valuation; a set containing
/// the empty clause is unsatisfiable outright.
///
/// ```
/// use decide_rs::dpll::solve;
/// use decide_rs::clause::{Clause, ClauseSet};
///
/// assert!(solve(&ClauseSet::new()).is_some());
/// assert!(solve(&ClauseSet::from([Clause::empty()])).is_none());
/// ```
pub fn solve(clauses: &ClauseSet) -> Option<Valuation> {
    dpll(clauses.clone(), Valuation::new())
}

fn dpll(clauses: ClauseSet, valuation: Valuation) -> Option<Valuation> {
    if clauses.is_empty() {
        debug!("clause set exhausted => SAT under {}", valuation);
        return Some(valuation);
    }
    if clauses.iter().any(|clause| clause.is_empty()) {
        debug!("empty clause reached => refuted branch");
        return None;
    }

    if let Some(lit) = find_unit(&clauses) {
        debug!("unit clause forces {}", lit);
        let next = apply_assignment(&clauses, lit.var(), lit.polarity());
        return dpll(next, valuation.with(lit.var().clone(), lit.polarity()));
    }

    if let Some(lit) = find_pure(&clauses) {
        debug!("pure literal {} satisfied outright", lit);
        let next = apply_assignment(&clauses, lit.var(), lit.polarity());
        return dpll(next, valuation.with(lit.var().clone(), lit.polarity()));
    }

    // Branch on the smallest variable of the set. Any deterministic pick
    // preserves the verdict; this one makes runs reproducible.
    let var = clauses
        .iter()
        .flat_map(|clause| clause.iter())
        .map(Lit::var)
        .min()
        .cloned()
        .expect("non-empty clauses have variables");
    for value in [true, false] {
        debug!("branching on {} = {}", var, value);
        let next = apply_assignment(&clauses, &var, value);
        if let Some(model) = dpll(next, valuation.clone().with(var.clone(), value)) {
            return Some(model);
        }
    }
    debug!("both branches on {} refuted", var);
    None
}

/// Satisfiability of a formula: converts to clausal form, then runs
/// [`solve`].
///
/// ```
/// use decide_rs::dpll::satisfiable;
/// use decide_rs::formula::Formula;
///
/// let p = Formula::var("p");
/// let model = satisfiable(&(p.clone() | Formula::var("q"))).unwrap();
/// assert!((p.clone() | Formula::var("q")).eval(&model));
/// assert!(satisfiable(&(p.clone() & !p)).is_none());
/// ```
pub fn satisfiable(f: &Formula) -> Option<Valuation> {
    solve(&to_clausal_form(f))
}

/// Logical consequence by refutation: Γ ⊨ φ iff Γ ∧ ¬φ is unsatisfiable.
///
/// ```
/// use decide_rs::dpll::is_consequence;
/// use decide_rs::formula::Formula;
///
/// // Modus Ponens
/// let premises = [
///     Formula::imp(Formula::var("p"), Formula::var("q")),
///     Formula::var("p"),
/// ];
/// assert!(is_consequence(&premises, &Formula::var("q")));
/// ```
pub fn is_consequence(premises: &[Formula], conclusion: &Formula) -> bool {
    let refutand = Formula::and(
        Formula::conj(premises.iter().cloned()),
        Formula::not(conclusion.clone()),
    );
    debug!("consequence check via refutand {}", refutand);
    satisfiable(&refutand).is_none()
}

/// A formula is a tautology iff its negation is unsatisfiable.
pub fn is_tautology(f: &Formula) -> bool {
    satisfiable(&Formula::not(f.clone())).is_none()
}

/// A formula is a contradiction iff it is unsatisfiable.
pub fn is_contradiction(f: &Formula) -> bool {
    satisfiable(f).is_none()
}

/// Two formulas are equivalent iff their biconditional is a tautology.
pub fn are_equivalent(f: &Formula, g: &Formula) -> bool {
    is_tautology(&Formula::iff(f.clone(), g.clone()))
}
