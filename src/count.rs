//! Exact model counting.
//!
//! Counts the satisfying assignments of a formula by recursive splitting
//! over its clausal form. Unit propagation is applied (a forced assignment
//! never changes the count), but pure-literal elimination is *not* — it is
//! sound for deciding satisfiability, not for counting. When the residual
//! clause set is satisfied, the remaining free variables contribute a
//! factor of `2^k`; counts are [`BigUint`]s since `2^n` quickly outgrows
//! machine integers.

use std::collections::BTreeSet;

use log::debug;
use num_bigint::BigUint;

use crate::clause::{vars_of, ClauseSet};
use crate::dpll::{apply_assignment, find_unit};
use crate::formula::Formula;
use crate::types::{Lit, Var};

/// The number of satisfying assignments of `f` over its own variable set.
///
/// ```
/// use num_bigint::BigUint;
/// use decide_rs::count::count_models;
/// use decide_rs::formula::Formula;
///
/// let p = Formula::var("p");
/// let q = Formula::var("q");
/// assert_eq!(count_models(&(p.clone() | q.clone())), BigUint::from(3u32));
/// assert_eq!(count_models(&(p.clone() & !p)), BigUint::ZERO);
/// assert_eq!(count_models(&Formula::Top), BigUint::from(1u32));
/// ```
pub fn count_models(f: &Formula) -> BigUint {
    count_models_n(f, f.variables().len())
}

/// The number of satisfying assignments of `f` over an ambient set of
/// `num_vars` variables: every variable beyond those of `f` doubles the
/// count.
///
/// # Panics
///
/// Panics if `num_vars` is smaller than the number of variables in `f`.
pub fn count_models_n(f: &Formula, num_vars: usize) -> BigUint {
    let vars = f.variables();
    assert!(
        num_vars >= vars.len(),
        "num_vars must cover the variables of the formula"
    );

    let clauses = crate::normal::to_clausal_form(f);
    // Normalization may eliminate variables (e.g. ones occurring only in
    // tautological clauses); they are free and credited afterwards.
    let constrained = vars_of(&clauses);
    let free = num_vars - constrained.len();
    debug!(
        "count_models: {} clauses over {} variables, {} free",
        clauses.len(),
        constrained.len(),
        free
    );
    count(&clauses, &constrained) << free
}

fn count(clauses: &ClauseSet, unassigned: &BTreeSet<Var>) -> BigUint {
    if clauses.iter().any(|clause| clause.is_empty()) {
        return BigUint::ZERO;
    }
    if clauses.is_empty() {
        // every remaining variable is free
        return BigUint::from(1u32) << unassigned.len();
    }

    if let Some(lit) = find_unit(clauses) {
        debug!("unit {} is forced", lit);
        let rest = apply_assignment(clauses, lit.var(), lit.polarity());
        let mut remaining = unassigned.clone();
        remaining.remove(lit.var());
        return count(&rest, &remaining);
    }

    let var = clauses
        .iter()
        .flat_map(|clause| clause.iter())
        .map(Lit::var)
        .min()
        .cloned()
        .expect("non-empty clauses have variables");
    debug!("splitting on {}", var);
    let mut remaining = unassigned.clone();
    remaining.remove(&var);
    count(&apply_assignment(clauses, &var, true), &remaining)
        + count(&apply_assignment(clauses, &var, false), &remaining)
}
