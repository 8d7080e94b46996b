//! The normalization pipeline: constant folding, implication removal,
//! negation normal form, distribution, and clause/cube extraction.
//!
//! The CNF pipeline is
//!
//! ```text
//! simplify_constants -> remove_implications -> to_nnf
//!     -> distribute_or_over_and -> extract_clauses -> drop tautologies
//! ```
//!
//! and the DNF pipeline is its dual. [`to_cnf`] / [`to_dnf`] rebuild a
//! clean formula from the extracted set, so the tautological clauses
//! (contradictory cubes) filtered along the way never reach the caller.

use log::debug;

use crate::clause::{Clause, ClauseSet, Cube, CubeSet};
use crate::error::LogicError;
use crate::formula::Formula;
use crate::types::Lit;

/// Folds ⊤ and ⊥ through every connective, bottom-up, and eliminates
/// double negation. The result either contains no constants or is itself a
/// constant.
pub fn simplify_constants(f: &Formula) -> Formula {
    let g = match f {
        Formula::Not(p) => Formula::not(simplify_constants(p)),
        Formula::And(p, q) => Formula::and(simplify_constants(p), simplify_constants(q)),
        Formula::Or(p, q) => Formula::or(simplify_constants(p), simplify_constants(q)),
        Formula::Imp(p, q) => Formula::imp(simplify_constants(p), simplify_constants(q)),
        Formula::Iff(p, q) => Formula::iff(simplify_constants(p), simplify_constants(q)),
        _ => f.clone(),
    };
    simplify_node(g)
}

/// One-level constant folding; children are assumed already simplified.
fn simplify_node(f: Formula) -> Formula {
    match f {
        Formula::Not(p) => match *p {
            Formula::Top => Formula::Bottom,
            Formula::Bottom => Formula::Top,
            Formula::Not(q) => *q,
            p => Formula::not(p),
        },
        Formula::And(p, q) => match (*p, *q) {
            (Formula::Bottom, _) | (_, Formula::Bottom) => Formula::Bottom,
            (Formula::Top, r) | (r, Formula::Top) => r,
            (p, q) => Formula::and(p, q),
        },
        Formula::Or(p, q) => match (*p, *q) {
            (Formula::Top, _) | (_, Formula::Top) => Formula::Top,
            (Formula::Bottom, r) | (r, Formula::Bottom) => r,
            (p, q) => Formula::or(p, q),
        },
        Formula::Imp(p, q) => match (*p, *q) {
            (Formula::Bottom, _) | (_, Formula::Top) => Formula::Top,
            (Formula::Top, r) => r,
            (r, Formula::Bottom) => simplify_node(Formula::not(r)),
            (p, q) => Formula::imp(p, q),
        },
        Formula::Iff(p, q) => match (*p, *q) {
            (Formula::Top, r) | (r, Formula::Top) => r,
            (Formula::Bottom, r) | (r, Formula::Bottom) => simplify_node(Formula::not(r)),
            (p, q) => Formula::iff(p, q),
        },
        _ => f,
    }
}

/// Rewrites `A -> B` to `~A | B` and `A <-> B` to `(~A | B) & (~B | A)`,
/// recursively.
pub fn remove_implications(f: &Formula) -> Formula {
    match f {
        Formula::Imp(p, q) => Formula::or(
            Formula::not(remove_implications(p)),
            remove_implications(q),
        ),
        Formula::Iff(p, q) => {
            let p = remove_implications(p);
            let q = remove_implications(q);
            Formula::and(
                Formula::or(Formula::not(p.clone()), q.clone()),
                Formula::or(Formula::not(q), p),
            )
        }
        Formula::Not(p) => Formula::not(remove_implications(p)),
        Formula::And(p, q) => {
            Formula::and(remove_implications(p), remove_implications(q))
        }
        Formula::Or(p, q) => Formula::or(remove_implications(p), remove_implications(q)),
        _ => f.clone(),
    }
}

/// Negation normal form: implications are removed first, then negation is
/// pushed to the leaves via De Morgan's laws and double-negation
/// elimination.
///
/// ```
/// use decide_rs::formula::Formula;
/// use decide_rs::normal::to_nnf;
///
/// let f = Formula::not(Formula::and(Formula::var("p"), Formula::var("q")));
/// assert_eq!(
///     to_nnf(&f),
///     Formula::or(
///         Formula::not(Formula::var("p")),
///         Formula::not(Formula::var("q")),
///     )
/// );
/// ```
pub fn to_nnf(f: &Formula) -> Formula {
    nnf(&remove_implications(f))
}

fn nnf(f: &Formula) -> Formula {
    match f {
        Formula::Not(p) => nnf_neg(p),
        Formula::And(p, q) => Formula::and(nnf(p), nnf(q)),
        Formula::Or(p, q) => Formula::or(nnf(p), nnf(q)),
        Formula::Imp(p, q) => Formula::or(nnf_neg(p), nnf(q)),
        Formula::Iff(p, q) => Formula::or(
            Formula::and(nnf(p), nnf(q)),
            Formula::and(nnf_neg(p), nnf_neg(q)),
        ),
        _ => f.clone(),
    }
}

/// NNF of the negation of `f`.
fn nnf_neg(f: &Formula) -> Formula {
    match f {
        Formula::Top => Formula::Bottom,
        Formula::Bottom => Formula::Top,
        Formula::Var(_) => Formula::not(f.clone()),
        // ~~A => A
        Formula::Not(p) => nnf(p),
        // ~(A & B) => ~A | ~B
        Formula::And(p, q) => Formula::or(nnf_neg(p), nnf_neg(q)),
        // ~(A | B) => ~A & ~B
        Formula::Or(p, q) => Formula::and(nnf_neg(p), nnf_neg(q)),
        // ~(A -> B) => A & ~B
        Formula::Imp(p, q) => Formula::and(nnf(p), nnf_neg(q)),
        // ~(A <-> B) => (A & ~B) | (~A & B)
        Formula::Iff(p, q) => Formula::or(
            Formula::and(nnf(p), nnf_neg(q)),
            Formula::and(nnf_neg(p), nnf(q)),
        ),
    }
}

/// Pushes disjunction inside conjunction until no `Or` nests an `And`
/// (the CNF direction of the distributive law). Expects NNF input.
pub fn distribute_or_over_and(f: &Formula) -> Formula {
    match f {
        Formula::And(p, q) => {
            Formula::and(distribute_or_over_and(p), distribute_or_over_and(q))
        }
        Formula::Or(p, q) => {
            dist_or(distribute_or_over_and(p), distribute_or_over_and(q))
        }
        _ => f.clone(),
    }
}

fn dist_or(p: Formula, q: Formula) -> Formula {
    match (p, q) {
        // (A & B) | C => (A | C) & (B | C)
        (Formula::And(p1, p2), q) => {
            Formula::and(dist_or(*p1, q.clone()), dist_or(*p2, q))
        }
        // A | (B & C) => (A | B) & (A | C)
        (p, Formula::And(q1, q2)) => {
            Formula::and(dist_or(p.clone(), *q1), dist_or(p, *q2))
        }
        (p, q) => Formula::or(p, q),
    }
}

/// Pushes conjunction inside disjunction until no `And` nests an `Or`
/// (the DNF direction). Expects NNF input.
pub fn distribute_and_over_or(f: &Formula) -> Formula {
    match f {
        Formula::Or(p, q) => {
            Formula::or(distribute_and_over_or(p), distribute_and_over_or(q))
        }
        Formula::And(p, q) => {
            dist_and(distribute_and_over_or(p), distribute_and_over_or(q))
        }
        _ => f.clone(),
    }
}

fn dist_and(p: Formula, q: Formula) -> Formula {
    match (p, q) {
        // (A | B) & C => (A & C) | (B & C)
        (Formula::Or(p1, p2), q) => {
            Formula::or(dist_and(*p1, q.clone()), dist_and(*p2, q))
        }
        // A & (B | C) => (A & B) | (A & C)
        (p, Formula::Or(q1, q2)) => {
            Formula::or(dist_and(p.clone(), *q1), dist_and(p, *q2))
        }
        (p, q) => Formula::and(p, q),
    }
}

/// Reads a clause set off a formula already in conjunctive normal form:
/// each top-level conjunct must be a disjunction chain of literals (an
/// atomic literal becomes a unit clause).
///
/// A shape outside CNF fails with [`LogicError::StructuralMismatch`] rather
/// than silently producing a wrong clause. `⊤` yields the empty set and
/// `⊥` the set containing the empty clause.
pub fn extract_clauses(f: &Formula) -> Result<ClauseSet, LogicError> {
    match f {
        Formula::Top => Ok(ClauseSet::new()),
        Formula::Bottom => Ok(ClauseSet::from([Clause::empty()])),
        _ => f.conjuncts().into_iter().map(clause_of).collect(),
    }
}

fn clause_of(f: &Formula) -> Result<Clause, LogicError> {
    f.disjuncts()
        .into_iter()
        .map(|part| {
            Lit::try_from(part).map_err(|_| LogicError::StructuralMismatch {
                expected: "conjunctive normal form",
                found: part.clone(),
            })
        })
        .collect()
}

/// Dual of [`extract_clauses`]: reads a cube set off a formula in
/// disjunctive normal form. `⊤` yields the set containing the empty cube
/// and `⊥` the empty set.
pub fn extract_cubes(f: &Formula) -> Result<CubeSet, LogicError> {
    match f {
        Formula::Top => Ok(CubeSet::from([Cube::empty()])),
        Formula::Bottom => Ok(CubeSet::new()),
        _ => f.disjuncts().into_iter().map(cube_of).collect(),
    }
}

fn cube_of(f: &Formula) -> Result<Cube, LogicError> {
    f.conjuncts()
        .into_iter()
        .map(|part| {
            Lit::try_from(part).map_err(|_| LogicError::StructuralMismatch {
                expected: "disjunctive normal form",
                found: part.clone(),
            })
        })
        .collect()
}

/// The full pipeline from an arbitrary formula to its clausal form, with
/// tautological clauses dropped.
///
/// ```
/// use decide_rs::formula::Formula;
/// use decide_rs::normal::to_clausal_form;
///
/// let f = Formula::imp(Formula::var("p"), Formula::var("q"));
/// let clauses = to_clausal_form(&f);
/// assert_eq!(clauses.len(), 1); // { (~p | q) }
///
/// // p | ~p is tautological: nothing is left to constrain
/// let taut = Formula::or(Formula::var("p"), Formula::not(Formula::var("p")));
/// assert!(to_clausal_form(&taut).is_empty());
/// ```
pub fn to_clausal_form(f: &Formula) -> ClauseSet {
    let simplified = simplify_constants(f);
    debug!("to_clausal_form: simplified = {}", simplified);
    let distributed = distribute_or_over_and(&to_nnf(&simplified));
    let clauses =
        extract_clauses(&distributed).expect("distribution yields conjunctive normal form");
    clauses
        .into_iter()
        .filter(|clause| {
            if clause.is_tautology() {
                debug!("dropping tautological clause {}", clause);
                false
            } else {
                true
            }
        })
        .collect()
}

/// Dual of [`to_clausal_form`]: an arbitrary formula to its cube form, with
/// contradictory cubes dropped.
pub fn to_cube_form(f: &Formula) -> CubeSet {
    let simplified = simplify_constants(f);
    debug!("to_cube_form: simplified = {}", simplified);
    let distributed = distribute_and_over_or(&to_nnf(&simplified));
    let cubes =
        extract_cubes(&distributed).expect("distribution yields disjunctive normal form");
    cubes
        .into_iter()
        .filter(|cube| {
            if cube.is_contradictory() {
                debug!("dropping contradictory cube {}", cube);
                false
            } else {
                true
            }
        })
        .collect()
}

/// Conjunctive normal form, rebuilt as a clean formula from the extracted
/// clause set.
///
/// ```
/// use decide_rs::formula::Formula;
/// use decide_rs::normal::to_cnf;
///
/// let f = Formula::or(
///     Formula::var("p"),
///     Formula::and(Formula::var("q"), Formula::var("r")),
/// );
/// assert_eq!(to_cnf(&f).to_string(), "(p | q) & (p | r)");
/// ```
pub fn to_cnf(f: &Formula) -> Formula {
    let clauses = to_clausal_form(f);
    if clauses.iter().any(Clause::is_empty) {
        return Formula::Bottom;
    }
    Formula::conj(clauses.iter().map(Clause::to_formula))
}

/// Disjunctive normal form, rebuilt as a clean formula from the extracted
/// cube set.
pub fn to_dnf(f: &Formula) -> Formula {
    let cubes = to_cube_form(f);
    if cubes.iter().any(Cube::is_empty) {
        return Formula::Top;
    }
    Formula::disj(cubes.iter().map(Cube::to_formula))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use crate::types::Var;
    use crate::valuation::Valuation;

    fn p() -> Formula {
        Formula::var("p")
    }
    fn q() -> Formula {
        Formula::var("q")
    }
    fn r() -> Formula {
        Formula::var("r")
    }

    /// Exhaustive truth-table equivalence over the union of both variable
    /// sets. Only usable on small formulas; the tests stay within 6
    /// variables.
    fn assert_equivalent(f: &Formula, g: &Formula) {
        let vars: Vec<Var> = f
            .variables()
            .union(&g.variables())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        assert!(vars.len() <= 6, "truth-table oracle limited to 6 variables");
        for bits in 0..(1u32 << vars.len()) {
            let valuation: Valuation = vars
                .iter()
                .enumerate()
                .map(|(i, var)| (var.clone(), bits & (1 << i) != 0))
                .collect();
            assert_eq!(
                f.eval(&valuation),
                g.eval(&valuation),
                "{} and {} differ under {}",
                f,
                g,
                valuation
            );
        }
    }

    #[test]
    fn test_simplify_constants() {
        let f = Formula::and(p(), Formula::Top);
        assert_eq!(simplify_constants(&f), p());

        let f = Formula::or(p(), Formula::Top);
        assert_eq!(simplify_constants(&f), Formula::Top);

        let f = Formula::imp(Formula::Bottom, p());
        assert_eq!(simplify_constants(&f), Formula::Top);

        let f = Formula::imp(p(), Formula::Bottom);
        assert_eq!(simplify_constants(&f), Formula::not(p()));

        let f = Formula::iff(Formula::not(Formula::Top), p());
        assert_eq!(simplify_constants(&f), Formula::not(p()));

        let f = Formula::not(Formula::not(p()));
        assert_eq!(simplify_constants(&f), p());

        // ~(⊥ | p) folds the constant away before negating
        let f = Formula::not(Formula::or(Formula::Bottom, p()));
        assert_eq!(simplify_constants(&f), Formula::not(p()));
    }

    #[test]
    fn test_remove_implications() {
        let f = Formula::imp(p(), q());
        assert_eq!(remove_implications(&f), Formula::or(Formula::not(p()), q()));

        let f = Formula::iff(p(), q());
        assert_eq!(
            remove_implications(&f),
            Formula::and(
                Formula::or(Formula::not(p()), q()),
                Formula::or(Formula::not(q()), p()),
            )
        );

        // nested occurrences are rewritten too
        let f = Formula::not(Formula::imp(p(), q()));
        assert_eq!(
            remove_implications(&f),
            Formula::not(Formula::or(Formula::not(p()), q()))
        );
    }

    fn is_nnf(f: &Formula) -> bool {
        match f {
            Formula::Top | Formula::Bottom | Formula::Var(_) => true,
            Formula::Not(p) => matches!(p.as_ref(), Formula::Var(_)),
            Formula::And(p, q) | Formula::Or(p, q) => is_nnf(p) && is_nnf(q),
            Formula::Imp(..) | Formula::Iff(..) => false,
        }
    }

    #[test]
    fn test_nnf_shape_and_equivalence() {
        let samples = [
            Formula::not(Formula::and(p(), q())),
            Formula::not(Formula::or(p(), Formula::not(q()))),
            Formula::not(Formula::imp(p(), q())),
            Formula::not(Formula::iff(p(), q())),
            Formula::not(Formula::not(Formula::not(p()))),
            Formula::imp(Formula::iff(p(), q()), Formula::and(r(), Formula::not(p()))),
        ];
        for f in &samples {
            let g = to_nnf(f);
            assert!(is_nnf(&g), "not in NNF: {}", g);
            assert_equivalent(f, &g);
        }
    }

    #[test]
    fn test_distribution() {
        let f = Formula::or(p(), Formula::and(q(), r()));
        let g = distribute_or_over_and(&f);
        assert_eq!(g.to_string(), "(p | q) & (p | r)");
        assert_equivalent(&f, &g);

        let f = Formula::and(p(), Formula::or(q(), r()));
        let g = distribute_and_over_or(&f);
        assert_eq!(g.to_string(), "p & q | p & r");
        assert_equivalent(&f, &g);
    }

    #[test]
    fn test_extract_clauses() {
        let cnf = Formula::and(
            Formula::or(p(), Formula::not(q())),
            r(),
        );
        let clauses = extract_clauses(&cnf).unwrap();
        assert_eq!(clauses.len(), 2);
        let unit: Clause = [Var::new("r").pos()].into_iter().collect();
        assert!(clauses.contains(&unit));

        // a lone literal is a unit clause
        let clauses = extract_clauses(&Formula::not(p())).unwrap();
        assert_eq!(clauses.len(), 1);

        assert!(extract_clauses(&Formula::Top).unwrap().is_empty());
        let bottom = extract_clauses(&Formula::Bottom).unwrap();
        assert_eq!(bottom, ClauseSet::from([Clause::empty()]));
    }

    #[test]
    fn test_extract_clauses_rejects_non_cnf() {
        // an Or over an And is not clausal
        let f = Formula::or(p(), Formula::and(q(), r()));
        let err = extract_clauses(&f).unwrap_err();
        assert!(matches!(
            err,
            LogicError::StructuralMismatch {
                expected: "conjunctive normal form",
                ..
            }
        ));

        // implications are not literals
        let f = Formula::and(p(), Formula::imp(q(), r()));
        assert!(extract_clauses(&f).is_err());
    }

    #[test]
    fn test_extract_cubes() {
        let dnf = Formula::or(Formula::and(p(), Formula::not(q())), r());
        let cubes = extract_cubes(&dnf).unwrap();
        assert_eq!(cubes.len(), 2);

        let f = Formula::and(p(), Formula::or(q(), r()));
        assert!(extract_cubes(&f).is_err());
    }

    #[test]
    fn test_cnf_dnf_equivalence() {
        let samples = [
            Formula::iff(p(), Formula::imp(q(), r())),
            Formula::not(Formula::and(Formula::or(p(), q()), Formula::not(r()))),
            Formula::imp(Formula::imp(p(), q()), Formula::imp(q(), p())),
            Formula::and(p(), Formula::not(p())),
            Formula::or(p(), Formula::not(p())),
            Formula::Top,
            Formula::Bottom,
        ];
        for f in &samples {
            let cnf = to_cnf(f);
            let dnf = to_dnf(f);
            assert_equivalent(f, &cnf);
            assert_equivalent(f, &dnf);
        }
    }

    #[test]
    fn test_cnf_idempotence() {
        let f = Formula::iff(p(), Formula::imp(q(), r()));
        let once = to_cnf(&f);
        let twice = to_cnf(&once);
        assert_equivalent(&once, &twice);
        // a second pass keeps the clausal content unchanged
        assert_eq!(to_clausal_form(&once), to_clausal_form(&twice));
    }

    #[test]
    fn test_tautology_filtering() {
        // (p | ~p) & q normalizes to just q
        let f = Formula::and(Formula::or(p(), Formula::not(p())), q());
        let clauses = to_clausal_form(&f);
        assert_eq!(clauses.len(), 1);
        assert_eq!(to_cnf(&f), q());

        // (p & ~p) | q normalizes to just q
        let f = Formula::or(Formula::and(p(), Formula::not(p())), q());
        assert_eq!(to_dnf(&f), q());
    }

    #[test]
    fn test_constant_results() {
        assert_eq!(to_cnf(&Formula::Top), Formula::Top);
        assert_eq!(to_cnf(&Formula::Bottom), Formula::Bottom);
        assert_eq!(to_dnf(&Formula::Top), Formula::Top);
        assert_eq!(to_dnf(&Formula::Bottom), Formula::Bottom);

        // every cube of p & ~p is contradictory, so the DNF collapses to ⊥;
        // the CNF keeps the two complementary unit clauses
        let contra = Formula::and(p(), Formula::not(p()));
        assert_eq!(to_dnf(&contra), Formula::Bottom);
        assert_eq!(to_clausal_form(&contra).len(), 2);

        // dually, every clause of p | ~p is tautological
        let taut = Formula::or(p(), Formula::not(p()));
        assert_eq!(to_cnf(&taut), Formula::Top);
        assert_eq!(to_cube_form(&taut).len(), 2);
    }
}
