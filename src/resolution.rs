//! The resolution refutation engine.
//!
//! The engine decides unsatisfiability of a clause set by deriving
//! resolvents until the empty clause appears (UNSAT) or no new,
//! non-redundant resolvent can be produced (SAT at saturation). Three
//! modes are available through [`Mode`]:
//!
//! - **Saturation**: every admissible pair, every shared opposite-polarity
//!   variable, until fixpoint.
//! - **Regular**: Davis–Putnam variable elimination along a total variable
//!   order.
//! - **Strategy**: saturation gated by a [`Strategy`] predicate, dispatched
//!   once per candidate pair.
//!
//! After every derivation round the working set is simplified: tautological
//! resolvents are discarded and the subsumption invariant is maintained —
//! no clause in the set is a superset of another, the smaller (more
//! general) clause always wins.
//!
//! Every derivation is recorded as a [`Step`], so an UNSAT verdict carries
//! the chain of `resolve` applications that produced the empty clause.

use std::collections::BTreeSet;

use log::debug;

use crate::clause::{vars_of, Clause, ClauseSet};
use crate::error::LogicError;
use crate::types::Var;

/// The resolvent of two clauses on `var`.
///
/// Requires `var` to occur with opposite polarity in the two clauses; the
/// result is the union of their remaining literals (set semantics
/// deduplicate). Otherwise [`LogicError::UnresolvablePair`] — a no-op
/// signal the engine checks before consuming a resolvent, not a fatal
/// condition.
///
/// ```
/// use decide_rs::clause::Clause;
/// use decide_rs::resolution::resolve;
/// use decide_rs::types::Var;
///
/// let p = Var::new("p");
/// let q = Var::new("q");
/// let c1: Clause = [p.pos(), q.pos()].into_iter().collect();
/// let c2 = Clause::unit(p.neg());
/// assert_eq!(resolve(&c1, &c2, &p).unwrap(), Clause::unit(q.pos()));
/// assert!(resolve(&c1, &c2, &q).is_err());
/// ```
pub fn resolve(c1: &Clause, c2: &Clause, var: &Var) -> Result<Clause, LogicError> {
    let pos = var.pos();
    let neg = var.neg();
    let (drop1, drop2) = if c1.contains(&pos) && c2.contains(&neg) {
        (pos, neg)
    } else if c1.contains(&neg) && c2.contains(&pos) {
        (neg, pos)
    } else {
        return Err(LogicError::UnresolvablePair { var: var.clone() });
    };
    Ok(c1.without(&drop1).union(&c2.without(&drop2)))
}

/// The variables on which two clauses can be resolved: shared, with
/// opposite polarity.
pub fn resolvable_on(c1: &Clause, c2: &Clause) -> BTreeSet<Var> {
    c1.iter()
        .filter(|lit| c2.contains(&lit.complement()))
        .map(|lit| lit.var().clone())
        .collect()
}

/// A clause-selection strategy, gating which pairs the engine attempts.
///
/// `Positive`, `Negative` and `Linear` preserve refutation-completeness for
/// the engine's intended inputs. `Unit` and `Input` are incomplete outside
/// Horn-clause inputs: their SAT verdict is not definitive in the general
/// case and callers must not rely on it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Strategy {
    /// Every pair is admissible.
    Unrestricted,
    /// One clause must consist of positive literals only.
    Positive,
    /// One clause must consist of negative literals only.
    Negative,
    /// One clause must be the most recently derived resolvent.
    Linear,
    /// One clause must be a unit clause.
    Unit,
    /// One clause must come from the original input set.
    Input,
}

/// What a strategy predicate gets to look at besides the pair itself.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    /// The original input set, as given to the engine.
    pub input: &'a ClauseSet,
    /// The most recently derived resolvent, if any.
    pub last_resolvent: Option<&'a Clause>,
}

impl Strategy {
    /// Whether the pair may be resolved under this strategy.
    pub fn admits(&self, c1: &Clause, c2: &Clause, ctx: &StrategyContext<'_>) -> bool {
        match self {
            Strategy::Unrestricted => true,
            Strategy::Positive => all_positive(c1) || all_positive(c2),
            Strategy::Negative => all_negative(c1) || all_negative(c2),
            // Before the first resolvent exists any pair may start the chain.
            Strategy::Linear => match ctx.last_resolvent {
                Some(last) => c1 == last || c2 == last,
                None => true,
            },
            Strategy::Unit => c1.is_unit() || c2.is_unit(),
            Strategy::Input => ctx.input.contains(c1) || ctx.input.contains(c2),
        }
    }
}

fn all_positive(clause: &Clause) -> bool {
    clause.iter().all(|lit| lit.is_positive())
}

fn all_negative(clause: &Clause) -> bool {
    clause.iter().all(|lit| lit.is_negative())
}

/// How the refutation search is driven.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Mode {
    /// Saturate: resolve every pair on every shared variable to fixpoint.
    Saturation,
    /// Ordered ("regular") resolution: eliminate variables along the given
    /// order, or along the sorted variable set of the input when `None`.
    Regular(Option<Vec<Var>>),
    /// Saturation restricted by a clause-selection strategy.
    Strategy(Strategy),
}

/// One recorded application of [`resolve`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Step {
    pub left: Clause,
    pub right: Clause,
    pub pivot: Var,
    pub resolvent: Clause,
}

/// The engine's verdict on a clause set.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Verdict {
    /// The empty clause was derived.
    Unsatisfiable,
    /// Saturation: no new, non-redundant resolvent can be produced.
    Satisfiable,
    /// The resolvent budget ran out before either outcome.
    Exhausted,
}

/// A refutation attempt: the verdict plus the derivation chain behind it.
///
/// On [`Verdict::Unsatisfiable`] the final step's resolvent is the empty
/// clause, and every step before it is a `resolve` application over
/// clauses of the input set or earlier resolvents.
#[derive(Debug, Clone)]
pub struct Refutation {
    pub verdict: Verdict,
    pub steps: Vec<Step>,
    /// Total resolvents generated, including discarded ones.
    pub resolvents_generated: usize,
}

/// An additive resource limit for pathological inputs. Unlimited by
/// default; outcomes for inputs that finish within the budget are
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    pub max_resolvents: Option<usize>,
}

impl Limits {
    fn exceeded_by(&self, generated: usize) -> bool {
        self.max_resolvents.is_some_and(|max| generated > max)
    }
}

/// Runs a refutation in the given mode; `true` means unsatisfiable (the
/// empty clause was derived).
///
/// ```
/// use decide_rs::formula::Formula;
/// use decide_rs::normal::to_clausal_form;
/// use decide_rs::resolution::{refute, Mode};
///
/// let p = Formula::var("p");
/// let contra = to_clausal_form(&(p.clone() & !p));
/// assert!(refute(&contra, &Mode::Saturation));
///
/// let sat = to_clausal_form(&(Formula::var("p") | Formula::var("q")));
/// assert!(!refute(&sat, &Mode::Saturation));
/// ```
pub fn refute(clauses: &ClauseSet, mode: &Mode) -> bool {
    refutation(clauses, mode).verdict == Verdict::Unsatisfiable
}

/// Like [`refute`], but returns the full [`Refutation`].
pub fn refutation(clauses: &ClauseSet, mode: &Mode) -> Refutation {
    refutation_with_limits(clauses, mode, Limits::default())
}

pub fn refutation_with_limits(clauses: &ClauseSet, mode: &Mode, limits: Limits) -> Refutation {
    match mode {
        Mode::Saturation => saturate(clauses, Strategy::Unrestricted, limits),
        Mode::Strategy(strategy) => saturate(clauses, *strategy, limits),
        Mode::Regular(order) => regular(clauses, order.clone(), limits),
    }
}

/// Tautology removal plus subsumption minimization: shortest clauses are
/// kept, supersets of a kept clause are dropped.
fn condense(clauses: impl IntoIterator<Item = Clause>) -> ClauseSet {
    let mut kept: Vec<Clause> = clauses
        .into_iter()
        .filter(|clause| !clause.is_tautology())
        .collect();
    kept.sort_by_key(Clause::len);
    let mut out = ClauseSet::new();
    for clause in kept {
        if !out.iter().any(|existing| existing.subsumes(&clause)) {
            out.insert(clause);
        }
    }
    out
}

fn saturate(input: &ClauseSet, strategy: Strategy, limits: Limits) -> Refutation {
    let mut steps = Vec::new();
    let mut generated = 0usize;

    let mut working = condense(input.iter().cloned());
    debug!(
        "saturate({:?}): {} input clauses, {} after condensing",
        strategy,
        input.len(),
        working.len()
    );
    if working.iter().any(Clause::is_empty) {
        debug!("input already contains the empty clause");
        return Refutation {
            verdict: Verdict::Unsatisfiable,
            steps,
            resolvents_generated: generated,
        };
    }

    let mut last: Option<Clause> = None;
    loop {
        let snapshot: Vec<Clause> = working.iter().cloned().collect();
        let mut derived = false;

        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                let (c1, c2) = (&snapshot[i], &snapshot[j]);
                let ctx = StrategyContext {
                    input,
                    last_resolvent: last.as_ref(),
                };
                if !strategy.admits(c1, c2, &ctx) {
                    continue;
                }
                for var in resolvable_on(c1, c2) {
                    let Ok(resolvent) = resolve(c1, c2, &var) else {
                        continue;
                    };
                    generated += 1;
                    if limits.exceeded_by(generated) {
                        debug!("resolvent budget exhausted after {}", generated);
                        return Refutation {
                            verdict: Verdict::Exhausted,
                            steps,
                            resolvents_generated: generated,
                        };
                    }
                    if resolvent.is_empty() {
                        debug!("derived the empty clause from {} and {}", c1, c2);
                        steps.push(Step {
                            left: c1.clone(),
                            right: c2.clone(),
                            pivot: var,
                            resolvent,
                        });
                        return Refutation {
                            verdict: Verdict::Unsatisfiable,
                            steps,
                            resolvents_generated: generated,
                        };
                    }
                    if resolvent.is_tautology() {
                        debug!("tautological resolvent {} dropped", resolvent);
                        continue;
                    }
                    if working.iter().any(|existing| existing.subsumes(&resolvent)) {
                        continue;
                    }
                    debug!("{} x {} on {} => {}", c1, c2, var, resolvent);
                    let superseded: Vec<Clause> = working
                        .iter()
                        .filter(|existing| resolvent.subsumes(existing))
                        .cloned()
                        .collect();
                    for clause in superseded {
                        debug!("{} subsumed by {}, dropped", clause, resolvent);
                        working.remove(&clause);
                    }
                    steps.push(Step {
                        left: c1.clone(),
                        right: c2.clone(),
                        pivot: var.clone(),
                        resolvent: resolvent.clone(),
                    });
                    working.insert(resolvent.clone());
                    last = Some(resolvent);
                    derived = true;
                }
            }
        }

        if !derived {
            // A stalled linear chain restarts once from scratch before the
            // set counts as saturated.
            if strategy == Strategy::Linear && last.is_some() {
                debug!("linear chain stalled, restarting");
                last = None;
                continue;
            }
            debug!("saturated after {} resolvents => SAT", generated);
            return Refutation {
                verdict: Verdict::Satisfiable,
                steps,
                resolvents_generated: generated,
            };
        }
    }
}

/// Ordered ("regular") resolution: per variable, the clauses mentioning it
/// are replaced by their resolvents on that variable, union the clauses
/// that do not mention it.
fn regular(input: &ClauseSet, order: Option<Vec<Var>>, limits: Limits) -> Refutation {
    let mut order = order.unwrap_or_default();
    // Any variable the caller's order misses is still eliminated, after the
    // given prefix.
    let mentioned = vars_of(input);
    for var in &mentioned {
        if !order.contains(var) {
            order.push(var.clone());
        }
    }

    let mut steps = Vec::new();
    let mut generated = 0usize;

    let mut working = condense(input.iter().cloned());
    debug!("regular: order {:?}", order);
    if working.iter().any(Clause::is_empty) {
        return Refutation {
            verdict: Verdict::Unsatisfiable,
            steps,
            resolvents_generated: generated,
        };
    }

    for var in order {
        let (on_var, rest): (Vec<Clause>, Vec<Clause>) = working
            .iter()
            .cloned()
            .partition(|clause| clause.contains(&var.pos()) || clause.contains(&var.neg()));
        let positive: Vec<&Clause> = on_var
            .iter()
            .filter(|clause| clause.contains(&var.pos()))
            .collect();
        let negative: Vec<&Clause> = on_var
            .iter()
            .filter(|clause| clause.contains(&var.neg()))
            .collect();
        debug!(
            "eliminating {}: {} positive, {} negative, {} untouched",
            var,
            positive.len(),
            negative.len(),
            rest.len()
        );

        let mut next: Vec<Clause> = rest;
        for c1 in &positive {
            for c2 in &negative {
                let Ok(resolvent) = resolve(c1, c2, &var) else {
                    continue;
                };
                generated += 1;
                if limits.exceeded_by(generated) {
                    return Refutation {
                        verdict: Verdict::Exhausted,
                        steps,
                        resolvents_generated: generated,
                    };
                }
                steps.push(Step {
                    left: (*c1).clone(),
                    right: (*c2).clone(),
                    pivot: var.clone(),
                    resolvent: resolvent.clone(),
                });
                if resolvent.is_empty() {
                    debug!("derived the empty clause eliminating {}", var);
                    return Refutation {
                        verdict: Verdict::Unsatisfiable,
                        steps,
                        resolvents_generated: generated,
                    };
                }
                debug!("{} x {} on {} => {}", c1, c2, var, resolvent);
                next.push(resolvent);
            }
        }

        working = condense(next);
        if working.is_empty() {
            debug!("clause set emptied before the order ran out => SAT");
            return Refutation {
                verdict: Verdict::Satisfiable,
                steps,
                resolvents_generated: generated,
            };
        }
    }

    // Every ordered variable is eliminated; anything left is the empty
    // clause.
    let verdict = if working.iter().any(Clause::is_empty) {
        Verdict::Unsatisfiable
    } else {
        Verdict::Satisfiable
    };
    Refutation {
        verdict,
        steps,
        resolvents_generated: generated,
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    use crate::formula::Formula;
    use crate::normal::to_clausal_form;

    fn clauses(input: &[&[(&str, bool)]]) -> ClauseSet {
        input.iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|&(name, positive)| {
                        let var = Var::new(name);
                        if positive {
                            var.pos()
                        } else {
                            var.neg()
                        }
                    })
                    .collect::<Clause>()
            })
            .collect()
    }

    fn unsat_chain() -> ClauseSet {
        clauses(&[
            &[("p", true), ("q", true)],
            &[("p", false), ("r", true)],
            &[("q", false), ("r", true)],
            &[("r", false)],
        ])
    }

    #[test]
    fn test_resolve() {
        let c1 = clauses(&[&[("p", true), ("q", true)]])
            .into_iter()
            .next()
            .unwrap();
        let c2 = Clause::unit(Var::new("p").neg());

        let resolvent = resolve(&c1, &c2, &Var::new("p")).unwrap();
        assert_eq!(resolvent, Clause::unit(Var::new("q").pos()));

        // symmetric in the argument order
        let resolvent = resolve(&c2, &c1, &Var::new("p")).unwrap();
        assert_eq!(resolvent, Clause::unit(Var::new("q").pos()));

        let err = resolve(&c1, &c2, &Var::new("q")).unwrap_err();
        assert_eq!(
            err,
            LogicError::UnresolvablePair {
                var: Var::new("q")
            }
        );
    }

    #[test]
    fn test_resolve_deduplicates() {
        // (p | q) x (~p | q) => (q), not (q | q)
        let c1 = clauses(&[&[("p", true), ("q", true)]])
            .into_iter()
            .next()
            .unwrap();
        let c2 = clauses(&[&[("p", false), ("q", true)]])
            .into_iter()
            .next()
            .unwrap();
        let resolvent = resolve(&c1, &c2, &Var::new("p")).unwrap();
        assert_eq!(resolvent.len(), 1);
    }

    #[test]
    fn test_resolvable_on() {
        let c1 = clauses(&[&[("p", true), ("q", false), ("r", true)]])
            .into_iter()
            .next()
            .unwrap();
        let c2 = clauses(&[&[("p", false), ("q", true), ("r", true)]])
            .into_iter()
            .next()
            .unwrap();
        let vars: Vec<Var> = resolvable_on(&c1, &c2).into_iter().collect();
        assert_eq!(vars, vec![Var::new("p"), Var::new("q")]);
    }

    #[test]
    fn test_complementary_units() {
        // {p} and {~p} resolve to the empty clause
        let set = clauses(&[&[("p", true)], &[("p", false)]]);
        let refutation = refutation(&set, &Mode::Saturation);
        assert_eq!(refutation.verdict, Verdict::Unsatisfiable);
        assert_eq!(refutation.steps.len(), 1);
        let step = &refutation.steps[0];
        assert_eq!(step.pivot, Var::new("p"));
        assert!(step.resolvent.is_empty());
    }

    #[test]
    fn test_saturation_verdicts() {
        assert!(refute(&unsat_chain(), &Mode::Saturation));

        let sat = clauses(&[&[("p", true), ("q", true)], &[("p", false), ("q", true)]]);
        assert!(!refute(&sat, &Mode::Saturation));

        // empty set is vacuously satisfiable; {∅} is not
        assert!(!refute(&ClauseSet::new(), &Mode::Saturation));
        assert!(refute(
            &ClauseSet::from([Clause::empty()]),
            &Mode::Saturation
        ));
    }

    #[test]
    fn test_refutation_ends_in_empty_clause() {
        let refutation = refutation(&unsat_chain(), &Mode::Saturation);
        assert_eq!(refutation.verdict, Verdict::Unsatisfiable);
        let final_step = refutation.steps.last().expect("non-empty derivation");
        assert!(final_step.resolvent.is_empty());
        // every earlier step derives a genuine, non-tautological clause
        for step in &refutation.steps[..refutation.steps.len() - 1] {
            assert!(!step.resolvent.is_empty());
            assert!(!step.resolvent.is_tautology());
        }
    }

    #[test]
    fn test_regular_elimination_order() {
        // eliminating r, then p, then q derives ∅ on the last variable
        let order = vec![Var::new("r"), Var::new("p"), Var::new("q")];
        let refutation = refutation(&unsat_chain(), &Mode::Regular(Some(order)));
        assert_eq!(refutation.verdict, Verdict::Unsatisfiable);
        let final_step = refutation.steps.last().unwrap();
        assert!(final_step.resolvent.is_empty());
        assert_eq!(final_step.pivot, Var::new("q"));
    }

    #[test]
    fn test_regular_default_order() {
        assert!(refute(&unsat_chain(), &Mode::Regular(None)));

        let sat = clauses(&[&[("p", true), ("q", true)], &[("q", false), ("r", true)]]);
        assert!(!refute(&sat, &Mode::Regular(None)));
    }

    #[test]
    fn test_regular_partial_order_still_decides() {
        // the caller's order misses p and q; the engine appends them
        let order = vec![Var::new("r")];
        assert!(refute(&unsat_chain(), &Mode::Regular(Some(order))));
    }

    #[test]
    fn test_strategies_agree_on_refutable_input() {
        for strategy in [
            Strategy::Unrestricted,
            Strategy::Positive,
            Strategy::Negative,
            Strategy::Linear,
        ] {
            assert!(
                refute(&unsat_chain(), &Mode::Strategy(strategy)),
                "{:?} failed to refute",
                strategy
            );
        }
    }

    #[test]
    fn test_strategies_on_satisfiable_input() {
        let sat = clauses(&[&[("p", true), ("q", true)], &[("p", false), ("q", true)]]);
        for strategy in [
            Strategy::Unrestricted,
            Strategy::Positive,
            Strategy::Negative,
            Strategy::Linear,
        ] {
            assert!(
                !refute(&sat, &Mode::Strategy(strategy)),
                "{:?} refuted a satisfiable set",
                strategy
            );
        }
    }

    #[test]
    fn test_unit_and_input_on_horn_clauses() {
        // Horn: p, p -> q, q -> r, ~r
        let horn = clauses(&[
            &[("p", true)],
            &[("p", false), ("q", true)],
            &[("q", false), ("r", true)],
            &[("r", false)],
        ]);
        assert!(refute(&horn, &Mode::Strategy(Strategy::Unit)));
        assert!(refute(&horn, &Mode::Strategy(Strategy::Input)));
    }

    #[test]
    fn test_positive_admits() {
        let pos = clauses(&[&[("p", true), ("q", true)]])
            .into_iter()
            .next()
            .unwrap();
        let mixed = clauses(&[&[("p", false), ("q", true)]])
            .into_iter()
            .next()
            .unwrap();
        let input = ClauseSet::new();
        let ctx = StrategyContext {
            input: &input,
            last_resolvent: None,
        };
        assert!(Strategy::Positive.admits(&pos, &mixed, &ctx));
        assert!(!Strategy::Positive.admits(&mixed, &mixed, &ctx));
        assert!(Strategy::Negative.admits(&mixed, &Clause::unit(Var::new("r").neg()), &ctx));
    }

    #[test]
    fn test_subsumption_invariant() {
        // {p} subsumes {p | q}; only the unit survives condensing, and the
        // verdict is unchanged by the dropped clause
        let set = clauses(&[
            &[("p", true)],
            &[("p", true), ("q", true)],
            &[("p", false)],
        ]);
        assert!(refute(&set, &Mode::Saturation));

        let without_subsumed = clauses(&[&[("p", true)], &[("p", false)]]);
        assert!(refute(&without_subsumed, &Mode::Saturation));
    }

    #[test]
    fn test_tautologies_never_derived() {
        // (p | q) x (~p | ~q) produces only tautologies; the set saturates
        let set = clauses(&[
            &[("p", true), ("q", true)],
            &[("p", false), ("q", false)],
        ]);
        let refutation = refutation(&set, &Mode::Saturation);
        assert_eq!(refutation.verdict, Verdict::Satisfiable);
        assert!(refutation.steps.is_empty());
        assert!(refutation.resolvents_generated > 0);
    }

    #[test]
    fn test_limits() {
        let limits = Limits {
            max_resolvents: Some(1),
        };
        // needs more than one resolvent to refute
        let refutation = refutation_with_limits(&unsat_chain(), &Mode::Saturation, limits);
        assert_eq!(refutation.verdict, Verdict::Exhausted);

        // a budget large enough not to bite leaves the outcome unchanged
        let generous = Limits {
            max_resolvents: Some(10_000),
        };
        let refutation = refutation_with_limits(&unsat_chain(), &Mode::Saturation, generous);
        assert_eq!(refutation.verdict, Verdict::Unsatisfiable);
    }

    #[test]
    fn test_agrees_with_clausal_pipeline() {
        let p = Formula::var("p");
        let q = Formula::var("q");
        let contra = to_clausal_form(&Formula::and(
            Formula::iff(p.clone(), q.clone()),
            Formula::iff(p, Formula::not(q)),
        ));
        assert!(refute(&contra, &Mode::Saturation));
        assert!(refute(&contra, &Mode::Regular(None)));
    }
}
