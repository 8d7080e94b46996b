//! The semantic-tableau engine.
//!
//! A tableau is a proof tree built by exhaustively applying expansion
//! rules to a formula multiset. Non-branching (α) rules are applied to a
//! fixed point, then one branching (β) rule splits the node into two
//! children, each built recursively as a pure function result. A branch
//! containing a variable together with its negation is *closed*; an open
//! leaf whose members have all been reduced to literals is a model.
//!
//! Expansion rules:
//!
//! ```text
//! α:  A & B      ↪ A, B           β:  A | B      ↪ {A} | {B}
//!     ~(A | B)   ↪ ~A, ~B             ~(A & B)   ↪ {~A} | {~B}
//!     ~(A -> B)  ↪ A, ~B              A -> B     ↪ {~A} | {B}
//!     ~~A        ↪ A                  A <-> B    ↪ {A, B} | {~A, ~B}
//!                                     ~(A <-> B) ↪ {A, ~B} | {~A, B}
//! ```
//!
//! The whole tableau is closed iff its root is; a closed tableau of `f`
//! means `f` is unsatisfiable, and a closed tableau of `~f` means `f` is a
//! tautology.

use log::{debug, warn};

use crate::formula::Formula;
use crate::types::{Lit, Var};
use crate::valuation::Valuation;

use std::collections::VecDeque;
use std::fmt;

/// Why a branch closed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ClosedReason {
    /// The branch contains a variable and its negation.
    Complementary(Var),
    /// The branch contains ⊥ (or ~⊤).
    Falsum,
}

impl fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosedReason::Complementary(var) => write!(f, "{} and ~{}", var, var),
            ClosedReason::Falsum => write!(f, "⊥ in branch"),
        }
    }
}

/// One node of a tableau.
///
/// `formulas` holds the unexpanded (β) members left after α-saturation;
/// `literals` accumulates the branch's literals from the root down. A node
/// is closed iff it closed directly ([`TableauNode::reason`]) or both its
/// children are closed.
#[derive(Debug, Clone)]
pub struct TableauNode {
    formulas: Vec<Formula>,
    literals: Vec<Lit>,
    reason: Option<ClosedReason>,
    children: Option<Box<(TableauNode, TableauNode)>>,
}

impl TableauNode {
    /// The unexpanded members at this node.
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// The literals accumulated along the branch from the root.
    pub fn literals(&self) -> &[Lit] {
        &self.literals
    }

    /// The direct closure reason, if the branch closed at this node.
    pub fn reason(&self) -> Option<&ClosedReason> {
        self.reason.as_ref()
    }

    pub fn children(&self) -> Option<(&TableauNode, &TableauNode)> {
        self.children.as_ref().map(|pair| (&pair.0, &pair.1))
    }

    /// Closed directly, or through both children.
    pub fn is_closed(&self) -> bool {
        if self.reason.is_some() {
            return true;
        }
        match &self.children {
            Some(pair) => pair.0.is_closed() && pair.1.is_closed(),
            None => false,
        }
    }

    /// True for a leaf whose members all reduced to literals without a
    /// complementary pair.
    pub fn is_open_leaf(&self) -> bool {
        self.children.is_none() && self.reason.is_none()
    }

    /// The open leaves below (and including) this node.
    pub fn open_branches(&self) -> Vec<&TableauNode> {
        let mut out = Vec::new();
        self.collect_open(&mut out);
        out
    }

    fn collect_open<'a>(&'a self, out: &mut Vec<&'a TableauNode>) {
        if self.reason.is_some() {
            return;
        }
        match &self.children {
            Some(pair) => {
                pair.0.collect_open(out);
                pair.1.collect_open(out);
            }
            None => out.push(self),
        }
    }

    /// One partial model per open branch: the branch's accumulated
    /// literals, read as assignments.
    pub fn models(&self) -> Vec<Valuation> {
        self.open_branches()
            .into_iter()
            .map(|leaf| leaf.literals.iter().cloned().collect())
            .collect()
    }
}

/// Builds the tableau for the conjunction of `formulas`.
///
/// ```
/// use decide_rs::formula::Formula;
/// use decide_rs::tableau::build_tableau;
///
/// let p = Formula::var("p");
/// let root = build_tableau(&[p.clone() & !p]);
/// assert!(root.is_closed());
/// assert_eq!(root.reason().unwrap().to_string(), "p and ~p");
///
/// let root = build_tableau(&[Formula::var("p") | Formula::var("q")]);
/// assert!(!root.is_closed());
/// assert_eq!(root.open_branches().len(), 2);
/// ```
pub fn build_tableau(formulas: &[Formula]) -> TableauNode {
    expand(formulas.to_vec(), Vec::new())
}

fn expand(formulas: Vec<Formula>, mut literals: Vec<Lit>) -> TableauNode {
    // Processing a member takes at most 2·size(f) pops (the De Morgan
    // rules introduce fresh negations, so plain size does not decrease),
    // which bounds the loop; the budget only trips on a rewrite that
    // misbehaves.
    let mut budget: usize = 2 * formulas.iter().map(Formula::size).sum::<usize>() + 1;
    let mut queue: VecDeque<Formula> = formulas.into();
    let mut betas: Vec<Formula> = Vec::new();
    let mut reason: Option<ClosedReason> = None;

    while let Some(f) = queue.pop_front() {
        if budget == 0 {
            warn!("α-expansion exceeded its iteration bound; leaving {} unexpanded", f);
            betas.push(f);
            betas.extend(queue.drain(..));
            break;
        }
        budget -= 1;

        match f {
            Formula::Top => {
                debug!("⊤ discharged");
            }
            Formula::Bottom => {
                debug!("⊥ in branch => closed");
                reason = Some(ClosedReason::Falsum);
                break;
            }
            Formula::Var(v) => literals.push(v.pos()),
            Formula::Not(inner) => match *inner {
                Formula::Var(v) => literals.push(v.neg()),
                Formula::Top => {
                    debug!("~⊤ in branch => closed");
                    reason = Some(ClosedReason::Falsum);
                    break;
                }
                Formula::Bottom => {
                    debug!("~⊥ discharged");
                }
                // ~~A ↪ A
                Formula::Not(a) => queue.push_back(*a),
                // ~(A | B) ↪ ~A, ~B
                Formula::Or(a, b) => {
                    queue.push_back(Formula::Not(a));
                    queue.push_back(Formula::Not(b));
                }
                // ~(A -> B) ↪ A, ~B
                Formula::Imp(a, b) => {
                    queue.push_back(*a);
                    queue.push_back(Formula::Not(b));
                }
                // β-shaped: ~(A & B), ~(A <-> B)
                inner => betas.push(Formula::not(inner)),
            },
            // A & B ↪ A, B
            Formula::And(a, b) => {
                queue.push_back(*a);
                queue.push_back(*b);
            }
            // β-shaped: A | B, A -> B, A <-> B
            f => betas.push(f),
        }
    }

    // Closure check: a variable together with its negation along the branch.
    if reason.is_none() {
        reason = literals
            .iter()
            .find(|lit| {
                lit.is_positive() && literals.iter().any(|other| lit.is_complement_of(other))
            })
            .map(|lit| ClosedReason::Complementary(lit.var().clone()));
        if let Some(r) = &reason {
            debug!("branch closed: {}", r);
        }
    }

    if reason.is_some() {
        return TableauNode {
            formulas: betas,
            literals,
            reason,
            children: None,
        };
    }

    let Some(beta) = betas.first().cloned() else {
        // Every member reduced to a literal: an open branch, i.e. a model.
        debug!("open branch with literals {:?}", literals);
        return TableauNode {
            formulas: betas,
            literals,
            reason: None,
            children: None,
        };
    };

    let rest: Vec<Formula> = betas[1..].to_vec();
    let (left_add, right_add) = beta_children(&beta);
    debug!("β-expanding {} into {:?} | {:?}", beta, left_add, right_add);

    let mut left_formulas = rest.clone();
    left_formulas.extend(left_add);
    let mut right_formulas = rest;
    right_formulas.extend(right_add);

    let left = expand(left_formulas, literals.clone());
    let right = expand(right_formulas, literals.clone());

    TableauNode {
        formulas: betas,
        literals,
        reason: None,
        children: Some(Box::new((left, right))),
    }
}

/// The two successor multisets of a β-formula.
fn beta_children(f: &Formula) -> (Vec<Formula>, Vec<Formula>) {
    match f {
        // A | B ↪ {A} | {B}
        Formula::Or(a, b) => (vec![(**a).clone()], vec![(**b).clone()]),
        // A -> B ↪ {~A} | {B}
        Formula::Imp(a, b) => (
            vec![Formula::not((**a).clone())],
            vec![(**b).clone()],
        ),
        // A <-> B ↪ {A, B} | {~A, ~B}
        Formula::Iff(a, b) => (
            vec![(**a).clone(), (**b).clone()],
            vec![
                Formula::not((**a).clone()),
                Formula::not((**b).clone()),
            ],
        ),
        Formula::Not(inner) => match inner.as_ref() {
            // ~(A & B) ↪ {~A} | {~B}
            Formula::And(a, b) => (
                vec![Formula::not((**a).clone())],
                vec![Formula::not((**b).clone())],
            ),
            // ~(A <-> B) ↪ {A, ~B} | {~A, B}
            Formula::Iff(a, b) => (
                vec![(**a).clone(), Formula::not((**b).clone())],
                vec![Formula::not((**a).clone()), (**b).clone()],
            ),
            _ => unreachable!("α-saturation leaves only β-formulas: {}", f),
        },
        _ => unreachable!("α-saturation leaves only β-formulas: {}", f),
    }
}

/// A formula is satisfiable iff its tableau stays open.
pub fn satisfiable(f: &Formula) -> bool {
    !build_tableau(std::slice::from_ref(f)).is_closed()
}

/// A formula is a tautology iff the tableau of its negation closes.
pub fn tautology(f: &Formula) -> bool {
    build_tableau(&[Formula::not(f.clone())]).is_closed()
}

/// The models of `f` found by its tableau, one per open branch. Each is a
/// partial valuation; variables it leaves out are free.
pub fn models(f: &Formula) -> Vec<Valuation> {
    build_tableau(std::slice::from_ref(f)).models()
}

/// A disjunctive normal form read off the tableau of `f`: one cube of
/// branch literals per open branch. ⊥ when the tableau closes.
pub fn dnf_of(f: &Formula) -> Formula {
    let root = build_tableau(std::slice::from_ref(f));
    Formula::disj(root.open_branches().into_iter().map(|leaf| {
        Formula::conj(leaf.literals().iter().map(Lit::to_formula))
    }))
}

/// A conjunctive normal form read off the tableau of `~f`: each open
/// branch of the negation contributes the disjunction of its complemented
/// literals (De Morgan). ⊤ when that tableau closes.
pub fn cnf_of(f: &Formula) -> Formula {
    let root = build_tableau(&[Formula::not(f.clone())]);
    Formula::conj(root.open_branches().into_iter().map(|leaf| {
        Formula::disj(
            leaf.literals()
                .iter()
                .map(|lit| lit.complement().to_formula()),
        )
    }))
}
