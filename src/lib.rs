//! # decide-rs: Propositional Decision Procedures in Rust
//!
//! **`decide-rs`** is a reference suite of decision procedures for classical
//! propositional logic: given formulas built from variables, constants and
//! the standard connectives, it decides satisfiability, finds satisfying
//! assignments, and supports the derived notions — logical consequence,
//! equivalence, tautology, and normal forms.
//!
//! ## What is in the box?
//!
//! Three independent engines share one clause/literal representation:
//!
//! - **DPLL** --- recursive satisfiability search with unit propagation and
//!   pure-literal elimination, over clause sets produced by the normalizer.
//! - **Resolution** --- refutation by deriving resolvents until the empty
//!   clause appears, with subsumption/tautology pruning, saturation and
//!   ordered variants, and pluggable clause-selection strategies.
//! - **Semantic tableaux** --- a proof tree grown by α/β expansion rules
//!   directly on formulas; closed tableaux refute, open branches are
//!   models.
//!
//! All three agree on every input; having them side by side is the point of
//! a reference suite. It is a pure in-process library: no I/O, no solver
//! binary, no incremental interface, and deliberately no CDCL — this is not
//! an industrial SAT solver.
//!
//! ## Quick Start
//!
//! ```rust
//! use decide_rs::dpll;
//! use decide_rs::formula::Formula;
//! use decide_rs::normal::to_clausal_form;
//! use decide_rs::resolution::{refute, Mode};
//! use decide_rs::tableau;
//!
//! // 1. Build a formula: f = (p -> q) & p & ~q
//! let p = Formula::var("p");
//! let q = Formula::var("q");
//! let f = Formula::imp(p.clone(), q.clone()) & p.clone() & !q.clone();
//!
//! // 2. All three engines agree that it is unsatisfiable
//! assert!(dpll::satisfiable(&f).is_none());
//! assert!(refute(&to_clausal_form(&f), &Mode::Saturation));
//! assert!(tableau::build_tableau(&[f]).is_closed());
//!
//! // 3. A satisfiable formula yields a checkable model
//! let g = Formula::imp(p.clone(), q.clone()) & p;
//! let model = dpll::satisfiable(&g).unwrap();
//! assert!(g.eval(&model));
//! ```
//!
//! ## Core Components
//!
//! - **[`formula`]**: the immutable [`Formula`][crate::formula::Formula]
//!   tree, shared by structural equality.
//! - **[`normal`]**: the normalization pipeline — NNF, CNF/DNF, clause and
//!   cube extraction.
//! - **[`dpll`]**, **[`resolution`]**, **[`tableau`]**: the engines.
//! - **[`count`]**: exact model counting over the clausal form.
//!
//! Everything an engine touches is owned by the invocation that created it;
//! calls from separate threads on separate formulas need no
//! synchronization.

pub mod clause;
pub mod count;
pub mod dpll;
pub mod error;
pub mod formula;
pub mod normal;
pub mod resolution;
pub mod tableau;
pub mod types;
pub mod valuation;
