//! The error taxonomy shared by the normalizer and the engines.
//!
//! Structural errors abort the specific call with a typed value; search-space
//! outcomes (a closed branch, an inapplicable resolution pair) are ordinary
//! control flow and never surface as panics.

use thiserror::Error;

use crate::formula::Formula;
use crate::types::Var;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LogicError {
    /// A literal was requested from a formula that is not an atom or a
    /// negated atom.
    #[error("not a literal: {0}")]
    MalformedLiteral(Formula),

    /// Clause or cube extraction was invoked on a formula that is not in the
    /// expected normal form.
    #[error("formula is not in {expected}: offending subformula {found}")]
    StructuralMismatch {
        expected: &'static str,
        found: Formula,
    },

    /// Resolution was attempted on two clauses with no complementary pair on
    /// the requested variable. A no-op signal, not a fatal condition: the
    /// engine checks it before consuming a resolvent.
    #[error("no complementary pair on {var}")]
    UnresolvablePair { var: Var },
}
