//! Most general unifiers for first-order terms.
//!
//! Terms are built from atoms, arbitrary-precision numbers, variables and
//! compounds (see [`ast`]). [`unify`] computes the most general unifier of
//! two terms as a [`Substitution`], or reports why none exists.
//!
//! Variable classes are tracked with a union-find ([`disjoint_set`]);
//! bindings to non-variable terms hang off the class representative and are
//! occurs-checked before they are recorded, so cyclic terms are never built.
//! All of that state belongs to a single call.
//!
//! ```
//! use unify::{parser::parse, unify, ErrorKind, Term};
//!
//! let x = parse("X").unwrap();
//! let fx = Term::compound("f", vec![x.clone()]);
//! assert_eq!(unify(&x, &fx).unwrap_err().kind(), ErrorKind::OccursCheck);
//! ```

pub mod ast;
pub mod config;
pub mod disjoint_set;
pub mod error;
pub mod parser;
pub mod pool;
pub mod substitution;
pub mod unifier;

pub use ast::{Atom, Compound, Term, TermKind, Var};
pub use config::UnifierConfig;
pub use error::{ErrorKind, ParseError, UnifyError};
pub use substitution::Substitution;
pub use unifier::Unifier;

// Id of a variable within one unification session, assigned in the order
// the session first meets each variable.
pub type VarId = u32;

/// Most general unifier of `s` and `t`, computed with a fresh [`Unifier`].
pub fn unify(s: &Term, t: &Term) -> Result<Substitution, UnifyError> {
    Unifier::new().unify(s, t)
}
