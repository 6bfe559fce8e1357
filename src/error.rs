//! Error types for unification and term reading.

use thiserror::Error;

use crate::ast::{Atom, Term, Var};

/// Why two terms failed to unify.
///
/// Terms carried by a variant are the offending sub-terms as the engine saw
/// them after resolving variable bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    #[error("occurs check failed: {var} occurs in {term}")]
    OccursCheck { var: Var, term: Term },

    #[error("constant mismatch: {left} does not unify with {right}")]
    ConstantMismatch { left: Term, right: Term },

    #[error("functor mismatch: {left} vs {right}")]
    FunctorMismatch { left: Atom, right: Atom },

    #[error("arity mismatch for {functor}: {left} vs {right} arguments")]
    ArityMismatch {
        functor: Atom,
        left: usize,
        right: usize,
    },

    #[error("kind mismatch: {left} does not unify with {right}")]
    KindMismatch { left: Term, right: Term },

    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OccursCheck,
    ConstantMismatch,
    FunctorMismatch,
    ArityMismatch,
    KindMismatch,
    StepLimitExceeded,
}

impl UnifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnifyError::OccursCheck { .. } => ErrorKind::OccursCheck,
            UnifyError::ConstantMismatch { .. } => ErrorKind::ConstantMismatch,
            UnifyError::FunctorMismatch { .. } => ErrorKind::FunctorMismatch,
            UnifyError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            UnifyError::KindMismatch { .. } => ErrorKind::KindMismatch,
            UnifyError::StepLimitExceeded(_) => ErrorKind::StepLimitExceeded,
        }
    }
}

/// Errors from [`TermReader`](crate::parser::TermReader). Offsets are byte
/// offsets into the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("invalid number literal at offset {offset}")]
    InvalidNumber { offset: usize },
}
