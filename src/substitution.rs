//! Substitutions map variables to terms.
//!
//! A [`Substitution`] returned by the unifier is fully resolved: no term in
//! its range mentions a variable from its domain.

use std::fmt;

use hashbrown::HashMap;
use indexmap::IndexMap;
use tracing::trace;

use crate::{
    ast::{Atom, Compound, Term, Var},
    unifier::Session,
    VarId,
};

/// Mapping of variables to terms. Variables without an entry are free.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: IndexMap<Var, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &Var) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Term)> {
        self.bindings.iter()
    }

    pub fn domain(&self) -> impl Iterator<Item = &Var> {
        self.bindings.keys()
    }

    /// Replace every bound variable in `term` with its binding.
    ///
    /// This is a single pass; bindings are not themselves rewritten, which
    /// is all a resolved substitution needs.
    pub fn apply(&self, term: &Term) -> Term {
        if self.is_empty() {
            return term.clone();
        }
        term.replace_vars(|v| self.bindings.get(v).cloned())
    }

    pub(crate) fn insert(&mut self, var: Var, term: Term) {
        self.bindings.insert(var, term);
    }
}

impl FromIterator<(Var, Term)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (Var, Term)>>(iter: T) -> Self {
        Substitution {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Substitution {
    type Item = (&'a Var, &'a Term);
    type IntoIter = indexmap::map::Iter<'a, Var, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

impl Substitution {
    fn write(&self, f: &mut fmt::Formatter<'_>, debug: bool) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if debug {
                write!(f, "{:?}: {:?}", var, term)?;
            } else {
                write!(f, "{}: {}", var, term)?;
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, false)
    }
}

impl fmt::Debug for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, true)
    }
}

/// Turns the state of a successful session into its most general unifier.
pub(crate) struct Extractor<'s> {
    session: &'s mut Session,
    // class representative -> fully resolved term
    resolved: HashMap<VarId, Term>,
}

enum Step {
    Visit(Term),
    Build { functor: Atom, arity: usize },
    Remember(VarId),
}

impl<'s> Extractor<'s> {
    pub(crate) fn new(session: &'s mut Session) -> Self {
        Extractor {
            session,
            resolved: HashMap::new(),
        }
    }

    /// Every variable the session has seen, mapped to its fully resolved
    /// term. Variables that resolve to themselves are left out.
    pub(crate) fn extract(mut self) -> Substitution {
        let mut mgu = Substitution::new();

        // resolving can intern variables the session has not seen yet;
        // those are free singletons and resolve to themselves
        let mut id = 0;
        while id < self.session.var_count() {
            let var = self.session.var(id as VarId).clone();
            let term = self.resolve(&Term::Variable(var.clone()));
            if term.as_var() != Some(&var) {
                trace!(var = %var, term = %term, "resolved");
                mgu.insert(var, term);
            }
            id += 1;
        }

        mgu
    }

    /// Substitute bindings into `term` until only free canonical variables
    /// remain.
    fn resolve(&mut self, term: &Term) -> Term {
        let mut steps = vec![Step::Visit(term.clone())];
        let mut out: Vec<Term> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Term::Variable(v)) => {
                    let rep = self.session.class_of(&v);
                    if let Some(done) = self.resolved.get(&rep) {
                        out.push(done.clone());
                    } else if let Some(bound) = self.session.binding(rep) {
                        steps.push(Step::Remember(rep));
                        steps.push(Step::Visit(bound.clone()));
                    } else {
                        out.push(Term::Variable(self.session.canonical_var(rep).clone()));
                    }
                }
                Step::Visit(Term::Compound(c)) if c.arity() > 0 => {
                    steps.push(Step::Build {
                        functor: c.functor().clone(),
                        arity: c.arity(),
                    });
                    // post order so iter in reverse
                    steps.extend(c.args().iter().rev().cloned().map(Step::Visit));
                }
                Step::Visit(term) => out.push(term),
                Step::Build { functor, arity } => {
                    let args = out.split_off(out.len() - arity);
                    out.push(Term::Compound(Compound::new(functor, args)));
                }
                Step::Remember(rep) => {
                    if let Some(done) = out.last() {
                        self.resolved.insert(rep, done.clone());
                    }
                }
            }
        }

        out.pop().unwrap_or_else(|| term.clone())
    }
}
