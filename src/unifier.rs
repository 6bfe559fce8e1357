use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::{
    ast::{Term, Var},
    config::UnifierConfig,
    disjoint_set::DisjointSet,
    error::UnifyError,
    pool::Pool,
    substitution::{Extractor, Substitution},
    VarId,
};

/// What a term looks like once variable bindings are taken into account.
enum Resolved {
    // class representative of an unbound variable
    Free(VarId),
    // never a variable
    Bound(Term),
}

/// Mutable state of one unification call.
///
/// Lives inside a [`Unifier`] and is cleared before and after every call,
/// so nothing learned while solving one problem leaks into the next.
#[derive(Debug, Default)]
pub(crate) struct Session {
    vars: Pool<Var, VarId>,           // session ids, in first-seen order
    classes: DisjointSet<VarId>,      // aliased variables
    bindings: HashMap<VarId, Term>,   // representative -> non-variable term
    canonical: HashMap<VarId, VarId>, // representative -> lowest id in class
}

impl Session {
    pub(crate) fn reset(&mut self) {
        self.vars.clear();
        self.classes.clear();
        self.bindings.clear();
        self.canonical.clear();
    }

    fn intern(&mut self, var: &Var) -> VarId {
        let id = self.vars.add_ref(var);
        self.canonical.entry(id).or_insert(id);
        id
    }

    pub(crate) fn var_count(&self) -> usize {
        self.vars.len()
    }

    pub(crate) fn var(&self, id: VarId) -> &Var {
        &self.vars[id]
    }

    /// Representative id of the class `var` belongs to.
    pub(crate) fn class_of(&mut self, var: &Var) -> VarId {
        let id = self.intern(var);
        self.classes.find(id)
    }

    pub(crate) fn binding(&self, rep: VarId) -> Option<&Term> {
        self.bindings.get(&rep)
    }

    /// The variable that stands for the whole class of `rep`.
    pub(crate) fn canonical_var(&self, rep: VarId) -> &Var {
        let id = self.canonical.get(&rep).copied().unwrap_or(rep);
        self.var(id)
    }

    fn resolve(&mut self, term: &Term) -> Resolved {
        match term {
            Term::Variable(v) => {
                let rep = self.class_of(v);
                match self.bindings.get(&rep) {
                    Some(bound) => Resolved::Bound(bound.clone()),
                    None => Resolved::Free(rep),
                }
            }
            _ => Resolved::Bound(term.clone()),
        }
    }

    /// Does the class `rep` occur in `term`, looking through bindings?
    fn occurs(&mut self, rep: VarId, term: &Term) -> bool {
        let mut stack = vec![term.clone()];
        // bound classes already expanded
        let mut expanded = HashSet::new();

        while let Some(term) = stack.pop() {
            match term {
                Term::Variable(v) => {
                    let class = self.class_of(&v);
                    if class == rep {
                        return true;
                    }
                    if expanded.insert(class) {
                        if let Some(bound) = self.bindings.get(&class) {
                            stack.push(bound.clone());
                        }
                    }
                }
                Term::Compound(c) => stack.extend(c.args().iter().cloned()),
                Term::Atom(_) | Term::Number(_) => {}
            }
        }

        false
    }

    fn bind(&mut self, rep: VarId, term: Term) {
        trace!(var = %self.canonical_var(rep), term = %term, "bind");
        self.bindings.insert(rep, term);
    }

    fn alias(&mut self, a: VarId, b: VarId) {
        let ca = self.canonical.get(&a).copied().unwrap_or(a);
        let cb = self.canonical.get(&b).copied().unwrap_or(b);
        let root = self.classes.union(a, b);
        self.canonical.remove(&a);
        self.canonical.remove(&b);
        self.canonical.insert(root, ca.min(cb));
        trace!(left = %self.var(ca), right = %self.var(cb), canonical = %self.canonical_var(root), "alias");
    }
}

/// Computes most general unifiers.
///
/// A `Unifier` can be reused for any number of sequential calls; every call
/// starts from an empty session.
///
/// ```
/// use unify::{parser::TermReader, Unifier};
///
/// let mut reader = TermReader::new();
/// let s = reader.read("f(X, b)").unwrap();
/// let t = reader.read("f(a, Y)").unwrap();
///
/// let mgu = Unifier::new().unify(&s, &t).unwrap();
/// assert_eq!(mgu.to_string(), "{X: a, Y: b}");
/// ```
#[derive(Debug, Default)]
pub struct Unifier {
    config: UnifierConfig,
    session: Session,
}

impl Unifier {
    pub fn new() -> Self {
        Self::with_config(UnifierConfig::default())
    }

    pub fn with_config(config: UnifierConfig) -> Self {
        Unifier {
            config,
            session: Session::default(),
        }
    }

    pub fn config(&self) -> &UnifierConfig {
        &self.config
    }

    /// Most general unifier of `s` and `t`.
    pub fn unify(&mut self, s: &Term, t: &Term) -> Result<Substitution, UnifyError> {
        self.unify_all([(s, t)])
    }

    /// Single most general unifier solving every equation at once.
    ///
    /// Equations are solved in order, each one left to right.
    pub fn unify_all<'a, I>(&mut self, equations: I) -> Result<Substitution, UnifyError>
    where
        I: IntoIterator<Item = (&'a Term, &'a Term)>,
    {
        let mut goals: Vec<(Term, Term)> = equations
            .into_iter()
            .map(|(s, t)| (s.clone(), t.clone()))
            .collect();
        // the goal stack pops from the back
        goals.reverse();

        debug!(equations = goals.len(), "unify");

        self.session.reset();
        let result = self
            .solve(goals)
            .map(|()| Extractor::new(&mut self.session).extract());
        self.session.reset();

        match &result {
            Ok(mgu) => debug!(bindings = mgu.len(), "unified"),
            Err(err) => debug!(error = %err, "unification failed"),
        }
        result
    }

    fn solve(&mut self, mut goals: Vec<(Term, Term)>) -> Result<(), UnifyError> {
        let limit = self.config.step_limit();
        let mut steps = 0usize;

        while let Some((s, t)) = goals.pop() {
            steps += 1;
            if let Some(limit) = limit {
                if steps > limit {
                    return Err(UnifyError::StepLimitExceeded(limit));
                }
            }

            let s = self.session.resolve(&s);
            let t = self.session.resolve(&t);

            match (s, t) {
                (Resolved::Free(a), Resolved::Free(b)) => {
                    if a != b {
                        self.session.alias(a, b);
                    }
                }
                (Resolved::Free(rep), Resolved::Bound(term))
                | (Resolved::Bound(term), Resolved::Free(rep)) => {
                    if self.session.occurs(rep, &term) {
                        let var = self.session.canonical_var(rep).clone();
                        trace!(var = %var, term = %term, "occurs check");
                        return Err(UnifyError::OccursCheck { var, term });
                    }
                    self.session.bind(rep, term);
                }
                (Resolved::Bound(s), Resolved::Bound(t)) => {
                    Self::decompose(s, t, &mut goals)?;
                }
            }
        }

        Ok(())
    }

    /// Compare two non-variable terms, pushing argument pairs of matching
    /// compounds onto `goals`.
    fn decompose(s: Term, t: Term, goals: &mut Vec<(Term, Term)>) -> Result<(), UnifyError> {
        match (&s, &t) {
            (Term::Atom(a), Term::Atom(b)) if a == b => Ok(()),
            (Term::Number(a), Term::Number(b)) if a == b => Ok(()),
            (Term::Atom(_) | Term::Number(_), Term::Atom(_) | Term::Number(_)) => {
                Err(UnifyError::ConstantMismatch { left: s, right: t })
            }
            (Term::Compound(f), Term::Compound(g)) => {
                if f.functor() != g.functor() {
                    return Err(UnifyError::FunctorMismatch {
                        left: f.functor().clone(),
                        right: g.functor().clone(),
                    });
                }
                if f.arity() != g.arity() {
                    return Err(UnifyError::ArityMismatch {
                        functor: f.functor().clone(),
                        left: f.arity(),
                        right: g.arity(),
                    });
                }
                // same argument list: nothing to learn
                if f.shares_args(g) {
                    return Ok(());
                }

                // post order so iter in reverse
                for (a, b) in f.args().iter().zip(g.args()).rev() {
                    goals.push((a.clone(), b.clone()));
                }
                Ok(())
            }
            _ => Err(UnifyError::KindMismatch { left: s, right: t }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::TermReader;

    fn read2(s: &str, t: &str) -> (TermReader, Term, Term) {
        let mut reader = TermReader::new();
        let s = reader.read(s).unwrap();
        let t = reader.read(t).unwrap();
        (reader, s, t)
    }

    #[test]
    fn binds_variables_on_both_sides() {
        let (r, s, t) = read2("f(X, b)", "f(a, Y)");
        let mgu = Unifier::new().unify(&s, &t).unwrap();
        assert_eq!(mgu.len(), 2);
        assert_eq!(mgu.get(r.var("X").unwrap()), Some(&Term::atom("a")));
        assert_eq!(mgu.get(r.var("Y").unwrap()), Some(&Term::atom("b")));
    }

    #[test]
    fn same_variable_needs_no_binding() {
        let x = Var::new("X");
        let mgu = Unifier::new().unify(&Term::var(&x), &Term::var(&x)).unwrap();
        assert!(mgu.is_empty());
    }

    #[test]
    fn aliasing_is_transitive() {
        let (r, s, t) = read2("f(X, Y)", "f(Y, a)");
        let mgu = Unifier::new().unify(&s, &t).unwrap();
        assert_eq!(mgu.get(r.var("X").unwrap()), Some(&Term::atom("a")));
        assert_eq!(mgu.get(r.var("Y").unwrap()), Some(&Term::atom("a")));
    }

    #[test]
    fn free_aliases_point_at_first_seen_variable() {
        let (r, s, t) = read2("f(X, Y, Z)", "f(Y, Z, X)");
        let mgu = Unifier::new().unify(&s, &t).unwrap();
        let x = r.var("X").unwrap();
        assert_eq!(mgu.len(), 2);
        assert!(!mgu.contains(x));
        assert_eq!(mgu.get(r.var("Y").unwrap()), Some(&Term::var(x)));
        assert_eq!(mgu.get(r.var("Z").unwrap()), Some(&Term::var(x)));
    }

    #[test]
    fn occurs_check_direct() {
        let (_, s, t) = read2("X", "f(X)");
        let err = Unifier::new().unify(&s, &t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OccursCheck);
    }

    #[test]
    fn occurs_check_through_aliases_and_bindings() {
        let (_, s, t) = read2("f(X, Y)", "f(Y, g(X))");
        let err = Unifier::new().unify(&s, &t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OccursCheck);

        let (_, s, t) = read2("f(X, Y, Y)", "f(g(Y), Z, X)");
        let err = Unifier::new().unify(&s, &t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OccursCheck);
    }

    #[test]
    fn mismatches_are_reported_by_kind() {
        let cases = [
            ("a", "b", ErrorKind::ConstantMismatch),
            ("1", "2", ErrorKind::ConstantMismatch),
            ("a", "1", ErrorKind::ConstantMismatch),
            ("f(X)", "g(X)", ErrorKind::FunctorMismatch),
            ("f(X)", "f(X, Y)", ErrorKind::ArityMismatch),
            ("a", "f(a)", ErrorKind::KindMismatch),
            ("f(1)", "7", ErrorKind::KindMismatch),
        ];
        for (s, t, kind) in cases {
            let (_, s, t) = read2(s, t);
            assert_eq!(Unifier::new().unify(&s, &t).unwrap_err().kind(), kind, "{} = {}", s, t);
        }
    }

    #[test]
    fn first_failure_wins() {
        let (_, s, t) = read2("f(a, g(X))", "f(b, h(X))");
        let err = Unifier::new().unify(&s, &t).unwrap_err();
        assert_eq!(
            err,
            UnifyError::ConstantMismatch {
                left: Term::atom("a"),
                right: Term::atom("b"),
            }
        );
    }

    #[test]
    fn errors_show_resolved_terms() {
        let (_, s, t) = read2("f(X, X)", "f(a, b)");
        let err = Unifier::new().unify(&s, &t).unwrap_err();
        assert_eq!(err.to_string(), "constant mismatch: a does not unify with b");
    }

    #[test]
    fn sessions_do_not_leak_between_calls() {
        let mut unifier = Unifier::new();
        let (r, s, t) = read2("X", "a");
        assert_eq!(unifier.unify(&s, &t).unwrap().len(), 1);

        // X was bound above; a fresh call must not remember it
        let x = Term::var(r.var("X").unwrap());
        let mgu = unifier.unify(&x, &Term::atom("b")).unwrap();
        assert_eq!(mgu.get(r.var("X").unwrap()), Some(&Term::atom("b")));
    }

    #[test]
    fn unify_all_solves_a_system() {
        let mut r = TermReader::new();
        let x = r.read("X").unwrap();
        let y = r.read("Y").unwrap();
        let a = r.read("a").unwrap();
        let mgu = Unifier::new().unify_all([(&x, &y), (&y, &a)]).unwrap();
        assert_eq!(mgu.get(r.var("X").unwrap()), Some(&a));
        assert_eq!(mgu.get(r.var("Y").unwrap()), Some(&a));
    }

    #[test]
    fn step_limit() {
        let (_, s, t) = read2("f(g(h(X)))", "f(g(h(a)))");
        let mut unifier = Unifier::with_config(UnifierConfig::default().with_max_steps(2));
        assert_eq!(
            unifier.unify(&s, &t).unwrap_err(),
            UnifyError::StepLimitExceeded(2)
        );

        let mut unifier = Unifier::with_config(UnifierConfig::default().with_max_steps(4));
        assert!(unifier.unify(&s, &t).is_ok());
    }

    #[test]
    fn shared_argument_lists_short_circuit() {
        let x = Var::new("X");
        let shared = Term::compound("g", vec![Term::var(&x)]);
        let s = Term::compound("f", vec![shared.clone(), Term::var(&x)]);
        let t = Term::compound("f", vec![shared, Term::atom("a")]);
        let mgu = Unifier::new().unify(&s, &t).unwrap();
        assert_eq!(mgu.apply(&s), mgu.apply(&t));
        assert_eq!(mgu.get(&x), Some(&Term::atom("a")));
    }
}
