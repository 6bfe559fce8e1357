use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashSet;
use num_bigint::BigInt;

// Source of variable identities. Never reset, so two variables created at
// different times can never compare equal.
static NEXT_VAR: AtomicU64 = AtomicU64::new(0);

/// Constant symbol, also used as the functor of compounds. Compares by
/// its text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Rc<str>);

impl Atom {
    pub fn new(text: &str) -> Self {
        Atom(Rc::from(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(text: &str) -> Self {
        Atom::new(text)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logic variable.
///
/// Identity is allocated when the variable is created; the name only
/// helps humans read terms. Two variables named `X` are different
/// variables unless one is a clone of the other.
#[derive(Clone)]
pub struct Var {
    id: u64,
    name: Rc<str>,
}

impl Var {
    pub fn new(name: &str) -> Self {
        let id = NEXT_VAR.fetch_add(1, Ordering::Relaxed);
        Var {
            id,
            name: Rc::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Var {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Var {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// A functor applied to an ordered list of arguments.
///
/// The argument slice is reference counted, so cloning a compound never
/// copies its sub-terms and two compounds may share one argument list.
#[derive(Clone)]
pub struct Compound {
    functor: Atom,
    args: Rc<[Term]>,
}

impl Compound {
    pub fn new(functor: impl Into<Atom>, args: impl IntoIterator<Item = Term>) -> Self {
        Compound {
            functor: functor.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn functor(&self) -> &Atom {
        &self.functor
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// `true` if both compounds point at the very same argument list.
    pub fn shares_args(&self, other: &Compound) -> bool {
        Rc::ptr_eq(&self.args, &other.args)
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.functor == other.functor && (self.shares_args(other) || self.args == other.args)
    }
}

impl Eq for Compound {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Atom,
    Number,
    Variable,
    Compound,
}

/// Immutable first-order term.
///
/// Equality is structural, except for variables which compare by identity.
#[derive(Clone, PartialEq, Eq)]
pub enum Term {
    Atom(Atom),
    Number(BigInt),
    Variable(Var),
    Compound(Compound),
}

impl Term {
    pub fn atom(text: &str) -> Self {
        Term::Atom(Atom::new(text))
    }

    pub fn number(value: impl Into<BigInt>) -> Self {
        Term::Number(value.into())
    }

    pub fn var(var: &Var) -> Self {
        Term::Variable(var.clone())
    }

    pub fn compound(functor: &str, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Compound(Compound::new(functor, args))
    }

    pub fn kind(&self) -> TermKind {
        match self {
            Term::Atom(_) => TermKind::Atom,
            Term::Number(_) => TermKind::Number,
            Term::Variable(_) => TermKind::Variable,
            Term::Compound(_) => TermKind::Compound,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Atoms and numbers.
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Atom(_) | Term::Number(_))
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Term::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Literal text of an atom or number.
    pub fn literal(&self) -> Option<String> {
        match self {
            Term::Atom(a) => Some(a.as_str().to_string()),
            Term::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `true` if no variable occurs anywhere in the term.
    pub fn is_ground(&self) -> bool {
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Variable(_) => return false,
                Term::Compound(c) => stack.extend(c.args()),
                Term::Atom(_) | Term::Number(_) => {}
            }
        }
        true
    }

    /// Distinct variables in left-to-right order of first occurrence.
    pub fn variables(&self) -> Vec<Var> {
        let mut seen = HashSet::new();
        let mut vars = Vec::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Variable(v) => {
                    if seen.insert(v.id()) {
                        vars.push(v.clone());
                    }
                }
                // reversed so the leftmost argument is visited first
                Term::Compound(c) => stack.extend(c.args().iter().rev()),
                Term::Atom(_) | Term::Number(_) => {}
            }
        }
        vars
    }

    /// Nesting depth. Constants and variables have depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((term, depth)) = stack.pop() {
            max = max.max(depth);
            if let Term::Compound(c) = term {
                stack.extend(c.args().iter().map(|arg| (arg, depth + 1)));
            }
        }
        max
    }

    /// Rebuild the term, replacing every variable for which `f` returns a
    /// term. Runs on an explicit stack, so nesting depth is not limited by
    /// the call stack.
    pub fn replace_vars<F>(&self, mut f: F) -> Term
    where
        F: FnMut(&Var) -> Option<Term>,
    {
        enum Step<'a> {
            Visit(&'a Term),
            Build { functor: &'a Atom, arity: usize },
        }

        let mut steps = vec![Step::Visit(self)];
        let mut out: Vec<Term> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Term::Variable(v)) => {
                    out.push(f(v).unwrap_or_else(|| Term::Variable(v.clone())));
                }
                Step::Visit(Term::Compound(c)) if c.arity() > 0 => {
                    steps.push(Step::Build {
                        functor: c.functor(),
                        arity: c.arity(),
                    });
                    // post order so iter in reverse
                    steps.extend(c.args().iter().rev().map(Step::Visit));
                }
                Step::Visit(term) => out.push(term.clone()),
                Step::Build { functor, arity } => {
                    let args = out.split_off(out.len() - arity);
                    out.push(Term::Compound(Compound::new(functor.clone(), args)));
                }
            }
        }

        out.pop().unwrap_or_else(|| self.clone())
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, debug: bool) -> fmt::Result {
        match self {
            Term::Atom(a) => write!(f, "{}", a),
            Term::Number(n) => write!(f, "{}", n),
            Term::Variable(v) if debug => write!(f, "{:?}", v),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Compound(c) => {
                write!(f, "{}", c.functor())?;
                if c.arity() == 0 {
                    return Ok(());
                }
                f.write_str("(")?;
                for (i, arg) in c.args().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.write(f, debug)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, false)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, true)
    }
}

impl From<Var> for Term {
    fn from(var: Var) -> Self {
        Term::Variable(var)
    }
}

impl From<&Var> for Term {
    fn from(var: &Var) -> Self {
        Term::Variable(var.clone())
    }
}

impl From<Atom> for Term {
    fn from(atom: Atom) -> Self {
        Term::Atom(atom)
    }
}

impl From<Compound> for Term {
    fn from(compound: Compound) -> Self {
        Term::Compound(compound)
    }
}

impl From<BigInt> for Term {
    fn from(n: BigInt) -> Self {
        Term::Number(n)
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Number(BigInt::from(n))
    }
}
