use unify::{parser::TermReader, unify, ErrorKind, Substitution, Term, Unifier, UnifierConfig, Var};

fn read2(s: &str, t: &str) -> (TermReader, Term, Term) {
    let mut reader = TermReader::new();
    let s = reader.read(s).unwrap();
    let t = reader.read(t).unwrap();
    (reader, s, t)
}

fn mgu(s: &str, t: &str) -> String {
    let (_, s, t) = read2(s, t);
    let mgu = unify(&s, &t).unwrap();
    assert_eq!(mgu.apply(&s), mgu.apply(&t));
    mgu.to_string()
}

fn failure(s: &str, t: &str) -> ErrorKind {
    let (_, s, t) = read2(s, t);
    unify(&s, &t).unwrap_err().kind()
}

#[test]
fn binds_across_arguments() {
    assert_eq!(mgu("f(X, b)", "f(a, Y)"), "{X: a, Y: b}");
}

#[test]
fn different_functors_fail() {
    assert_eq!(failure("f(X)", "g(X)"), ErrorKind::FunctorMismatch);
}

#[test]
fn same_variable_unifies_with_itself() {
    let x = Var::new("X");
    let mgu = unify(&Term::var(&x), &Term::var(&x)).unwrap();
    assert_eq!(mgu, Substitution::new());
}

#[test]
fn distinct_atoms_fail() {
    assert_eq!(failure("a", "b"), ErrorKind::ConstantMismatch);
}

#[test]
fn ground_terms_unify_with_themselves() {
    for text in ["a", "42", "f(a, g(b, 1), h(c))"] {
        let t: Term = text.parse().unwrap();
        assert!(unify(&t, &t).unwrap().is_empty(), "{}", text);
        let copy: Term = text.parse().unwrap();
        assert!(unify(&t, &copy).unwrap().is_empty(), "{}", text);
    }
}

#[test]
fn numbers_compare_by_value() {
    assert_eq!(mgu("f(007, X)", "f(7, 123456789012345678901234567890)"), "{X: 123456789012345678901234567890}");
    assert_eq!(failure("12", "13"), ErrorKind::ConstantMismatch);
}

#[test]
fn occurs_check() {
    assert_eq!(failure("X", "f(X)"), ErrorKind::OccursCheck);
    assert_eq!(failure("f(X)", "X"), ErrorKind::OccursCheck);
    assert_eq!(failure("f(X, Y)", "f(Y, g(X))"), ErrorKind::OccursCheck);
    assert_eq!(failure("f(X, Y, Z)", "f(Y, Z, g(X))"), ErrorKind::OccursCheck);
}

#[test]
fn aliasing_carries_bindings() {
    assert_eq!(mgu("f(X, Y)", "f(Y, a)"), "{X: a, Y: a}");
    assert_eq!(mgu("f(X, Y, X)", "f(Y, Z, b)"), "{X: b, Y: b, Z: b}");
}

#[test]
fn free_classes_keep_one_representative() {
    assert_eq!(mgu("f(X, Y)", "f(Y, X)"), "{Y: X}");
    assert_eq!(mgu("g(A, B, C)", "g(B, C, A)"), "{B: A, C: A}");
}

#[test]
fn nested_bindings_are_resolved() {
    assert_eq!(
        mgu("p(X, g(Y), Y)", "p(f(Y), Z, h(W))"),
        "{X: f(h(W)), Y: h(W), Z: g(h(W))}"
    );
}

#[test]
fn failure_kinds() {
    assert_eq!(failure("f(a, b)", "f(a)"), ErrorKind::ArityMismatch);
    assert_eq!(failure("f(a)", "a"), ErrorKind::KindMismatch);
    assert_eq!(failure("3", "f(3)"), ErrorKind::KindMismatch);
    assert_eq!(failure("f(X, X)", "f(a, g(a))"), ErrorKind::KindMismatch);
}

#[test]
fn unifier_can_be_reused() {
    let mut unifier = Unifier::new();
    let pairs = [
        ("f(X, b)", "f(a, Y)"),
        ("X", "f(X)"),
        ("f(X, Y)", "f(Y, a)"),
        ("g(X)", "g(h(Z))"),
    ];
    for (s, t) in pairs {
        let (_, s, t) = read2(s, t);
        assert_eq!(unifier.unify(&s, &t), unify(&s, &t));
    }
}

#[test]
fn symmetric_outcomes() {
    let pairs = [
        ("f(X, b)", "f(a, Y)"),
        ("f(X, Y)", "f(Y, a)"),
        ("X", "f(X)"),
        ("f(X)", "g(Y)"),
        ("h(A, g(B), B)", "h(g(C), A, k(C))"),
    ];
    for (s, t) in pairs {
        let (_, s, t) = read2(s, t);
        let st = unify(&s, &t);
        let ts = unify(&t, &s);
        assert_eq!(st.is_ok(), ts.is_ok(), "{} = {}", s, t);
        if let (Ok(a), Ok(b)) = (st, ts) {
            assert_eq!(a.len(), b.len());
            assert_eq!(a.apply(&s), a.apply(&t));
            assert_eq!(b.apply(&s), b.apply(&t));
        }
    }
}

#[test]
fn deeply_nested_terms() {
    let depth = 2_000;
    let x = Var::new("X");
    let mut s = Term::var(&x);
    let mut t = Term::atom("a");
    for _ in 0..depth {
        s = Term::compound("s", vec![s]);
        t = Term::compound("s", vec![t]);
    }
    let mgu = unify(&s, &t).unwrap();
    assert_eq!(mgu.get(&x), Some(&Term::atom("a")));
}

#[test]
fn step_limit_is_reported() {
    let (_, s, t) = read2("f(a, b, c)", "f(a, b, c2)");
    let mut unifier = Unifier::with_config(UnifierConfig { max_steps: 3 });
    assert_eq!(unifier.unify(&s, &t).unwrap_err().kind(), ErrorKind::StepLimitExceeded);
    assert_eq!(unifier.config().max_steps, 3);
}
