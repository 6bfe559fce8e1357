use std::process::ExitCode;

use unify::{ast::Term, parser::TermReader, Unifier, Var};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (s, t) = match args.as_slice() {
        [s, t] => {
            let mut reader = TermReader::new();
            let parsed = reader.read(s).and_then(|s| Ok((s, reader.read(t)?)));
            match parsed {
                Ok(terms) => terms,
                Err(err) => {
                    eprintln!("error: {}", err);
                    return ExitCode::from(2);
                }
            }
        }
        [] => example(),
        _ => {
            eprintln!("usage: unify [TERM TERM]");
            return ExitCode::from(2);
        }
    };

    println!("unify: {}", s);
    println!("with:  {}", t);

    match Unifier::new().unify(&s, &t) {
        Ok(mgu) => {
            println!("mgu:   {}", mgu);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("fail:  {}", err);
            ExitCode::FAILURE
        }
    }
}

// p(Z, h(Z, W), f(W)) against p(f(X), h(Y, f(a)), Y)
fn example() -> (Term, Term) {
    let [x, y, z, w] = ["X", "Y", "Z", "W"].map(Var::new);

    let s = Term::compound(
        "p",
        vec![
            Term::var(&z),
            Term::compound("h", vec![Term::var(&z), Term::var(&w)]),
            Term::compound("f", vec![Term::var(&w)]),
        ],
    );
    let t = Term::compound(
        "p",
        vec![
            Term::compound("f", vec![Term::var(&x)]),
            Term::compound("h", vec![Term::var(&y), Term::compound("f", vec![Term::atom("a")])]),
            Term::var(&y),
        ],
    );

    (s, t)
}
