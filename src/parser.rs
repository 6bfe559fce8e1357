//! Reading terms from text.
//!
//! ```text
//! <term>     ::= ATOM | NUM | VAR | <compound>
//! <compound> ::= ATOM "(" <args> ")"
//! <args>     ::= <term> | <term> "," <args>
//! ```
//!
//! ATOM starts with a lowercase letter, VAR with an uppercase letter or `_`,
//! both continue with letters, digits and `_`. NUM is an optional `-`
//! followed by decimal digits.

use std::str::FromStr;

use hashbrown::HashMap;
use num_bigint::BigInt;

use crate::{
    ast::{Atom, Compound, Term, Var},
    error::ParseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'a> {
    Atom(&'a str),
    Var(&'a str),
    Number(&'a str),
    LParen,
    RParen,
    Comma,
    End,
}

impl TokenKind<'_> {
    fn describe(&self) -> String {
        match self {
            TokenKind::Atom(s) => format!("atom `{}`", s),
            TokenKind::Var(s) => format!("variable `{}`", s),
            TokenKind::Number(s) => format!("number `{}`", s),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::End => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind<'a>,
    offset: usize,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        if let Some(tok) = self.peeked {
            return Ok(tok);
        }
        let tok = self.scan()?;
        self.peeked = Some(tok);
        Ok(tok)
    }

    fn next(&mut self) -> Result<Token<'a>, ParseError> {
        match self.peeked.take() {
            Some(tok) => Ok(tok),
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> Result<Token<'a>, ParseError> {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();

        let offset = self.pos;
        let Some(ch) = trimmed.chars().next() else {
            return Ok(Token {
                kind: TokenKind::End,
                offset,
            });
        };

        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            c if c.is_ascii_lowercase() => TokenKind::Atom(self.word(offset)),
            c if c.is_ascii_uppercase() || c == '_' => TokenKind::Var(self.word(offset)),
            c if c.is_ascii_digit() => TokenKind::Number(self.digits(offset, offset)),
            '-' if trimmed[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                TokenKind::Number(self.digits(offset, offset + 1))
            }
            ch => return Err(ParseError::UnexpectedChar { ch, offset }),
        };

        if matches!(kind, TokenKind::LParen | TokenKind::RParen | TokenKind::Comma) {
            self.pos += 1;
        }
        Ok(Token { kind, offset })
    }

    fn word(&mut self, start: usize) -> &'a str {
        self.take_while(start, start, |c| c.is_ascii_alphanumeric() || c == '_')
    }

    fn digits(&mut self, start: usize, from: usize) -> &'a str {
        self.take_while(start, from, |c| c.is_ascii_digit())
    }

    // the character at `start` is already known to belong to the token;
    // `accept` is checked from `from` onwards
    fn take_while(&mut self, start: usize, from: usize, accept: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let first = from.max(start + 1);
        let end = input[first..]
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map(|(i, _)| first + i)
            .unwrap_or(input.len());
        self.pos = end;
        &input[start..end]
    }
}

// open compound waiting for its remaining arguments
struct Frame {
    functor: Atom,
    args: Vec<Term>,
}

/// Reads terms from text, sharing variables by name.
///
/// Every `read` on the same reader resolves a variable name to the same
/// [`Var`], so terms read one after another can be unified against each
/// other. `_` is anonymous and fresh at every occurrence.
#[derive(Debug, Default)]
pub struct TermReader {
    atoms: HashMap<String, Atom>,
    vars: HashMap<String, Var>,
}

impl TermReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variable this reader uses for `name`, if it has read one.
    pub fn var(&self, name: &str) -> Option<&Var> {
        self.vars.get(name)
    }

    fn intern_atom(&mut self, name: &str) -> Atom {
        if let Some(atom) = self.atoms.get(name) {
            return atom.clone();
        }
        let atom = Atom::new(name);
        self.atoms.insert(name.to_string(), atom.clone());
        atom
    }

    fn intern_var(&mut self, name: &str) -> Var {
        if name == "_" {
            return Var::new(name);
        }
        if let Some(var) = self.vars.get(name) {
            return var.clone();
        }
        let var = Var::new(name);
        self.vars.insert(name.to_string(), var.clone());
        var
    }

    pub fn read(&mut self, input: &str) -> Result<Term, ParseError> {
        let mut lexer = Lexer::new(input);
        let mut frames: Vec<Frame> = Vec::new();

        loop {
            let tok = lexer.next()?;
            let mut done = match tok.kind {
                TokenKind::Atom(name) => {
                    let atom = self.intern_atom(name);
                    if lexer.peek()?.kind == TokenKind::LParen {
                        lexer.next()?;
                        frames.push(Frame {
                            functor: atom,
                            args: Vec::new(),
                        });
                        continue;
                    }
                    Term::Atom(atom)
                }
                TokenKind::Var(name) => Term::Variable(self.intern_var(name)),
                TokenKind::Number(text) => {
                    let n = BigInt::from_str(text)
                        .map_err(|_| ParseError::InvalidNumber { offset: tok.offset })?;
                    Term::Number(n)
                }
                TokenKind::End => return Err(ParseError::UnexpectedEnd),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        found: other.describe(),
                        expected: "a term",
                        offset: tok.offset,
                    })
                }
            };

            // attach the finished term to the innermost open compound,
            // closing compounds for as long as `)` follows
            loop {
                let Some(mut frame) = frames.pop() else {
                    let tok = lexer.next()?;
                    if tok.kind != TokenKind::End {
                        return Err(ParseError::TrailingInput { offset: tok.offset });
                    }
                    return Ok(done);
                };

                frame.args.push(done);
                let tok = lexer.next()?;
                match tok.kind {
                    TokenKind::Comma => {
                        frames.push(frame);
                        break;
                    }
                    TokenKind::RParen => {
                        done = Term::Compound(Compound::new(frame.functor, frame.args));
                    }
                    TokenKind::End => return Err(ParseError::UnexpectedEnd),
                    other => {
                        return Err(ParseError::UnexpectedToken {
                            found: other.describe(),
                            expected: "`,` or `)`",
                            offset: tok.offset,
                        })
                    }
                }
            }
        }
    }
}

/// Read a single term with a fresh [`TermReader`].
pub fn parse(input: &str) -> Result<Term, ParseError> {
    TermReader::new().read(input)
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
