//! Parser combinators over the token stream.
//!
//! [`BoxedParser`] erases the concrete parser type so grammar rules can be
//! returned from functions and stored. Rules compose with methods or the
//! operator shorthands:
//!
//! - `a - b` parses both and keeps `a` (e.g. a statement before its `;`)
//! - `a * b` parses both and keeps `b` (e.g. the expression after `(`)
//! - `a | b` tries `a`, then `b` from the same position
//! - `a >> f` maps the result of `a`

use std::ops::{BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::lexer::Token;

use super::state::{ParseError, ParseResult, ParseState, Parser};

type ParserFn<T> = Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>;

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

impl<T: 'static> BoxedParser<T> {
    /// Parse `self`, then `terminator`; keep the first result.
    pub fn skip<U: 'static>(self, terminator: BoxedParser<U>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let value = self.parse(state)?;
            terminator.parse(state)?;
            Ok(value)
        })
    }

    /// Parse `self`, then `next`; keep the second result.
    pub fn then<U: 'static>(self, next: BoxedParser<U>) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            self.parse(state)?;
            next.parse(state)
        })
    }

    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| self.parse(state).map(&f))
    }

    /// Try `self`; on failure rewind and try `alternative`. The failed
    /// attempt has already recorded its error in the state.
    pub fn or(self, alternative: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let start = state.position();
            self.parse(state).or_else(|_| {
                state.restore(start);
                alternative.parse(state)
            })
        })
    }

    /// Report failures of this rule as "expected `name`".
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            self.parse(state).map_err(|mut err| {
                err.expected = vec![name.to_string()];
                state.record_error(err.clone());
                err
            })
        })
    }
}

impl<T: 'static, U: 'static> Sub<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn sub(self, rhs: BoxedParser<U>) -> Self::Output {
        self.skip(rhs)
    }
}

impl<T: 'static, U: 'static> Mul<BoxedParser<U>> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn mul(self, rhs: BoxedParser<U>) -> Self::Output {
        self.then(rhs)
    }
}

impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

/// Consume one token matching `predicate`, or record what was expected.
fn token(predicate: fn(&Token) -> bool, expected: &'static str) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| {
        if state.peek().is_some_and(predicate) {
            if let Some(tok) = state.advance() {
                return Ok(tok);
            }
        }
        let err = match state.peek() {
            Some(tok) => ParseError::new("unexpected token")
                .expected(expected)
                .found(tok.describe())
                .at(tok.pos()),
            None => ParseError::new("unexpected end of input").expected(expected),
        };
        state.record_error(err.clone());
        Err(err)
    })
}

pub fn expect_semicolon() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Semicolon(_)), "';'")
}

pub fn expect_equals() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Equals(_)), "'='")
}

pub fn expect_lparen() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::LParen(_)), "'('")
}

pub fn expect_rparen() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::RParen(_)), "')'")
}

pub fn expect_lbrace() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::LBrace(_)), "'{'")
}

pub fn expect_rbrace() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::RBrace(_)), "'}'")
}

pub fn expect_package() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Package(_)), "'package'")
}

pub fn expect_import() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Import(_)), "'import'")
}

pub fn expect_func() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Func(_)), "'func'")
}

pub fn expect_const() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Const(_)), "'const'")
}

pub fn expect_var() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::Var(_)), "'var'")
}

pub fn expect_for() -> BoxedParser<Token> {
    token(|t| matches!(t, Token::For(_)), "'for'")
}

/// Zero or more occurrences of `item`.
///
/// Stops quietly when `item` fails without consuming anything. A failure
/// after `item` made progress is a real syntax error and is returned.
pub fn many<T: 'static>(item: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut items = Vec::new();
        loop {
            let start = state.position();
            match item.parse(state) {
                Ok(value) => items.push(value),
                Err(_) if state.position() == start => break,
                Err(err) => return Err(err),
            }
        }
        Ok(items)
    })
}

/// One or more `item`s separated by commas: `a, b, c`.
pub fn comma_separated<T: 'static>(item: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut items = vec![item.parse(state)?];
        while matches!(state.peek(), Some(Token::Comma(_))) {
            state.advance();
            items.push(item.parse(state)?);
        }
        Ok(items)
    })
}
