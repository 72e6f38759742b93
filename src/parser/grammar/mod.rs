//! Grammar for gobasics source files
//!
//! The parsing rules are organized by category:
//! - `literal`: identifiers, type names and literal values
//! - `expression`: operators, calls and conversions
//! - `statement`: declarations, assignments and `for` loops
//!
//! This module ties them together into the two program forms: a Go file with
//! a `package` clause, imports and `func main`, or a bare list of statements.

mod expression;
mod literal;
mod statement;

pub use expression::expression;
pub use literal::unescape;
pub use statement::statement;

use crate::ast::{Import, MainFunction, Program};
use crate::lexer::Token;

use super::combinators::{
    BoxedParser, expect_func, expect_import, expect_lparen, expect_package, expect_rparen,
    expect_semicolon, many,
};
use super::state::{ParseError, ParseState, Parser};

use literal::{ident, string_literal};
use statement::{block, statement_list};

fn import_path() -> BoxedParser<Import> {
    string_literal().label("import path") >> |s| Import {
        path: s.value,
        position: s.position,
    }
}

/// import := "import" ( string | "(" { string ";" } ")" ) ";"
fn import_declaration() -> BoxedParser<Vec<Import>> {
    BoxedParser::new(move |state: &mut ParseState| {
        expect_import().parse(state)?;

        let imports = if matches!(state.peek(), Some(Token::LParen(_))) {
            expect_lparen().parse(state)?;
            let mut imports = vec![];
            loop {
                match state.peek() {
                    Some(Token::RParen(_)) => break,
                    Some(Token::Semicolon(_)) => {
                        state.advance();
                    }
                    _ => imports.push(import_path().parse(state)?),
                }
            }
            expect_rparen().parse(state)?;
            imports
        } else {
            vec![import_path().parse(state)?]
        };

        expect_semicolon().parse(state)?;
        Ok(imports)
    })
}

/// package_clause := "package" ident ";"
fn package_clause() -> BoxedParser<crate::ast::expression::Ident<()>> {
    expect_package() * ident().label("package name") - expect_semicolon()
}

/// Skip forward to the next top-level `func`, or the end of input.
fn skip_to_next_func(state: &mut ParseState) {
    state.advance();

    let mut depth = 0usize;
    while let Some(tok) = state.peek() {
        match tok {
            Token::LBrace(_) => depth += 1,
            Token::RBrace(_) => depth = depth.saturating_sub(1),
            Token::Func(_) if depth == 0 => break,
            _ => {}
        }
        state.advance();
    }
}

/// program := [ package_clause ] { import } ( func_main | statements )
///
/// With error recovery: a broken top-level function is skipped so later
/// functions are still parsed and reported.
pub fn program() -> BoxedParser<Program<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let package = match state.peek() {
            Some(Token::Package(_)) => Some(package_clause().parse(state)?),
            _ => None,
        };

        let imports = many(import_declaration())
            .parse(state)?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        if package.is_none() && !matches!(state.peek(), Some(Token::Func(_))) {
            let body = statement_list(state);
            if let Some(tok) = state.peek() {
                let err = ParseError::new("unexpected token")
                    .found(tok.describe())
                    .at(tok.pos());
                state.collect_error(err);
            }
            return Ok(Program {
                package,
                imports,
                main: None,
                body,
            });
        }

        let mut main = None;
        let mut body = vec![];

        while state.has_next() {
            if matches!(state.peek(), Some(Token::Semicolon(_))) {
                state.advance();
                continue;
            }

            state.clear_furthest_error();
            let pos = state.position();
            match function().parse(state) {
                Ok((header, statements)) if header.name.value == "main" => {
                    if main.is_some() {
                        state.collect_error(
                            ParseError::new("main redeclared in this block")
                                .at(header.name.position.clone()),
                        );
                    } else {
                        main = Some(header);
                        body = statements;
                    }
                }
                Ok((header, _)) => state.collect_error(
                    ParseError::new(format!(
                        "func {} is not supported; only func main is allowed",
                        header.name.value
                    ))
                    .at(header.position),
                ),
                Err(err) => {
                    if state.get_furthest_error().is_none() {
                        state.collect_error(err);
                    }
                    state.commit_furthest_error();
                    state.restore(pos);
                    skip_to_next_func(state);
                }
            }
        }

        Ok(Program {
            package,
            imports,
            main,
            body,
        })
    })
}

/// func_main := "func" ident "(" ")" block
fn function() -> BoxedParser<(MainFunction, Vec<crate::ast::statement::Statement<()>>)> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_func().parse(state)?.pos();
        let name = ident().label("function name").parse(state)?;
        expect_lparen().parse(state)?;
        let close = expect_rparen().parse(state)?.pos();
        let (body, _) = block().parse(state)?;

        let position = start.merge(&close);
        Ok((MainFunction { name, position }, body))
    })
}

/// Parse a complete program from the token stream.
///
/// Returns the parsed program along with every error collected on the way.
/// A program is returned even when errors were recovered from; callers must
/// treat a non-empty error list as failure.
pub fn parse(state: &mut ParseState) -> (Option<Program<()>>, Vec<ParseError>) {
    let program = match program().parse(state) {
        Ok(prog) => Some(prog),
        Err(err) => {
            match state.get_furthest_error() {
                Some(furthest) => {
                    let furthest = furthest.clone();
                    state.collect_error(furthest);
                }
                None => state.collect_error(err),
            }
            None
        }
    };

    let errors = state.take_errors();
    (program, errors)
}
