//! Statement parsers

use crate::ast::expression::{Expression, Ident};
use crate::ast::statement::{
    Assignment, ConstDecl, ConstSpec, ForLoop, IncDec, ShortVarDecl, Statement, TypeName, VarDecl,
    VarSpec,
};
use crate::lexer::Token;

use crate::parser::combinators::{
    BoxedParser, comma_separated, expect_const, expect_equals, expect_for, expect_lbrace, expect_lparen,
    expect_rbrace, expect_rparen, expect_semicolon, expect_var,
};
use crate::parser::state::{ParseError, ParseResult, ParseState, Parser};

use super::expression::{expression, expression_list};
use super::literal::{ident, type_name};

/// ident_list := ident ("," ident)*
pub fn ident_list() -> BoxedParser<Vec<Ident<()>>> {
    comma_separated(ident())
}

fn span_of_names(names: &[Ident<()>]) -> lachs::Span {
    match (names.first(), names.last()) {
        (Some(first), Some(last)) => first.position.merge(&last.position),
        _ => lachs::Span::default(),
    }
}

fn end_of(names: &[Ident<()>], ty: &Option<TypeName>, values: &[Expression<()>]) -> lachs::Span {
    let start = span_of_names(names);
    if let Some(last) = values.last() {
        start.merge(&last.position())
    } else if let Some(ty) = ty {
        start.merge(&ty.position)
    } else {
        start
    }
}

/// Parse the optional `[type] ["=" expr_list]` tail shared by const and var specs.
fn spec_tail(state: &mut ParseState) -> ParseResult<(Option<TypeName>, Vec<Expression<()>>)> {
    let ty = match state.peek() {
        Some(Token::Ident(_)) => Some(type_name().parse(state)?),
        _ => None,
    };

    let values = match state.peek() {
        Some(Token::Equals(_)) => {
            expect_equals().parse(state)?;
            expression_list().parse(state)?
        }
        _ => vec![],
    };

    Ok((ty, values))
}

/// Parse either a single spec or a parenthesized group of specs.
fn spec_group<S: 'static>(
    state: &mut ParseState,
    spec: impl Fn(&mut ParseState, usize) -> ParseResult<S>,
) -> ParseResult<(Vec<S>, bool, Option<lachs::Span>)> {
    if !matches!(state.peek(), Some(Token::LParen(_))) {
        return Ok((vec![spec(state, 0)?], false, None));
    }

    expect_lparen().parse(state)?;
    let mut specs = vec![];
    loop {
        match state.peek() {
            Some(Token::RParen(_)) => break,
            Some(Token::Semicolon(_)) => {
                state.advance();
            }
            _ => {
                specs.push(spec(state, specs.len())?);
                if !matches!(state.peek(), Some(Token::RParen(_))) {
                    expect_semicolon().parse(state)?;
                }
            }
        }
    }
    let end = expect_rparen().parse(state)?.pos();

    Ok((specs, true, Some(end)))
}

/// const_decl := "const" ( const_spec | "(" { const_spec ";" } ")" )
pub fn const_declaration() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_const().parse(state)?.pos();

        let (specs, grouped, end) = spec_group(state, |state, iota| {
            let names = ident_list().parse(state)?;
            let (ty, values) = spec_tail(state)?;
            let position = end_of(&names, &ty, &values);
            Ok(ConstSpec {
                names,
                ty,
                values,
                iota,
                position,
            })
        })?;

        let end = end
            .or_else(|| specs.last().map(|s| s.position.clone()))
            .unwrap_or_else(|| start.clone());

        Ok(Statement::Const(ConstDecl {
            specs,
            grouped,
            position: start.merge(&end),
        }))
    })
}

/// var_decl := "var" ( var_spec | "(" { var_spec ";" } ")" )
pub fn var_declaration() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_var().parse(state)?.pos();

        let (specs, grouped, end) = spec_group(state, |state, _| {
            let names = ident_list().parse(state)?;
            let (ty, values) = spec_tail(state)?;
            if ty.is_none() && values.is_empty() {
                let err = state
                    .error_here("variable declaration needs a type or an initializer")
                    .expected("type")
                    .expected("'='");
                state.record_error(err.clone());
                return Err(err);
            }
            let position = end_of(&names, &ty, &values);
            Ok(VarSpec {
                names,
                ty,
                values,
                position,
            })
        })?;

        let end = end
            .or_else(|| specs.last().map(|s| s.position.clone()))
            .unwrap_or_else(|| start.clone());

        Ok(Statement::Var(VarDecl {
            specs,
            grouped,
            position: start.merge(&end),
        }))
    })
}

/// simple_stmt := ident_list ":=" expr_list | ident_list "=" expr_list
///              | ident ("++" | "--") | expression
pub fn simple_statement() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let pos = state.position();

        if let Ok(names) = ident_list().parse(state) {
            match state.peek() {
                Some(Token::Define(_)) => {
                    state.advance();
                    let values = expression_list().parse(state)?;
                    let position = end_of(&names, &None, &values);
                    return Ok(Statement::ShortVarDecl(ShortVarDecl {
                        names,
                        values,
                        position,
                    }));
                }
                Some(Token::Equals(_)) => {
                    state.advance();
                    let values = expression_list().parse(state)?;
                    let position = end_of(&names, &None, &values);
                    return Ok(Statement::Assignment(Assignment {
                        targets: names,
                        values,
                        position,
                    }));
                }
                Some(Token::Increment(_)) | Some(Token::Decrement(_)) if names.len() == 1 => {
                    let increment = matches!(state.peek(), Some(Token::Increment(_)));
                    let op = state.advance().map(|t| t.pos()).unwrap_or_default();
                    let position = names[0].position.merge(&op);
                    let target = names.into_iter().next().ok_or_else(|| {
                        ParseError::new("missing operand").at(position.clone())
                    })?;
                    return Ok(Statement::IncDec(IncDec {
                        target,
                        increment,
                        position,
                    }));
                }
                _ => {}
            }
        }

        state.restore(pos);
        expression().parse(state).map(Statement::Expression)
    })
}

/// block := "{" statements "}"
pub fn block() -> BoxedParser<(Vec<Statement<()>>, lachs::Span)> {
    BoxedParser::new(move |state: &mut ParseState| {
        expect_lbrace().parse(state)?;
        let body = statement_list(state);
        let end = expect_rbrace().parse(state)?.pos();
        Ok((body, end))
    })
}

/// for_stmt := "for" ( [simple_stmt] ";" expr ";" [simple_stmt] | expr ) block
pub fn for_loop() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let start = expect_for().parse(state)?.pos();

        let init = match state.peek() {
            Some(Token::Semicolon(_)) => None,
            _ => Some(simple_statement().parse(state)?),
        };

        let (init, condition, post) = if matches!(state.peek(), Some(Token::Semicolon(_))) {
            state.advance();
            let condition = expression().label("loop condition").parse(state)?;
            expect_semicolon().parse(state)?;
            let post = match state.peek() {
                Some(Token::LBrace(_)) => None,
                _ => Some(Box::new(simple_statement().parse(state)?)),
            };
            (init.map(Box::new), condition, post)
        } else {
            match init {
                Some(Statement::Expression(condition)) => (None, condition, None),
                _ => {
                    let err = state
                        .error_here("expected for loop condition")
                        .expected("';'");
                    state.record_error(err.clone());
                    return Err(err);
                }
            }
        };

        let (body, end) = block().parse(state)?;

        Ok(Statement::For(ForLoop {
            init,
            condition,
            post,
            body,
            position: start.merge(&end),
        }))
    })
}

/// statement := const_decl | var_decl | for_stmt | simple_stmt
pub fn statement() -> BoxedParser<Statement<()>> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(Token::Const(_)) => const_declaration().parse(state),
        Some(Token::Var(_)) => var_declaration().parse(state),
        Some(Token::For(_)) => for_loop().parse(state),
        _ => simple_statement().parse(state),
    })
}

/// Skip to the end of the current statement: the next `;` outside of any
/// braces or parentheses, or the `}` closing the enclosing block. Always
/// consumes at least one token unless it stops at that `}`.
fn skip_to_statement_end(state: &mut ParseState) {
    let mut depth = 0usize;
    while let Some(tok) = state.peek() {
        match tok {
            Token::LBrace(_) | Token::LParen(_) => depth += 1,
            Token::RBrace(_) if depth == 0 => return,
            Token::RBrace(_) | Token::RParen(_) => depth = depth.saturating_sub(1),
            Token::Semicolon(_) if depth == 0 => {
                state.advance();
                return;
            }
            _ => {}
        }
        state.advance();
    }
}

/// statements := { statement ";" | ";" }
///
/// Stops in front of a closing `}` or at the end of input. A statement that
/// fails to parse has its error committed and is skipped, so one pass reports
/// every broken statement.
pub fn statement_list(state: &mut ParseState) -> Vec<Statement<()>> {
    let mut statements = vec![];

    while let Some(tok) = state.peek() {
        match tok {
            Token::RBrace(_) => break,
            Token::Semicolon(_) => {
                state.advance();
                continue;
            }
            _ => {}
        }

        state.clear_furthest_error();
        let pos = state.position();
        let parsed = statement().parse(state).and_then(|stmt| {
            match state.peek() {
                None | Some(Token::RBrace(_)) => {}
                _ => {
                    expect_semicolon().parse(state)?;
                }
            }
            Ok(stmt)
        });

        match parsed {
            Ok(stmt) => statements.push(stmt),
            Err(err) => {
                if state.get_furthest_error().is_none() {
                    state.collect_error(err);
                }
                state.commit_furthest_error();
                state.restore(pos);
                skip_to_statement_end(state);
            }
        }
    }

    statements
}
