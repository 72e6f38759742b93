//! Expression parsers
//!
//! Precedence climbs from comparisons (loosest) over additive and
//! multiplicative operators down to unary operators and operands. All binary
//! operators are left-associative.

use crate::ast::expression::{
    BinOpKind, BinaryOp, Call, Expression, QualifiedName, UnaryOp, UnaryOpKind,
};
use crate::lexer::Token;

use crate::parser::combinators::{BoxedParser, comma_separated, expect_lparen, expect_rparen};
use crate::parser::state::{ParseState, Parser};

use super::literal::{boolean, float, ident, integer, rune, string_literal};

/// literal := integer | float | string | rune | boolean
pub fn literal_expression() -> BoxedParser<Expression<()>> {
    let int_expr = integer() >> Expression::Integer;
    let float_expr = float() >> Expression::Float;
    let str_expr = string_literal() >> Expression::String;
    let rune_expr = rune() >> Expression::Rune;
    let bool_expr = boolean() >> Expression::Boolean;

    (int_expr | float_expr | str_expr | rune_expr | bool_expr).label("expression")
}

/// call_args := expression ("," expression)* [","]
fn call_args() -> BoxedParser<Vec<Expression<()>>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut args = vec![];

        loop {
            if matches!(state.peek(), Some(Token::RParen(_))) {
                break;
            }
            args.push(expression().parse(state)?);

            if !matches!(state.peek(), Some(Token::Comma(_))) {
                break;
            }
            state.advance();
        }

        Ok(args)
    })
}

/// operand := literal | "(" expression ")" | name ["." name] ["(" call_args ")"]
///
/// A qualified name is only valid as the callee of a call (`fmt.Println(..)`);
/// a bare name without arguments is a plain identifier reference.
pub fn operand() -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(Token::LParen(_)) => {
            let inner = (expect_lparen() * expression() - expect_rparen()).parse(state)?;
            Ok(inner)
        }
        Some(Token::Ident(_)) => {
            let first = ident().parse(state)?;

            let (package, name) = if matches!(state.peek(), Some(Token::Dot(_))) {
                state.advance();
                let member = ident().label("selector").parse(state)?;
                (Some(first), member)
            } else {
                (None, first)
            };

            if !matches!(state.peek(), Some(Token::LParen(_))) {
                return match package {
                    Some(package) => {
                        let err = state.error_here(format!(
                            "{}.{} must be called",
                            package.value, name.value
                        ));
                        state.record_error(err.clone().expected("'('"));
                        Err(err)
                    }
                    None => Ok(Expression::Ident(name)),
                };
            }

            let start = package
                .as_ref()
                .map(|p| p.position.clone())
                .unwrap_or_else(|| name.position.clone());
            let func = QualifiedName {
                package: package.map(|p| p.value),
                name: name.value,
                position: start.merge(&name.position),
            };

            expect_lparen().parse(state)?;
            let args = call_args().parse(state)?;
            let end = expect_rparen().parse(state)?.pos();

            Ok(Expression::Call(Call {
                func,
                args,
                position: start.merge(&end),
                info: (),
            }))
        }
        _ => literal_expression().parse(state),
    })
}

/// unary := ("-" | "+") unary | operand
pub fn unary() -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let op = match state.peek() {
            Some(Token::Minus(_)) => Some(UnaryOpKind::Neg),
            Some(Token::Plus(_)) => Some(UnaryOpKind::Plus),
            _ => None,
        };

        let Some(op) = op else {
            return operand().parse(state);
        };

        let start = state.advance().map(|t| t.pos()).unwrap_or_default();
        let operand = unary().parse(state)?;
        let position = start.merge(&operand.position());
        Ok(Expression::UnaryOp(UnaryOp {
            op,
            operand: Box::new(operand),
            position,
            info: (),
        }))
    })
}

fn multiplicative_op(token: &Token) -> Option<BinOpKind> {
    match token {
        Token::Star(_) => Some(BinOpKind::Mul),
        Token::Slash(_) => Some(BinOpKind::Div),
        _ => None,
    }
}

fn additive_op(token: &Token) -> Option<BinOpKind> {
    match token {
        Token::Plus(_) => Some(BinOpKind::Add),
        Token::Minus(_) => Some(BinOpKind::Sub),
        _ => None,
    }
}

fn comparison_op(token: &Token) -> Option<BinOpKind> {
    match token {
        Token::DoubleEquals(_) => Some(BinOpKind::Eq),
        Token::NotEquals(_) => Some(BinOpKind::NotEq),
        Token::LessThan(_) => Some(BinOpKind::Lt),
        Token::GreaterThan(_) => Some(BinOpKind::Gt),
        Token::LessEquals(_) => Some(BinOpKind::LtEq),
        Token::GreaterEquals(_) => Some(BinOpKind::GtEq),
        _ => None,
    }
}

/// Build a left-associative chain `operand (op operand)*`.
fn binary_level(
    operand: fn() -> BoxedParser<Expression<()>>,
    operator: fn(&Token) -> Option<BinOpKind>,
) -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut left = operand().parse(state)?;

        while let Some(op) = state.peek().and_then(operator) {
            state.advance();
            let right = operand().parse(state)?;
            let position = left.position().merge(&right.position());
            left = Expression::BinaryOp(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
                info: (),
            });
        }

        Ok(left)
    })
}

/// multiplicative := unary (("*" | "/") unary)*
pub fn multiplicative() -> BoxedParser<Expression<()>> {
    binary_level(unary, multiplicative_op)
}

/// additive := multiplicative (("+" | "-") multiplicative)*
pub fn additive() -> BoxedParser<Expression<()>> {
    binary_level(multiplicative, additive_op)
}

/// comparison := additive (("==" | "!=" | "<" | ">" | "<=" | ">=") additive)*
pub fn comparison() -> BoxedParser<Expression<()>> {
    binary_level(additive, comparison_op)
}

/// expression := comparison
pub fn expression() -> BoxedParser<Expression<()>> {
    BoxedParser::new(move |state: &mut ParseState| comparison().parse(state))
}

/// expression_list := expression ("," expression)*
pub fn expression_list() -> BoxedParser<Vec<Expression<()>>> {
    comma_separated(expression())
}
