//! Literal parsers

use lachs::Span;

use crate::ast::expression::{Boolean, Float, Ident, Integer, RuneLiteral, StringLiteral};
use crate::ast::statement::TypeName;
use crate::lexer::Token;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseState};

fn unexpected(state: &mut ParseState, expected: &str) -> ParseError {
    let err = match state.peek() {
        Some(tok) => ParseError::new("unexpected token")
            .expected(expected)
            .found(tok.describe())
            .at(tok.pos()),
        None => ParseError::new("unexpected end of input").expected(expected),
    };
    state.record_error(err.clone());
    err
}

/// A literal token that was consumed but cannot be decoded. Recording it past
/// the token lets it outrank the alternatives tried at the literal's start.
fn malformed(state: &mut ParseState, msg: impl Into<String>, position: Span) -> ParseError {
    let err = ParseError::new(msg).at(position);
    state.record_error(err.clone());
    err
}

/// Parse an identifier
pub fn ident() -> BoxedParser<Ident<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(_)) => match state.advance() {
            Some(Token::Ident(id)) => Ok(Ident {
                value: id.value,
                position: id.position,
                info: (),
            }),
            _ => Err(unexpected(state, "identifier")),
        },
        _ => Err(unexpected(state, "identifier")),
    })
}

/// Parse a type name. Types are plain identifiers; the checker resolves them.
pub fn type_name() -> BoxedParser<TypeName> {
    ident().label("type") >> |id| TypeName {
        name: id.value,
        position: id.position,
    }
}

/// Parse an integer literal in decimal, hex, octal or binary notation
pub fn integer() -> BoxedParser<Integer<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Integer(_)) => match state.advance() {
            Some(Token::Integer(int)) => {
                let Some(value) = parse_integer_text(&int.value) else {
                    let msg = format!("integer constant too large: {}", int.value);
                    return Err(malformed(state, msg, int.position));
                };
                Ok(Integer {
                    value,
                    position: int.position,
                    info: (),
                })
            }
            _ => Err(unexpected(state, "integer")),
        },
        _ => Err(unexpected(state, "integer")),
    })
}

fn parse_integer_text(text: &str) -> Option<i128> {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        // legacy octal: 0755
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    i128::from_str_radix(body, radix).ok()
}

/// Parse a floating-point literal
pub fn float() -> BoxedParser<Float<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Float(_)) => match state.advance() {
            Some(Token::Float(f)) => {
                let cleaned: String = f.value.chars().filter(|c| *c != '_').collect();
                let Ok(value) = cleaned.parse::<f64>() else {
                    let msg = format!("invalid float literal {}", f.value);
                    return Err(malformed(state, msg, f.position));
                };
                Ok(Float {
                    value,
                    literal: f.value,
                    position: f.position,
                    info: (),
                })
            }
            _ => Err(unexpected(state, "float")),
        },
        _ => Err(unexpected(state, "float")),
    })
}

/// Parse an interpreted ("...") or raw (`...`) string literal
pub fn string_literal() -> BoxedParser<StringLiteral<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::StringLiteral(_)) | Some(Token::RawString(_)) => match state.advance() {
            Some(Token::StringLiteral(s)) => {
                let inner = strip_delimiters(&s.value, '"');
                let value = match unescape(inner) {
                    Ok(value) => value,
                    Err(msg) => return Err(malformed(state, msg, s.position.clone())),
                };
                Ok(StringLiteral {
                    value,
                    position: s.position,
                    info: (),
                })
            }
            Some(Token::RawString(s)) => {
                // Carriage returns are discarded from raw strings
                let value = strip_delimiters(&s.value, '`').replace('\r', "");
                Ok(StringLiteral {
                    value,
                    position: s.position,
                    info: (),
                })
            }
            _ => Err(unexpected(state, "string")),
        },
        _ => Err(unexpected(state, "string")),
    })
}

/// Parse a rune literal such as `'a'` or `'\n'`
pub fn rune() -> BoxedParser<RuneLiteral<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Rune(_)) => match state.advance() {
            Some(Token::Rune(r)) => {
                let inner = strip_delimiters(&r.value, '\'');
                let decoded = match unescape_rune(inner) {
                    Ok(decoded) => decoded,
                    Err(msg) => return Err(malformed(state, msg, r.position.clone())),
                };
                let mut chars = decoded.chars();
                match (chars.next(), chars.next()) {
                    (Some(value), None) => Ok(RuneLiteral {
                        value,
                        position: r.position,
                        info: (),
                    }),
                    _ => Err(malformed(
                        state,
                        "rune literal must contain exactly one character",
                        r.position,
                    )),
                }
            }
            _ => Err(unexpected(state, "rune")),
        },
        _ => Err(unexpected(state, "rune")),
    })
}

/// Parse a boolean literal
pub fn boolean() -> BoxedParser<Boolean<()>> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::True(_)) | Some(Token::False(_)) => match state.advance() {
            Some(Token::True(t)) => Ok(Boolean {
                value: true,
                position: t.position,
                info: (),
            }),
            Some(Token::False(f)) => Ok(Boolean {
                value: false,
                position: f.position,
                info: (),
            }),
            _ => Err(unexpected(state, "boolean")),
        },
        _ => Err(unexpected(state, "boolean")),
    })
}

fn strip_delimiters(text: &str, delimiter: char) -> &str {
    text.strip_prefix(delimiter)
        .and_then(|rest| rest.strip_suffix(delimiter))
        .unwrap_or(text)
}

/// Decode the escape sequences of an interpreted string literal.
///
/// Strings hold UTF-8 text, so `\x` and octal escapes are limited to ASCII.
pub fn unescape(text: &str) -> Result<String, String> {
    decode_escapes(text, false)
}

/// Decode a rune literal body, where byte escapes may reach `\xff`.
fn unescape_rune(text: &str) -> Result<String, String> {
    decode_escapes(text, true)
}

fn decode_escapes(text: &str, bytes_allowed: bool) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let escaped = chars
            .next()
            .ok_or_else(|| "escape sequence not terminated".to_string())?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => out.push(byte_escape(hex_escape(&mut chars, 2)?, bytes_allowed)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    let digit = chars
                        .next()
                        .and_then(|d| d.to_digit(8))
                        .ok_or_else(|| "invalid octal escape".to_string())?;
                    value = value * 8 + digit;
                }
                let decoded =
                    char::from_u32(value).ok_or_else(|| "invalid octal escape".to_string())?;
                out.push(byte_escape(decoded, bytes_allowed)?);
            }
            other => return Err(format!("unknown escape sequence: \\{}", other)),
        }
    }

    Ok(out)
}

fn byte_escape(value: char, bytes_allowed: bool) -> Result<char, String> {
    if bytes_allowed || value.is_ascii() {
        Ok(value)
    } else {
        Err(format!(
            "byte escape \\x{:02x} in a string is not supported, use \\u{:04x}",
            value as u32, value as u32
        ))
    }
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char, String> {
    let mut value = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or_else(|| "invalid hex escape".to_string())?;
        value = value * 16 + digit;
    }
    char::from_u32(value).ok_or_else(|| "escape is not a valid Unicode code point".to_string())
}
