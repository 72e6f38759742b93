//! Tokenization for gobasics source files.
//!
//! Lexing happens in two steps. [`prepare`] rewrites the raw text the way the
//! Go toolchain reads it (comments blanked out, semicolons inserted at line
//! ends), then [`Token::lex`] turns the result into tokens using `lachs`.

mod semicolons;

pub use semicolons::insert_semicolons;

use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("package")]
    Package,
    #[terminal("import")]
    Import,
    #[terminal("func")]
    Func,
    #[terminal("const")]
    Const,
    #[terminal("var")]
    Var,
    #[terminal("for")]
    For,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[literal("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[literal("([0-9][0-9_]*\\.[0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+)")]
    Float,
    #[literal("(0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*)")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*""#)]
    StringLiteral,
    #[literal("`[^`]*`")]
    RawString,
    #[literal(r"'([^'\\]|\\x[0-9a-fA-F]{2}|\\[0-7]{3}|\\u[0-9a-fA-F]{4}|\\U[0-9a-fA-F]{8}|\\.)'")]
    Rune,
    #[terminal(":=")]
    Define,
    #[terminal("=")]
    Equals,
    #[terminal("==")]
    DoubleEquals,
    #[terminal("!=")]
    NotEquals,
    #[terminal("<")]
    LessThan,
    #[terminal(">")]
    GreaterThan,
    #[terminal("<=")]
    LessEquals,
    #[terminal(">=")]
    GreaterEquals,
    #[terminal("++")]
    Increment,
    #[terminal("--")]
    Decrement,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal(",")]
    Comma,
    #[terminal(";")]
    Semicolon,
    #[terminal(".")]
    Dot,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Package(inner) => inner.position.clone(),
            Token::Import(inner) => inner.position.clone(),
            Token::Func(inner) => inner.position.clone(),
            Token::Const(inner) => inner.position.clone(),
            Token::Var(inner) => inner.position.clone(),
            Token::For(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Float(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::RawString(inner) => inner.position.clone(),
            Token::Rune(inner) => inner.position.clone(),
            Token::Define(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::DoubleEquals(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::LessThan(inner) => inner.position.clone(),
            Token::GreaterThan(inner) => inner.position.clone(),
            Token::LessEquals(inner) => inner.position.clone(),
            Token::GreaterEquals(inner) => inner.position.clone(),
            Token::Increment(inner) => inner.position.clone(),
            Token::Decrement(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::Dot(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Package(_) => "keyword 'package'".to_string(),
            Token::Import(_) => "keyword 'import'".to_string(),
            Token::Func(_) => "keyword 'func'".to_string(),
            Token::Const(_) => "keyword 'const'".to_string(),
            Token::Var(_) => "keyword 'var'".to_string(),
            Token::For(_) => "keyword 'for'".to_string(),
            Token::True(_) => "'true'".to_string(),
            Token::False(_) => "'false'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Float(inner) => format!("float literal '{}'", inner.value),
            Token::Integer(inner) => format!("integer literal '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::RawString(inner) => format!("raw string {}", inner.value),
            Token::Rune(inner) => format!("rune literal {}", inner.value),
            Token::Define(_) => "':='".to_string(),
            Token::Equals(_) => "'='".to_string(),
            Token::DoubleEquals(_) => "'=='".to_string(),
            Token::NotEquals(_) => "'!='".to_string(),
            Token::LessThan(_) => "'<'".to_string(),
            Token::GreaterThan(_) => "'>'".to_string(),
            Token::LessEquals(_) => "'<='".to_string(),
            Token::GreaterEquals(_) => "'>='".to_string(),
            Token::Increment(_) => "'++'".to_string(),
            Token::Decrement(_) => "'--'".to_string(),
            Token::Plus(_) => "'+'".to_string(),
            Token::Minus(_) => "'-'".to_string(),
            Token::Star(_) => "'*'".to_string(),
            Token::Slash(_) => "'/'".to_string(),
            Token::Comma(_) => "','".to_string(),
            // Most semicolons are inserted at line ends, so name the newline too.
            Token::Semicolon(_) => "';' (or newline)".to_string(),
            Token::Dot(_) => "'.'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBrace(_) => "'{'".to_string(),
            Token::RBrace(_) => "'}'".to_string(),
        }
    }
}

/// Blank out `//` line comments and `/* */` block comments.
///
/// Every comment character is replaced by a space and newlines are kept, so
/// spans computed on the result still point at the right line and column.
/// Comment markers inside string, raw string and rune literals are left alone.
pub fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Code,
        LineComment,
        BlockComment,
        Quoted(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut mode = Mode::Code;

    while let Some(c) = chars.next() {
        match mode {
            Mode::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::BlockComment;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    mode = Mode::Quoted(c);
                }
                _ => out.push(c),
            },
            Mode::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    mode = Mode::Code;
                } else {
                    out.push(' ');
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            Mode::Quoted(quote) => {
                out.push(c);
                if c == '\\' && quote != '`' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    mode = Mode::Code;
                }
            }
        }
    }

    out
}

/// Rewrite source text into the form the tokenizer expects.
pub fn prepare(source: &str) -> String {
    insert_semicolons(&strip_comments(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comments_but_keeps_newlines() {
        let stripped = strip_comments("a := 1 // note\nb := 2\n");
        let lines: Vec<&str> = stripped.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].trim_end(), "a := 1");
        assert_eq!(lines[0].len(), "a := 1 // note".len());
        assert_eq!(lines[1], "b := 2");
    }

    #[test]
    fn strips_block_comments_across_lines() {
        let stripped = strip_comments("x /* one\ntwo */ y");
        assert_eq!(stripped.lines().count(), 2);
        assert!(!stripped.contains("one"));
        assert!(!stripped.contains("two"));
        assert!(stripped.ends_with(" y"));
    }

    #[test]
    fn leaves_comment_markers_inside_strings() {
        let source = r#"fmt.Println("http://example.com", '/', `/* raw */`)"#;
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let source = r#""say \"//hi\"" // gone"#;
        let stripped = strip_comments(source);
        assert!(stripped.starts_with(r#""say \"//hi\"""#));
        assert!(!stripped.contains("gone"));
    }
}
