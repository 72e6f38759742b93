//! Automatic semicolon insertion.
//!
//! Statements are terminated by `;`, but source files rarely spell them out.
//! A semicolon is appended to every line whose last token could end a
//! statement: an identifier or keyword, a literal, a closing bracket, `++` or
//! `--`. This is also why an opening brace must stay on the line of the `func`
//! or `for` it belongs to.

/// Append `;` to every line that ends with a statement-terminating token.
///
/// Expects comments to have been removed already (see
/// [`strip_comments`](super::strip_comments)).
pub fn insert_semicolons(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 16);
    let mut in_raw_string = false;

    for (index, line) in source.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }

        in_raw_string = scan_raw_state(line, in_raw_string);
        let (content, carriage_return) = match line.strip_suffix('\r') {
            Some(content) => (content, true),
            None => (line, false),
        };

        out.push_str(content);
        if !in_raw_string && ends_statement(content.trim_end()) {
            out.push(';');
        }
        if carriage_return {
            out.push('\r');
        }
    }

    out
}

/// Track whether a raw string literal is still open at the end of `line`.
fn scan_raw_state(line: &str, mut in_raw_string: bool) -> bool {
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_raw_string {
            if c == '`' {
                in_raw_string = false;
            }
            continue;
        }

        match quote {
            Some(q) => {
                if c == '\\' {
                    chars.next();
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '`' => in_raw_string = true,
                '"' | '\'' => quote = Some(c),
                _ => {}
            },
        }
    }

    in_raw_string
}

fn ends_statement(trimmed: &str) -> bool {
    if trimmed.ends_with("++") || trimmed.ends_with("--") {
        return true;
    }

    let mut tail = trimmed.chars().rev();
    match tail.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => true,
        Some('"' | '\'' | '`' | ')' | ']' | '}') => true,
        // `275.` is a float literal
        Some('.') => tail.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminates_simple_statements() {
        let source = "package main\nimport \"fmt\"\nfunc main() {\n\tfmt.Println(1)\n}\n";
        let expected =
            "package main;\nimport \"fmt\";\nfunc main() {\n\tfmt.Println(1);\n};\n";
        assert_eq!(insert_semicolons(source), expected);
    }

    #[test]
    fn leaves_continuation_lines_alone() {
        let source = "x := 1 +\n  2\n";
        assert_eq!(insert_semicolons(source), "x := 1 +\n  2;\n");
    }

    #[test]
    fn brace_on_next_line_gets_a_semicolon_after_signature() {
        let source = "func main()\n{\n}";
        assert_eq!(insert_semicolons(source), "func main();\n{\n};");
    }

    #[test]
    fn handles_increment_and_float_endings() {
        assert_eq!(insert_semicolons("i++\nx := 275."), "i++;\nx := 275.;");
    }

    #[test]
    fn does_not_terminate_inside_raw_string() {
        let source = "s := `first\nsecond`\n";
        assert_eq!(insert_semicolons(source), "s := `first\nsecond`;\n");
    }

    #[test]
    fn keeps_carriage_returns() {
        assert_eq!(insert_semicolons("x := 1\r\ny := 2"), "x := 1;\r\ny := 2;");
    }
}
