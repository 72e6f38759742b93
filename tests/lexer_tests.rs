use gobasics::lexer::{Token, insert_semicolons, prepare};

#[test]
fn lex_keywords() {
    let tokens = Token::lex("package import func const var for").unwrap();
    assert_eq!(tokens.len(), 6);
    assert!(matches!(tokens[0], Token::Package(_)));
    assert!(matches!(tokens[1], Token::Import(_)));
    assert!(matches!(tokens[2], Token::Func(_)));
    assert!(matches!(tokens[3], Token::Const(_)));
    assert!(matches!(tokens[4], Token::Var(_)));
    assert!(matches!(tokens[5], Token::For(_)));
}

#[test]
fn lex_identifiers() {
    let tokens = Token::lex("price inStock _ tax2").unwrap();
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::Ident(i) if i.value == "price"));
    assert!(matches!(&tokens[1], Token::Ident(i) if i.value == "inStock"));
    assert!(matches!(&tokens[2], Token::Ident(i) if i.value == "_"));
    assert!(matches!(&tokens[3], Token::Ident(i) if i.value == "tax2"));
}

#[test]
fn lex_keyword_prefix_is_identifier() {
    let tokens = Token::lex("format variable").unwrap();
    assert!(matches!(&tokens[0], Token::Ident(i) if i.value == "format"));
    assert!(matches!(&tokens[1], Token::Ident(i) if i.value == "variable"));
}

#[test]
fn lex_numbers() {
    let tokens = Token::lex("42 275.00 1e6 0x1F 27.").unwrap();
    assert_eq!(tokens.len(), 5);
    assert!(matches!(&tokens[0], Token::Integer(i) if i.value == "42"));
    assert!(matches!(&tokens[1], Token::Float(f) if f.value == "275.00"));
    assert!(matches!(&tokens[2], Token::Float(f) if f.value == "1e6"));
    assert!(matches!(&tokens[3], Token::Integer(i) if i.value == "0x1F"));
    assert!(matches!(&tokens[4], Token::Float(f) if f.value == "27."));
}

#[test]
fn lex_string_and_rune_literals() {
    let tokens = Token::lex(r#""Hello, world!" "say \"hi\"" `raw` 'a'"#).unwrap();
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::StringLiteral(s) if s.value == "\"Hello, world!\""));
    assert!(matches!(&tokens[1], Token::StringLiteral(s) if s.value == r#""say \"hi\"""#));
    assert!(matches!(&tokens[2], Token::RawString(s) if s.value == "`raw`"));
    assert!(matches!(&tokens[3], Token::Rune(r) if r.value == "'a'"));
}

#[test]
fn lex_rune_escape_forms() {
    let tokens = Token::lex(r"'\n' '\x41' '\101' '\U0001F600' '\''").unwrap();
    let runes: Vec<_> = tokens
        .iter()
        .map(|t| match t {
            Token::Rune(r) => r.value.as_str(),
            other => panic!("expected rune, found {}", other.describe()),
        })
        .collect();
    assert_eq!(
        runes,
        vec![r"'\n'", r"'\x41'", r"'\101'", r"'\U0001F600'", r"'\''"]
    );
}

#[test]
fn lex_operators() {
    let tokens = Token::lex(":= = == != < > <= >= ++ -- + - * /").unwrap();
    assert_eq!(tokens.len(), 14);
    assert!(matches!(tokens[0], Token::Define(_)));
    assert!(matches!(tokens[1], Token::Equals(_)));
    assert!(matches!(tokens[2], Token::DoubleEquals(_)));
    assert!(matches!(tokens[3], Token::NotEquals(_)));
    assert!(matches!(tokens[4], Token::LessThan(_)));
    assert!(matches!(tokens[5], Token::GreaterThan(_)));
    assert!(matches!(tokens[6], Token::LessEquals(_)));
    assert!(matches!(tokens[7], Token::GreaterEquals(_)));
    assert!(matches!(tokens[8], Token::Increment(_)));
    assert!(matches!(tokens[9], Token::Decrement(_)));
    assert!(matches!(tokens[10], Token::Plus(_)));
    assert!(matches!(tokens[11], Token::Minus(_)));
    assert!(matches!(tokens[12], Token::Star(_)));
    assert!(matches!(tokens[13], Token::Slash(_)));
}

#[test]
fn lex_punctuation() {
    let tokens = Token::lex("fmt.Println(a, b); { }").unwrap();
    assert!(matches!(tokens[1], Token::Dot(_)));
    assert!(matches!(tokens[3], Token::LParen(_)));
    assert!(matches!(tokens[5], Token::Comma(_)));
    assert!(matches!(tokens[7], Token::RParen(_)));
    assert!(matches!(tokens[8], Token::Semicolon(_)));
    assert!(matches!(tokens[9], Token::LBrace(_)));
    assert!(matches!(tokens[10], Token::RBrace(_)));
}

#[test]
fn semicolons_follow_statement_ends() {
    let source = "x := 1\ny++\nfmt.Println(x)\nfor i := 0; i < 5; i++ {\n}\n";
    let expected = "x := 1;\ny++;\nfmt.Println(x);\nfor i := 0; i < 5; i++ {\n};\n";
    assert_eq!(insert_semicolons(source), expected);
}

#[test]
fn no_semicolon_after_operators_or_open_brackets() {
    let source = "x := 1 +\n\t2\nimport (\n\t\"fmt\"\n)\n";
    let expected = "x := 1 +\n\t2;\nimport (\n\t\"fmt\";\n);\n";
    assert_eq!(insert_semicolons(source), expected);
}

#[test]
fn prepare_drops_comments_before_inserting_semicolons() {
    let prepared = prepare("x := 1 // one\n/* block */ y := 2\n");
    let tokens = Token::lex(&prepared).unwrap();
    let semicolons = tokens
        .iter()
        .filter(|t| matches!(t, Token::Semicolon(_)))
        .count();
    assert_eq!(semicolons, 2);
    assert!(!tokens.iter().any(|t| matches!(t, Token::Slash(_))));
}
