use gobasics::lexer::{Token, prepare};
use gobasics::parser::{ParseState, parse};
use gobasics::types::validate::ValidationError;
use gobasics::types::validate_and_type_check;

/// Helper to parse and validate a program
fn validate(input: &str) -> Result<(), Vec<ValidationError>> {
    let lexed = Token::lex(&prepare(input)).expect("lexing failed");
    let mut state = ParseState::new(lexed);
    let (program, errors) = parse(&mut state);
    assert!(errors.is_empty(), "parsing failed: {}", errors[0]);
    let program = program.expect("parsing failed");
    validate_and_type_check(program).map(|_| ())
}

fn unused_names(input: &str) -> Vec<String> {
    match validate(input) {
        Ok(()) => vec![],
        Err(errors) => errors
            .into_iter()
            .filter_map(|e| match e {
                ValidationError::UnusedBinding { name, .. } => Some(name),
                _ => None,
            })
            .collect(),
    }
}

#[test]
fn test_every_binding_read() {
    let input = r#"
        price := 275.00
        const tax = 27.50
        fmt.Println(price + tax)
    "#;
    assert!(validate(input).is_ok(), "Expected validation to pass");
}

#[test]
fn test_unused_variable() {
    let input = r#"
        price := 275.00
        tax := 27.50
        fmt.Println(price)
    "#;
    assert_eq!(unused_names(input), vec!["tax"]);
}

#[test]
fn test_unread_constant_is_allowed() {
    let input = r#"
        const price, tax float32 = 275, 27.50
        fmt.Println(price)
    "#;
    assert!(validate(input).is_ok(), "Expected validation to pass");
}

#[test]
fn test_unread_iota_members_are_allowed() {
    let input = r#"
        const (
            Watersports = iota
            Soccer
            Chess
        )
        fmt.Println(Chess)
    "#;
    assert!(validate(input).is_ok(), "Expected validation to pass");
}

#[test]
fn test_unread_constant_next_to_unread_variable() {
    let input = r#"
        const limit = 10
        count := 0
        fmt.Println("done")
    "#;
    assert_eq!(unused_names(input), vec!["count"]);
}

#[test]
fn test_assignment_is_not_a_read() {
    let input = r#"
        var price float32 = 275.00
        price = 300
    "#;
    assert_eq!(unused_names(input), vec!["price"]);
}

#[test]
fn test_unused_reported_in_declaration_order() {
    let input = r#"
        a := 1
        var b, c int
        fmt.Println("nothing")
    "#;
    assert_eq!(unused_names(input), vec!["a", "b", "c"]);
}

#[test]
fn test_blank_identifier_is_exempt() {
    let input = r#"
        var _ = "Alice"
        _, total := 1, 2
        var _ float64
        fmt.Println(total)
    "#;
    assert!(validate(input).is_ok(), "Expected validation to pass");
}

#[test]
fn test_loop_variable_read_in_condition() {
    let input = r#"
        for i := 0; i < 5; i++ {
        }
    "#;
    assert!(validate(input).is_ok(), "Expected validation to pass");
}

#[test]
fn test_unused_inside_loop_body() {
    let input = r#"
        for i := 0; i < 5; i++ {
            square := i * i
        }
    "#;
    assert_eq!(unused_names(input), vec!["square"]);
}

#[test]
fn test_shadowed_outer_variable_stays_unused() {
    let input = r#"
        x := 1
        for i := 0; i < 1; i++ {
            x := 2
            fmt.Println(x)
        }
    "#;
    assert_eq!(unused_names(input), vec!["x"]);
}

#[test]
fn test_unused_message() {
    let errors = validate("x := 1\n").expect_err("expected unused binding");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("x declared but not used"));
}

#[test]
fn test_unused_import() {
    let input = r#"
package main

import (
    "fmt"
    "math/rand"
)

func main() {
    fmt.Println("no randomness")
}
"#;
    let errors = validate(input).expect_err("expected unused import");
    assert!(matches!(
        &errors[..],
        [ValidationError::UnusedImport { path, .. }] if path == "math/rand"
    ));
    assert!(errors[0].to_string().contains("\"math/rand\" imported and not used"));
}

#[test]
fn test_missing_import() {
    let input = r#"
package main

import "fmt"

func main() {
    fmt.Println(rand.Int())
}
"#;
    let errors = validate(input).expect_err("expected undefined package");
    assert!(errors.iter().any(|e| e.to_string().contains("undefined: rand")));
}

#[test]
fn test_missing_main() {
    let input = "package main\n\nimport \"fmt\"\n";
    let errors = validate(input).expect_err("expected missing main");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingMain { .. }))
    );
}
