use gobasics::ast::Program;
use gobasics::ast::expression::{BinOpKind, Expression, UnaryOpKind};
use gobasics::ast::statement::Statement;
use gobasics::lexer::{Token, prepare};
use gobasics::parser::{ParseError, ParseState, parse};

fn parse_program(input: &str) -> Program<()> {
    let tokens = Token::lex(&prepare(input)).expect("lexing failed");
    let mut state = ParseState::new(tokens);
    let (program, errors) = parse(&mut state);
    if !errors.is_empty() {
        panic!("parsing failed: {}", errors[0]);
    }
    program.expect("parsing failed: no program")
}

fn parse_errors(input: &str) -> Vec<ParseError> {
    let tokens = Token::lex(&prepare(input)).expect("lexing failed");
    let mut state = ParseState::new(tokens);
    let (_, errors) = parse(&mut state);
    errors
}

fn single_expression(input: &str) -> Expression<()> {
    let program = parse_program(input);
    match program.body.into_iter().next() {
        Some(Statement::Expression(expr)) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn parse_hello_world_file() {
    let program = parse_program(
        r#"
package main

import "fmt"

func main() {
    fmt.Println("Hello, world!")
}
"#,
    );

    assert_eq!(program.package.as_ref().map(|p| p.value.as_str()), Some("main"));
    assert_eq!(program.imports.len(), 1);
    assert_eq!(program.imports[0].path, "fmt");
    assert!(program.main.is_some());
    assert_eq!(program.body.len(), 1);

    let Statement::Expression(Expression::Call(call)) = &program.body[0] else {
        panic!("expected call statement");
    };
    assert_eq!(call.func.package.as_deref(), Some("fmt"));
    assert_eq!(call.func.name, "Println");
    assert!(matches!(&call.args[0], Expression::String(s) if s.value == "Hello, world!"));
}

#[test]
fn parse_grouped_imports() {
    let program = parse_program(
        r#"
package main

import (
    "fmt"
    "math/rand"
)

func main() {
    fmt.Println("Value:", rand.Int())
}
"#,
    );

    let paths: Vec<_> = program.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["fmt", "math/rand"]);
    assert_eq!(program.imports[1].name(), "rand");
}

#[test]
fn parse_script_without_package() {
    let program = parse_program("x := 1\nfmt.Println(x)\n");
    assert!(program.is_script());
    assert!(program.main.is_none());
    assert_eq!(program.body.len(), 2);
    assert!(matches!(program.body[0], Statement::ShortVarDecl(_)));
}

#[test]
fn parse_typed_const_with_two_names() {
    let program = parse_program("const price, tax float32 = 275, 27.50\n");
    let Statement::Const(decl) = &program.body[0] else {
        panic!("expected const declaration");
    };
    assert!(!decl.grouped);
    let spec = &decl.specs[0];
    let names: Vec<_> = spec.names.iter().map(|n| n.value.as_str()).collect();
    assert_eq!(names, vec!["price", "tax"]);
    assert_eq!(spec.ty.as_ref().map(|t| t.name.as_str()), Some("float32"));
    assert_eq!(spec.values.len(), 2);
    assert!(matches!(&spec.values[1], Expression::Float(f) if f.value == 27.5));
}

#[test]
fn parse_const_group_assigns_iota_indices() {
    let program = parse_program("const (\n    A = iota\n    B\n    C\n)\n");
    let Statement::Const(decl) = &program.body[0] else {
        panic!("expected const declaration");
    };
    assert!(decl.grouped);
    let iotas: Vec<_> = decl.specs.iter().map(|s| s.iota).collect();
    assert_eq!(iotas, vec![0, 1, 2]);
    assert!(decl.specs[1].values.is_empty());
}

#[test]
fn parse_var_forms() {
    let program = parse_program(
        "var price float32 = 275.00\nvar a, b float64\nvar name = \"Alice\"\n",
    );
    assert_eq!(program.body.len(), 3);

    let Statement::Var(typed) = &program.body[0] else {
        panic!("expected var declaration");
    };
    assert_eq!(typed.specs[0].values.len(), 1);

    let Statement::Var(zeroed) = &program.body[1] else {
        panic!("expected var declaration");
    };
    assert_eq!(zeroed.specs[0].names.len(), 2);
    assert!(zeroed.specs[0].values.is_empty());

    let Statement::Var(inferred) = &program.body[2] else {
        panic!("expected var declaration");
    };
    assert!(inferred.specs[0].ty.is_none());
}

#[test]
fn var_without_type_or_value_is_an_error() {
    let errors = parse_errors("var x\n");
    assert!(!errors.is_empty());
}

#[test]
fn parse_assignment_and_inc_dec() {
    let program = parse_program("price = 300\ni++\nj--\n");
    assert!(matches!(&program.body[0], Statement::Assignment(a) if a.targets[0].value == "price"));
    assert!(matches!(&program.body[1], Statement::IncDec(i) if i.increment));
    assert!(matches!(&program.body[2], Statement::IncDec(i) if !i.increment));
}

#[test]
fn parse_counter_loop() {
    let program = parse_program("for i := 0; i < 5; i++ {\n    fmt.Println(i)\n}\n");
    let Statement::For(for_loop) = &program.body[0] else {
        panic!("expected for loop");
    };
    assert!(matches!(for_loop.init.as_deref(), Some(Statement::ShortVarDecl(_))));
    assert!(matches!(&for_loop.condition, Expression::BinaryOp(b) if b.op == BinOpKind::Lt));
    assert!(matches!(for_loop.post.as_deref(), Some(Statement::IncDec(_))));
    assert_eq!(for_loop.body.len(), 1);
}

#[test]
fn parse_condition_only_loop() {
    let program = parse_program("for i < 5 {\n    i++\n}\n");
    let Statement::For(for_loop) = &program.body[0] else {
        panic!("expected for loop");
    };
    assert!(for_loop.init.is_none());
    assert!(for_loop.post.is_none());
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let expr = single_expression("a + b * c\n");
    let Expression::BinaryOp(add) = expr else {
        panic!("expected binary op");
    };
    assert_eq!(add.op, BinOpKind::Add);
    assert!(matches!(&*add.right, Expression::BinaryOp(m) if m.op == BinOpKind::Mul));
}

#[test]
fn parentheses_group_subexpressions() {
    let expr = single_expression("quantity * (price + tax)\n");
    let Expression::BinaryOp(mul) = &expr else {
        panic!("expected binary op");
    };
    assert_eq!(mul.op, BinOpKind::Mul);
    assert!(matches!(&*mul.right, Expression::BinaryOp(a) if a.op == BinOpKind::Add));
    assert_eq!(expr.to_string(), "quantity * (price + tax)");
}

#[test]
fn subtraction_is_left_associative() {
    let expr = single_expression("a - b - c\n");
    assert_eq!(expr.to_string(), "a - b - c");
    let Expression::BinaryOp(outer) = expr else {
        panic!("expected binary op");
    };
    assert!(matches!(&*outer.left, Expression::BinaryOp(_)));
    assert!(matches!(&*outer.right, Expression::Ident(_)));
}

#[test]
fn unary_minus() {
    let expr = single_expression("-x\n");
    assert!(matches!(expr, Expression::UnaryOp(u) if u.op == UnaryOpKind::Neg));
}

#[test]
fn conversion_is_a_call_without_package() {
    let expr = single_expression("float32(x)\n");
    assert!(matches!(&expr, Expression::Call(c) if c.func.package.is_none() && c.func.name == "float32"));
}

#[test]
fn selector_without_call_is_an_error() {
    let errors = parse_errors("x := fmt.Println\n");
    assert!(!errors.is_empty());
}

#[test]
fn errors_in_several_statements_are_all_reported() {
    let errors = parse_errors("x := )\ny := 1\nz := *\n");
    assert_eq!(errors.len(), 2);
}

#[test]
fn integer_literal_beyond_constant_range_is_reported() {
    let errors = parse_errors("x := 1000000000000000000000000000000000000000000\nfmt.Println(x)\n");
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].message.contains("integer constant too large"),
        "unexpected error: {}",
        errors[0]
    );
}

#[test]
fn non_ascii_byte_escape_in_string_is_reported() {
    let errors = parse_errors("fmt.Println(\"\\xff\")\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("byte escape"), "unexpected error: {}", errors[0]);
}

#[test]
fn ascii_byte_escapes_in_strings_decode() {
    let expr = single_expression("fmt.Println(\"\\x41\\102\")\n");
    let Expression::Call(call) = &expr else {
        panic!("expected call, got {:?}", expr);
    };
    assert!(matches!(&call.args[0], Expression::String(s) if s.value == "AB"));
}
