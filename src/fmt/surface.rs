//! Pretty printer for gobasics source code
//!
//! Display implementations for the syntax tree. Expressions print with the
//! minimal parentheses their precedence needs; diagnostics use this to quote
//! the offending expression. Programs print in canonical layout with tab
//! indentation, which is what `gobasics fmt` writes.

use std::fmt::{self, Display};

use crate::ast::{
    Program,
    expression::{BinaryOp, Call, Expression, UnaryOp},
    statement::{ConstSpec, ForLoop, Statement, TypeName, VarSpec},
};

const INDENT: &str = "\t";

/// Binds tighter than any binary operator.
const UNARY_PRECEDENCE: u8 = 6;

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

impl<T> Display for Program<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();

        if let Some(package) = &self.package {
            formatter.write_str("package ");
            formatter.write_str(&package.value);
            formatter.write_newline();
            formatter.write_newline();
        }

        match self.imports.as_slice() {
            [] => {}
            [single] => {
                formatter.write_str(&format!("import {:?}", single.path));
                formatter.write_newline();
                formatter.write_newline();
            }
            imports => {
                formatter.write_str("import (");
                formatter.write_newline();
                for import in imports {
                    formatter.write_str(INDENT);
                    formatter.write_str(&format!("{:?}", import.path));
                    formatter.write_newline();
                }
                formatter.write_str(")");
                formatter.write_newline();
                formatter.write_newline();
            }
        }

        match &self.main {
            Some(main) => {
                formatter.write_str(&format!("func {}() ", main.name.value));
                format_block(&self.body, &mut formatter);
                formatter.write_newline();
            }
            None => {
                for stmt in &self.body {
                    format_statement(stmt, &mut formatter);
                    formatter.write_newline();
                }
            }
        }

        write!(f, "{}", formatter.finish())
    }
}

impl<T> Display for Statement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_statement(self, &mut formatter);
        write!(f, "{}", formatter.finish())
    }
}

impl<T> Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_expression(self, &mut formatter, 0);
        write!(f, "{}", formatter.finish())
    }
}

impl<T> Display for BinaryOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_binary_op(self, &mut formatter, 0);
        write!(f, "{}", formatter.finish())
    }
}

impl<T> Display for UnaryOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        format_unary_op(self, &mut formatter, 0);
        write!(f, "{}", formatter.finish())
    }
}

fn format_block<T>(stmts: &[Statement<T>], fmt: &mut Formatter) {
    fmt.write_str("{");
    fmt.write_newline();

    fmt.indent();
    for stmt in stmts {
        format_statement(stmt, fmt);
        fmt.write_newline();
    }
    fmt.dedent();

    fmt.write_indent();
    fmt.write_str("}");
}

fn format_statement<T>(stmt: &Statement<T>, fmt: &mut Formatter) {
    fmt.write_indent();
    format_simple_statement(stmt, fmt);
}

/// A statement without leading indentation, as it appears in a `for` header.
fn format_simple_statement<T>(stmt: &Statement<T>, fmt: &mut Formatter) {
    match stmt {
        Statement::Const(decl) if decl.grouped => {
            fmt.write_str("const (");
            fmt.write_newline();
            fmt.indent();
            for spec in &decl.specs {
                fmt.write_indent();
                format_const_spec(spec, fmt);
                fmt.write_newline();
            }
            fmt.dedent();
            fmt.write_indent();
            fmt.write_str(")");
        }
        Statement::Const(decl) => {
            fmt.write_str("const ");
            if let Some(spec) = decl.specs.first() {
                format_const_spec(spec, fmt);
            }
        }
        Statement::Var(decl) if decl.grouped => {
            fmt.write_str("var (");
            fmt.write_newline();
            fmt.indent();
            for spec in &decl.specs {
                fmt.write_indent();
                format_var_spec(spec, fmt);
                fmt.write_newline();
            }
            fmt.dedent();
            fmt.write_indent();
            fmt.write_str(")");
        }
        Statement::Var(decl) => {
            fmt.write_str("var ");
            if let Some(spec) = decl.specs.first() {
                format_var_spec(spec, fmt);
            }
        }
        Statement::ShortVarDecl(decl) => {
            format_names(decl.names.iter().map(|n| n.value.as_str()), fmt);
            fmt.write_str(" := ");
            format_expression_list(&decl.values, fmt);
        }
        Statement::Assignment(assign) => {
            format_names(assign.targets.iter().map(|n| n.value.as_str()), fmt);
            fmt.write_str(" = ");
            format_expression_list(&assign.values, fmt);
        }
        Statement::IncDec(inc) => {
            fmt.write_str(&inc.target.value);
            fmt.write_str(if inc.increment { "++" } else { "--" });
        }
        Statement::For(for_loop) => format_for_loop(for_loop, fmt),
        Statement::Expression(expr) => format_expression(expr, fmt, 0),
    }
}

fn format_spec_tail<T>(ty: &Option<TypeName>, values: &[Expression<T>], fmt: &mut Formatter) {
    if let Some(ty) = ty {
        fmt.write_str(" ");
        fmt.write_str(&ty.name);
    }
    if !values.is_empty() {
        fmt.write_str(" = ");
        format_expression_list(values, fmt);
    }
}

fn format_const_spec<T>(spec: &ConstSpec<T>, fmt: &mut Formatter) {
    format_names(spec.names.iter().map(|n| n.value.as_str()), fmt);
    format_spec_tail(&spec.ty, &spec.values, fmt);
}

fn format_var_spec<T>(spec: &VarSpec<T>, fmt: &mut Formatter) {
    format_names(spec.names.iter().map(|n| n.value.as_str()), fmt);
    format_spec_tail(&spec.ty, &spec.values, fmt);
}

fn format_names<'a>(names: impl Iterator<Item = &'a str>, fmt: &mut Formatter) {
    for (i, name) in names.enumerate() {
        if i > 0 {
            fmt.write_str(", ");
        }
        fmt.write_str(name);
    }
}

fn format_for_loop<T>(for_loop: &ForLoop<T>, fmt: &mut Formatter) {
    fmt.write_str("for ");
    if for_loop.init.is_some() || for_loop.post.is_some() {
        if let Some(init) = &for_loop.init {
            format_simple_statement(init, fmt);
        }
        fmt.write_str("; ");
        format_expression(&for_loop.condition, fmt, 0);
        fmt.write_str(";");
        if let Some(post) = &for_loop.post {
            fmt.write_str(" ");
            format_simple_statement(post, fmt);
        }
    } else {
        format_expression(&for_loop.condition, fmt, 0);
    }
    fmt.write_str(" ");
    format_block(&for_loop.body, fmt);
}

fn format_expression_list<T>(exprs: &[Expression<T>], fmt: &mut Formatter) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            fmt.write_str(", ");
        }
        format_expression(expr, fmt, 0);
    }
}

fn format_expression<T>(expr: &Expression<T>, fmt: &mut Formatter, precedence: u8) {
    match expr {
        Expression::Ident(ident) => fmt.write_str(&ident.value),
        Expression::Integer(int) => fmt.write_str(&int.value.to_string()),
        Expression::Float(float) => fmt.write_str(&float.literal),
        Expression::String(s) => fmt.write_str(&format!("{:?}", s.value)),
        Expression::Rune(r) => fmt.write_str(&format!("{:?}", r.value)),
        Expression::Boolean(b) => fmt.write_str(if b.value { "true" } else { "false" }),
        Expression::Call(call) => format_call(call, fmt),
        Expression::BinaryOp(binop) => format_binary_op(binop, fmt, precedence),
        Expression::UnaryOp(unop) => format_unary_op(unop, fmt, precedence),
    }
}

fn format_call<T>(call: &Call<T>, fmt: &mut Formatter) {
    fmt.write_str(&call.func.to_string());
    fmt.write_str("(");
    format_expression_list(&call.args, fmt);
    fmt.write_str(")");
}

fn format_binary_op<T>(binop: &BinaryOp<T>, fmt: &mut Formatter, parent_prec: u8) {
    let op_prec = binop.op.precedence();
    let needs_parens = op_prec < parent_prec;

    if needs_parens {
        fmt.write_str("(");
    }

    format_expression(&binop.left, fmt, op_prec);
    fmt.write_str(" ");
    fmt.write_str(binop.op.symbol());
    fmt.write_str(" ");
    format_expression(&binop.right, fmt, op_prec + 1);

    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_unary_op<T>(unop: &UnaryOp<T>, fmt: &mut Formatter, parent_prec: u8) {
    let needs_parens = UNARY_PRECEDENCE < parent_prec;

    if needs_parens {
        fmt.write_str("(");
    }

    // `-(-x)`, never `--x`
    let operand_prec = match &*unop.operand {
        Expression::UnaryOp(_) => UNARY_PRECEDENCE + 1,
        _ => UNARY_PRECEDENCE,
    };
    fmt.write_str(unop.op.symbol());
    format_expression(&unop.operand, fmt, operand_prec);

    if needs_parens {
        fmt.write_str(")");
    }
}
