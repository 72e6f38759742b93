use lachs::Span;

use crate::ast::expression::{Expression, Ident};

#[derive(Debug, Clone)]
pub enum Statement<T> {
    Const(ConstDecl<T>),
    Var(VarDecl<T>),
    ShortVarDecl(ShortVarDecl<T>),
    Assignment(Assignment<T>),
    IncDec(IncDec<T>),
    For(ForLoop<T>),
    Expression(Expression<T>),
}

impl<T> Statement<T> {
    pub fn position(&self) -> Span {
        match self {
            Statement::Const(c) => c.position.clone(),
            Statement::Var(v) => v.position.clone(),
            Statement::ShortVarDecl(s) => s.position.clone(),
            Statement::Assignment(a) => a.position.clone(),
            Statement::IncDec(i) => i.position.clone(),
            Statement::For(f) => f.position.clone(),
            Statement::Expression(e) => e.position(),
        }
    }
}

/// A type written in a declaration, e.g. `float32` in `var price float32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub position: Span,
}

/// `const a, b T = x, y` or a parenthesized group of specs.
#[derive(Debug, Clone)]
pub struct ConstDecl<T> {
    pub specs: Vec<ConstSpec<T>>,
    pub grouped: bool,
    pub position: Span,
}

/// One line of a const declaration. Inside a group, a spec with no values
/// repeats the type and expressions of the spec before it.
#[derive(Debug, Clone)]
pub struct ConstSpec<T> {
    pub names: Vec<Ident<T>>,
    pub ty: Option<TypeName>,
    pub values: Vec<Expression<T>>,
    /// Position within the group; the value of `iota` for this spec.
    pub iota: usize,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct VarDecl<T> {
    pub specs: Vec<VarSpec<T>>,
    pub grouped: bool,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct VarSpec<T> {
    pub names: Vec<Ident<T>>,
    pub ty: Option<TypeName>,
    pub values: Vec<Expression<T>>,
    pub position: Span,
}

/// `a, b := x, y`
#[derive(Debug, Clone)]
pub struct ShortVarDecl<T> {
    pub names: Vec<Ident<T>>,
    pub values: Vec<Expression<T>>,
    pub position: Span,
}

/// `a, b = x, y`
#[derive(Debug, Clone)]
pub struct Assignment<T> {
    pub targets: Vec<Ident<T>>,
    pub values: Vec<Expression<T>>,
    pub position: Span,
}

/// `i++` or `i--`
#[derive(Debug, Clone)]
pub struct IncDec<T> {
    pub target: Ident<T>,
    pub increment: bool,
    pub position: Span,
}

/// `for init; condition; post { body }` or `for condition { body }`
#[derive(Debug, Clone)]
pub struct ForLoop<T> {
    pub init: Option<Box<Statement<T>>>,
    pub condition: Expression<T>,
    pub post: Option<Box<Statement<T>>>,
    pub body: Vec<Statement<T>>,
    pub position: Span,
}
