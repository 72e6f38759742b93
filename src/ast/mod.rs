use lachs::Span;

use crate::ast::expression::Ident;
use crate::ast::statement::Statement;

pub mod expression;
pub mod statement;

/// A parsed source file.
///
/// Files with a `package` clause are full Go files whose body is the block of
/// `func main`. Files without one are scripts: a bare list of statements.
#[derive(Debug, Clone)]
pub struct Program<T> {
    pub package: Option<Ident<()>>,
    pub imports: Vec<Import>,
    pub main: Option<MainFunction>,
    pub body: Vec<Statement<T>>,
}

impl<T> Program<T> {
    pub fn is_script(&self) -> bool {
        self.package.is_none()
    }
}

/// An import path such as `"math/rand"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub position: Span,
}

impl Import {
    /// The name the package is referred to by: the last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// The `func <name>()` header that owns the program body.
#[derive(Debug, Clone)]
pub struct MainFunction {
    pub name: Ident<()>,
    pub position: Span,
}
