use lachs::Span;

#[derive(Debug, Clone)]
pub enum Expression<T> {
    Ident(Ident<T>),
    Integer(Integer<T>),
    Float(Float<T>),
    String(StringLiteral<T>),
    Rune(RuneLiteral<T>),
    Boolean(Boolean<T>),
    Call(Call<T>),
    BinaryOp(BinaryOp<T>),
    UnaryOp(UnaryOp<T>),
}

impl<T> Expression<T> {
    pub fn position(&self) -> Span {
        match self {
            Expression::Ident(i) => i.position.clone(),
            Expression::Integer(i) => i.position.clone(),
            Expression::Float(f) => f.position.clone(),
            Expression::String(s) => s.position.clone(),
            Expression::Rune(r) => r.position.clone(),
            Expression::Boolean(b) => b.position.clone(),
            Expression::Call(c) => c.position.clone(),
            Expression::BinaryOp(b) => b.position.clone(),
            Expression::UnaryOp(u) => u.position.clone(),
        }
    }

    pub fn info(&self) -> &T {
        match self {
            Expression::Ident(i) => &i.info,
            Expression::Integer(i) => &i.info,
            Expression::Float(f) => &f.info,
            Expression::String(s) => &s.info,
            Expression::Rune(r) => &r.info,
            Expression::Boolean(b) => &b.info,
            Expression::Call(c) => &c.info,
            Expression::BinaryOp(b) => &b.info,
            Expression::UnaryOp(u) => &u.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut T {
        match self {
            Expression::Ident(i) => &mut i.info,
            Expression::Integer(i) => &mut i.info,
            Expression::Float(f) => &mut f.info,
            Expression::String(s) => &mut s.info,
            Expression::Rune(r) => &mut r.info,
            Expression::Boolean(b) => &mut b.info,
            Expression::Call(c) => &mut c.info,
            Expression::BinaryOp(b) => &mut b.info,
            Expression::UnaryOp(u) => &mut u.info,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ident<T> {
    pub value: String,
    pub position: Span,
    pub info: T,
}

impl<T> Ident<T> {
    /// Whether this is the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.value == "_"
    }
}

#[derive(Debug, Clone)]
pub struct Integer<T> {
    pub value: i128,
    pub position: Span,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct Float<T> {
    pub value: f64,
    /// Literal text as written, kept for diagnostics and formatting.
    pub literal: String,
    pub position: Span,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct StringLiteral<T> {
    pub value: String,
    pub position: Span,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct RuneLiteral<T> {
    pub value: char,
    pub position: Span,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct Boolean<T> {
    pub value: bool,
    pub position: Span,
    pub info: T,
}

/// The callee of a call: `Println` in `fmt.Println`, or a type name in a
/// conversion such as `float32(x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub package: Option<String>,
    pub name: String,
    pub position: Span,
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}.{}", package, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Call<T> {
    pub func: QualifiedName,
    pub args: Vec<Expression<T>>,
    pub position: Span,
    pub info: T,
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Eq => "==",
            BinOpKind::NotEq => "!=",
            BinOpKind::Lt => "<",
            BinOpKind::Gt => ">",
            BinOpKind::LtEq => "<=",
            BinOpKind::GtEq => ">=",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinOpKind::Mul | BinOpKind::Div => 5,
            BinOpKind::Add | BinOpKind::Sub => 4,
            _ => 3,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.precedence() == 3
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinOpKind::Lt | BinOpKind::Gt | BinOpKind::LtEq | BinOpKind::GtEq
        )
    }
}

/// Unary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
    Plus,
}

impl UnaryOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOpKind::Neg => "-",
            UnaryOpKind::Plus => "+",
        }
    }
}

/// Binary operation expression
#[derive(Debug, Clone)]
pub struct BinaryOp<T> {
    pub op: BinOpKind,
    pub left: Box<Expression<T>>,
    pub right: Box<Expression<T>>,
    pub position: Span,
    pub info: T,
}

/// Unary operation expression
#[derive(Debug, Clone)]
pub struct UnaryOp<T> {
    pub op: UnaryOpKind,
    pub operand: Box<Expression<T>>,
    pub position: Span,
    pub info: T,
}
