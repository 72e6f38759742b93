//! # Statement and Expression Checking
//!
//! The checker walks the parsed body of `main` once, in source order, and
//! rebuilds it with a [`TypeInfo`] on every expression:
//!
//! - literals start out as untyped constants;
//! - an untyped operand meeting a typed one is converted to that type, which
//!   must be lossless (`2.0` fits `int`, `2.5` does not);
//! - two typed operands of an operator must have identical types, otherwise
//!   the operation is a type mismatch;
//! - operations on constants are folded, so constant expressions carry their
//!   exact value all the way to the interpreter.
//!
//! Errors are collected rather than returned early. Expressions that failed
//! to check get the `Invalid` type, which silences errors that would only be
//! consequences of the first one.

use std::collections::HashMap;

use lachs::Span;
use tracing::trace;

use crate::ast::expression::{
    BinOpKind, BinaryOp, Boolean, Call, Expression, Float, Ident, Integer, RuneLiteral,
    StringLiteral, UnaryOp, UnaryOpKind,
};
use crate::ast::statement::{
    Assignment, ConstDecl, ConstSpec, ForLoop, IncDec, ShortVarDecl, Statement, TypeName, VarDecl,
    VarSpec,
};

use super::builtin::Builtin;
use super::constant::{Constant, FoldError, Lossy};
use super::error::TypeError;
use super::scope::{Binding, BindingKind, Scopes};
use super::ty::{Type, UntypedKind};

/// What the checker knows about an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub ty: Type,
    /// Exact value when the expression is constant.
    pub constant: Option<Constant>,
}

impl TypeInfo {
    pub fn value(ty: Type) -> Self {
        TypeInfo { ty, constant: None }
    }

    pub fn constant(ty: Type, value: Constant) -> Self {
        TypeInfo {
            ty,
            constant: Some(value),
        }
    }

    pub fn invalid() -> Self {
        TypeInfo::value(Type::Invalid)
    }
}

/// Result of checking a body.
#[derive(Debug)]
pub struct CheckOutput {
    pub body: Vec<Statement<TypeInfo>>,
    pub errors: Vec<TypeError>,
    /// Every binding that was declared, in declaration order.
    pub bindings: Vec<Binding>,
    /// Package names that were referenced.
    pub used_packages: Vec<String>,
}

pub struct Checker {
    scopes: Scopes,
    errors: Vec<TypeError>,
    /// Index of the const spec being checked; `iota` is only valid there.
    iota: Option<usize>,
    /// Packages available to the body, and whether they were referenced.
    packages: HashMap<String, bool>,
}

impl Checker {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Checker {
            scopes: Scopes::new(),
            errors: vec![],
            iota: None,
            packages: packages.into_iter().map(|p| (p.into(), false)).collect(),
        }
    }

    pub fn check_body(mut self, body: Vec<Statement<()>>) -> CheckOutput {
        let body = body.into_iter().map(|s| self.statement(s)).collect();

        let mut used_packages: Vec<String> = self
            .packages
            .iter()
            .filter(|(_, used)| **used)
            .map(|(name, _)| name.clone())
            .collect();
        used_packages.sort();

        CheckOutput {
            body,
            errors: self.errors,
            bindings: self.scopes.into_bindings(),
            used_packages,
        }
    }

    fn error(&mut self, err: TypeError) {
        trace!(error = %err.message(), "type error");
        self.errors.push(err);
    }

    // === Statements ===

    fn statement(&mut self, stmt: Statement<()>) -> Statement<TypeInfo> {
        match stmt {
            Statement::Const(decl) => Statement::Const(self.const_decl(decl)),
            Statement::Var(decl) => Statement::Var(self.var_decl(decl)),
            Statement::ShortVarDecl(decl) => Statement::ShortVarDecl(self.short_var_decl(decl)),
            Statement::Assignment(assign) => Statement::Assignment(self.assignment(assign)),
            Statement::IncDec(inc) => Statement::IncDec(self.inc_dec(inc)),
            Statement::For(for_loop) => Statement::For(self.for_loop(for_loop)),
            Statement::Expression(expr) => {
                let expr = self.expr(expr);
                let is_call = match &expr {
                    Expression::Call(call) => !is_conversion(call),
                    _ => false,
                };
                if !is_call && !expr.info().ty.is_invalid() {
                    self.error(TypeError::NotUsed {
                        operand: describe(&expr),
                        span: expr.position(),
                    });
                }
                Statement::Expression(expr)
            }
        }
    }

    fn const_decl(&mut self, decl: ConstDecl<()>) -> ConstDecl<TypeInfo> {
        let mut previous: Option<(Option<TypeName>, Vec<Expression<()>>)> = None;
        let mut specs = vec![];

        for spec in decl.specs {
            let ConstSpec {
                names,
                ty,
                values,
                iota,
                position,
            } = spec;

            // Inside a group, a bare list of names repeats the previous spec.
            let (ty, values) = if values.is_empty() && ty.is_none() && decl.grouped {
                match &previous {
                    Some(prev) => prev.clone(),
                    None => (None, vec![]),
                }
            } else {
                previous = Some((ty.clone(), values.clone()));
                (ty, values)
            };

            let target = ty.as_ref().map(|t| self.resolve_type(t));

            self.iota = Some(iota);
            let mut values: Vec<_> = values.into_iter().map(|v| self.expr(v)).collect();
            self.iota = None;

            if names.len() > values.len() {
                self.error(TypeError::MissingInit {
                    span: position.clone(),
                });
            } else if names.len() < values.len() {
                self.error(TypeError::ExtraInit {
                    span: position.clone(),
                });
            }

            for value in values.iter_mut() {
                let ty = value.info().ty;
                if ty.is_invalid() {
                    continue;
                }
                if ty == Type::Void {
                    self.no_value(value);
                    continue;
                }
                if value.info().constant.is_none() {
                    self.error(TypeError::NotConstant {
                        operand: describe(value),
                        span: value.position(),
                    });
                    value.info_mut().ty = Type::Invalid;
                    continue;
                }
                if let Some(target) = target {
                    self.assign(value, target, "constant declaration");
                }
            }

            let mut typed_names = vec![];
            for (i, name) in names.into_iter().enumerate() {
                let info = values
                    .get(i)
                    .map(|v| v.info().clone())
                    .unwrap_or_else(TypeInfo::invalid);
                let binding = match &info.constant {
                    Some(value) if !info.ty.is_invalid() => {
                        Binding::constant(&name.value, value.clone(), info.ty, name.position.clone())
                    }
                    _ => Binding::variable(&name.value, Type::Invalid, name.position.clone()),
                };
                self.declare(&name, binding);
                typed_names.push(with_info(name, info));
            }

            specs.push(ConstSpec {
                names: typed_names,
                ty,
                values,
                iota,
                position,
            });
        }

        ConstDecl {
            specs,
            grouped: decl.grouped,
            position: decl.position,
        }
    }

    fn var_decl(&mut self, decl: VarDecl<()>) -> VarDecl<TypeInfo> {
        let mut specs = vec![];

        for spec in decl.specs {
            let target = spec.ty.as_ref().map(|t| self.resolve_type(t));
            let mut values: Vec<_> = spec.values.into_iter().map(|v| self.expr(v)).collect();

            if !values.is_empty() && values.len() != spec.names.len() {
                self.error(TypeError::AssignmentMismatch {
                    variables: spec.names.len(),
                    values: values.len(),
                    span: spec.position.clone(),
                });
            }

            for value in values.iter_mut() {
                match target {
                    Some(target) => {
                        self.assign(value, target, "variable declaration");
                    }
                    None => {
                        self.default_type(value, "variable declaration");
                    }
                }
            }

            let mut names = vec![];
            for (i, name) in spec.names.into_iter().enumerate() {
                let ty = match target {
                    Some(target) => target,
                    None => values.get(i).map(|v| v.info().ty).unwrap_or(Type::Invalid),
                };
                let binding = Binding::variable(&name.value, ty, name.position.clone());
                self.declare(&name, binding);
                names.push(with_info(name, TypeInfo::value(ty)));
            }

            specs.push(VarSpec {
                names,
                ty: spec.ty,
                values,
                position: spec.position,
            });
        }

        VarDecl {
            specs,
            grouped: decl.grouped,
            position: decl.position,
        }
    }

    fn short_var_decl(&mut self, decl: ShortVarDecl<()>) -> ShortVarDecl<TypeInfo> {
        let ShortVarDecl {
            names,
            values,
            position,
        } = decl;

        let mut values: Vec<_> = values.into_iter().map(|v| self.expr(v)).collect();

        if values.len() != names.len() {
            self.error(TypeError::AssignmentMismatch {
                variables: names.len(),
                values: values.len(),
                span: position.clone(),
            });
        }

        let has_new = names
            .iter()
            .any(|n| !n.is_blank() && self.scopes.lookup_local(&n.value).is_none());
        if !has_new {
            self.error(TypeError::NoNewVariables {
                span: position.clone(),
            });
        }

        let mut typed_names: Vec<Ident<TypeInfo>> = vec![];
        for (i, name) in names.into_iter().enumerate() {
            let repeated = !name.is_blank() && typed_names.iter().any(|n| n.value == name.value);
            if repeated {
                self.error(TypeError::Redeclared {
                    name: name.value.clone(),
                    span: name.position.clone(),
                });
            }

            let existing = if name.is_blank() {
                None
            } else {
                self.scopes.lookup_local(&name.value)
            };

            let ty = match (values.get_mut(i), existing) {
                (Some(value), Some(id)) => {
                    let binding = self.scopes.get(id).clone();
                    if binding.is_constant() {
                        self.cannot_assign(&name, &binding);
                        binding.ty
                    } else {
                        self.assign(value, binding.ty, "assignment");
                        binding.ty
                    }
                }
                (Some(value), None) => self.default_type(value, "assignment"),
                (None, Some(id)) => self.scopes.get(id).ty,
                (None, None) => Type::Invalid,
            };

            if existing.is_none() && !repeated {
                let binding = Binding::variable(&name.value, ty, name.position.clone());
                self.declare(&name, binding);
            }
            typed_names.push(with_info(name, TypeInfo::value(ty)));
        }

        ShortVarDecl {
            names: typed_names,
            values,
            position,
        }
    }

    fn assignment(&mut self, assign: Assignment<()>) -> Assignment<TypeInfo> {
        let Assignment {
            targets,
            values,
            position,
        } = assign;

        let mut values: Vec<_> = values.into_iter().map(|v| self.expr(v)).collect();

        if values.len() != targets.len() {
            self.error(TypeError::AssignmentMismatch {
                variables: targets.len(),
                values: values.len(),
                span: position.clone(),
            });
        }

        let mut typed_targets = vec![];
        for (i, target) in targets.into_iter().enumerate() {
            let ty = if target.is_blank() {
                match values.get_mut(i) {
                    Some(value) => self.default_type(value, "assignment"),
                    None => Type::Invalid,
                }
            } else {
                match self.scopes.lookup(&target.value) {
                    None => {
                        self.error(TypeError::undefined(&target.value, target.position.clone()));
                        Type::Invalid
                    }
                    Some(id) => {
                        let binding = self.scopes.get(id).clone();
                        if binding.is_constant() {
                            self.cannot_assign(&target, &binding);
                        } else if let Some(value) = values.get_mut(i) {
                            self.assign(value, binding.ty, "assignment");
                        }
                        binding.ty
                    }
                }
            };
            typed_targets.push(with_info(target, TypeInfo::value(ty)));
        }

        Assignment {
            targets: typed_targets,
            values,
            position,
        }
    }

    fn inc_dec(&mut self, inc: IncDec<()>) -> IncDec<TypeInfo> {
        let IncDec {
            target,
            increment,
            position,
        } = inc;

        let ty = match self.scopes.lookup(&target.value) {
            _ if target.is_blank() => {
                self.error(TypeError::BlankAsValue {
                    span: target.position.clone(),
                });
                Type::Invalid
            }
            None => {
                self.error(TypeError::undefined(&target.value, target.position.clone()));
                Type::Invalid
            }
            Some(id) => {
                let binding = self.scopes.get(id).clone();
                if binding.is_constant() {
                    self.cannot_assign(&target, &binding);
                } else if !binding.ty.is_numeric() && !binding.ty.is_invalid() {
                    self.error(TypeError::invalid_operation(
                        format!(
                            "{}{} (non-numeric type {})",
                            target.value,
                            if increment { "++" } else { "--" },
                            binding.ty
                        ),
                        position.clone(),
                    ));
                }
                binding.ty
            }
        };

        IncDec {
            target: with_info(target, TypeInfo::value(ty)),
            increment,
            position,
        }
    }

    fn for_loop(&mut self, for_loop: ForLoop<()>) -> ForLoop<TypeInfo> {
        let ForLoop {
            init,
            condition,
            post,
            body,
            position,
        } = for_loop;

        self.scopes.enter();

        let init = init.map(|s| Box::new(self.statement(*s)));

        let mut condition = self.expr(condition);
        let cond_ty = condition.info().ty;
        if cond_ty == Type::Untyped(UntypedKind::Bool) {
            let _ = set_type(&mut condition, Type::BOOL);
        } else if cond_ty != Type::BOOL && !cond_ty.is_invalid() {
            self.error(TypeError::NonBoolCondition {
                operand: describe(&condition),
                span: condition.position(),
            });
        }

        let post = post.map(|s| {
            if let Statement::ShortVarDecl(decl) = s.as_ref() {
                self.error(TypeError::DeclarationInPost {
                    span: decl.position.clone(),
                });
            }
            Box::new(self.statement(*s))
        });

        self.scopes.enter();
        let body = body.into_iter().map(|s| self.statement(s)).collect();
        self.scopes.leave();

        self.scopes.leave();

        ForLoop {
            init,
            condition,
            post,
            body,
            position,
        }
    }

    // === Declarations and assignability ===

    fn declare(&mut self, name: &Ident<()>, binding: Binding) {
        if name.is_blank() {
            return;
        }
        let poisoned = binding.ty.is_invalid();
        match self.scopes.declare(binding) {
            Ok(id) if poisoned => self.scopes.mark_used(id),
            Ok(_) => {}
            Err(_) => self.error(TypeError::Redeclared {
                name: name.value.clone(),
                span: name.position.clone(),
            }),
        }
    }

    fn cannot_assign(&mut self, name: &Ident<()>, binding: &Binding) {
        let detail = match &binding.kind {
            BindingKind::Constant(value) => constant_detail(&name.value, value, binding.ty),
            BindingKind::Variable => format!("variable of type {}", binding.ty),
        };
        self.error(TypeError::CannotAssign {
            operand: format!("{} ({})", name.value, detail),
            span: name.position.clone(),
        });
    }

    fn resolve_type(&mut self, name: &TypeName) -> Type {
        match Type::from_name(&name.name) {
            Some(ty) => ty,
            None => {
                self.error(TypeError::undefined(&name.name, name.position.clone()));
                Type::Invalid
            }
        }
    }

    fn no_value(&mut self, value: &mut Expression<TypeInfo>) {
        self.error(TypeError::NoValue {
            expr: value.to_string(),
            span: value.position(),
        });
        value.info_mut().ty = Type::Invalid;
    }

    /// Make `value` usable where a `target` is required. Returns whether it is.
    fn assign(
        &mut self,
        value: &mut Expression<TypeInfo>,
        target: Type,
        context: &'static str,
    ) -> bool {
        let ty = value.info().ty;
        if ty.is_invalid() || target.is_invalid() {
            return false;
        }
        if ty == Type::Void {
            self.no_value(value);
            return false;
        }

        let reason = match ty {
            Type::Untyped(kind) if untyped_fits(kind, target) => match set_type(value, target) {
                Ok(()) => return true,
                Err(reason) => Some(reason),
            },
            _ if ty == target => return true,
            _ => None,
        };

        self.error(TypeError::CannotUse {
            operand: describe(value),
            target,
            context,
            reason,
            span: value.position(),
        });
        false
    }

    /// Give an untyped value its default type and return the resulting type.
    fn default_type(&mut self, value: &mut Expression<TypeInfo>, context: &'static str) -> Type {
        let ty = value.info().ty;
        match ty {
            Type::Untyped(kind) => {
                let target = kind.default_type();
                if self.assign(value, target, context) {
                    target
                } else {
                    Type::Invalid
                }
            }
            Type::Void => {
                self.no_value(value);
                Type::Invalid
            }
            other => other,
        }
    }

    // === Expressions ===

    pub fn expr(&mut self, expr: Expression<()>) -> Expression<TypeInfo> {
        match expr {
            Expression::Integer(Integer {
                value, position, ..
            }) => Expression::Integer(Integer {
                value,
                position,
                info: TypeInfo::constant(Type::Untyped(UntypedKind::Int), Constant::Int(value)),
            }),
            Expression::Float(Float {
                value,
                literal,
                position,
                ..
            }) => Expression::Float(Float {
                value,
                literal,
                position,
                info: TypeInfo::constant(Type::Untyped(UntypedKind::Float), Constant::Float(value)),
            }),
            Expression::String(StringLiteral {
                value, position, ..
            }) => {
                let info =
                    TypeInfo::constant(Type::Untyped(UntypedKind::String), Constant::String(value.clone()));
                Expression::String(StringLiteral {
                    value,
                    position,
                    info,
                })
            }
            Expression::Rune(RuneLiteral {
                value, position, ..
            }) => Expression::Rune(RuneLiteral {
                value,
                position,
                info: TypeInfo::constant(
                    Type::Untyped(UntypedKind::Rune),
                    Constant::Int(value as i128),
                ),
            }),
            Expression::Boolean(Boolean {
                value, position, ..
            }) => Expression::Boolean(Boolean {
                value,
                position,
                info: TypeInfo::constant(Type::Untyped(UntypedKind::Bool), Constant::Bool(value)),
            }),
            Expression::Ident(ident) => {
                let info = self.ident(&ident);
                Expression::Ident(with_info(ident, info))
            }
            Expression::Call(call) => Expression::Call(self.call(call)),
            Expression::BinaryOp(op) => Expression::BinaryOp(self.binary(op)),
            Expression::UnaryOp(op) => Expression::UnaryOp(self.unary(op)),
        }
    }

    fn ident(&mut self, ident: &Ident<()>) -> TypeInfo {
        if ident.is_blank() {
            self.error(TypeError::BlankAsValue {
                span: ident.position.clone(),
            });
            return TypeInfo::invalid();
        }

        if let Some(id) = self.scopes.lookup(&ident.value) {
            self.scopes.mark_used(id);
            let binding = self.scopes.get(id);
            return match &binding.kind {
                BindingKind::Constant(value) => TypeInfo::constant(binding.ty, value.clone()),
                BindingKind::Variable => TypeInfo::value(binding.ty),
            };
        }

        if let (Some(iota), "iota") = (self.iota, ident.value.as_str()) {
            return TypeInfo::constant(Type::Untyped(UntypedKind::Int), Constant::Int(iota as i128));
        }

        self.error(TypeError::undefined(&ident.value, ident.position.clone()));
        TypeInfo::invalid()
    }

    fn call(&mut self, call: Call<()>) -> Call<TypeInfo> {
        let Call {
            func,
            args,
            position,
            ..
        } = call;

        let mut args: Vec<_> = args.into_iter().map(|a| self.expr(a)).collect();

        let info = match &func.package {
            None => match Type::from_name(&func.name) {
                Some(_) if self.scopes.lookup(&func.name).is_some() => {
                    self.error(TypeError::invalid_operation(
                        format!("cannot call non-function {}", func.name),
                        func.position.clone(),
                    ));
                    TypeInfo::invalid()
                }
                Some(target) => self.conversion(target, &mut args, &position),
                None => {
                    self.error(TypeError::undefined(&func.name, func.position.clone()));
                    TypeInfo::invalid()
                }
            },
            Some(package) => match self.packages.get_mut(package) {
                None => {
                    self.error(TypeError::undefined(package, func.position.clone()));
                    TypeInfo::invalid()
                }
                Some(used) => {
                    *used = true;
                    match Builtin::lookup(package, &func.name) {
                        Some(builtin) => self.builtin_call(builtin, &mut args, &position),
                        None => {
                            self.error(TypeError::undefined(func.to_string(), func.position.clone()));
                            TypeInfo::invalid()
                        }
                    }
                }
            },
        };

        Call {
            func,
            args,
            position,
            info,
        }
    }

    fn builtin_call(
        &mut self,
        builtin: Builtin,
        args: &mut [Expression<TypeInfo>],
        position: &Span,
    ) -> TypeInfo {
        if let Some(expected) = builtin.arity() {
            if args.len() != expected {
                self.error(TypeError::ArgumentCount {
                    func: builtin.name().to_string(),
                    expected,
                    found: args.len(),
                    span: position.clone(),
                });
                return TypeInfo::invalid();
            }
        }

        let context = match builtin {
            Builtin::Println => "argument to fmt.Println",
            Builtin::RandInt => "argument to rand.Int",
        };
        for arg in args.iter_mut() {
            self.default_type(arg, context);
        }

        TypeInfo::value(builtin.result())
    }

    /// `T(x)`: numeric values convert between numeric types, anything
    /// converts to its own type. Constant arguments must be representable.
    fn conversion(
        &mut self,
        target: Type,
        args: &mut [Expression<TypeInfo>],
        position: &Span,
    ) -> TypeInfo {
        if args.len() != 1 {
            self.error(TypeError::ArgumentCount {
                func: target.to_string(),
                expected: 1,
                found: args.len(),
                span: position.clone(),
            });
            return TypeInfo::invalid();
        }
        let arg = &mut args[0];

        let ty = arg.info().ty;
        if ty.is_invalid() {
            return TypeInfo::invalid();
        }
        if ty == Type::Void {
            self.no_value(arg);
            return TypeInfo::invalid();
        }

        let convertible = (ty.is_numeric() && target.is_numeric())
            || (ty.is_bool() && target.is_bool())
            || (ty.is_string() && target.is_string());
        if !convertible {
            self.error(TypeError::CannotConvert {
                operand: describe(arg),
                target,
                reason: None,
                span: arg.position(),
            });
            return TypeInfo::invalid();
        }

        let Some(value) = arg.info().constant.clone() else {
            if let Type::Untyped(kind) = ty {
                let _ = set_type(arg, kind.default_type());
            }
            return TypeInfo::value(target);
        };

        match value.convert_to(&target) {
            Ok(converted) => {
                // the argument itself keeps a typed representation
                if let Type::Untyped(_) = ty {
                    let _ = set_type(arg, target);
                }
                TypeInfo::constant(target, converted)
            }
            Err(reason) => {
                self.error(TypeError::CannotConvert {
                    operand: describe(arg),
                    target,
                    reason: Some(reason),
                    span: arg.position(),
                });
                TypeInfo::invalid()
            }
        }
    }

    fn unary(&mut self, op: UnaryOp<()>) -> UnaryOp<TypeInfo> {
        let UnaryOp {
            op: kind,
            operand,
            position,
            ..
        } = op;

        let mut node = UnaryOp {
            op: kind,
            operand: Box::new(self.expr(*operand)),
            position,
            info: TypeInfo::invalid(),
        };

        let ty = node.operand.info().ty;
        if ty.is_invalid() {
            return node;
        }
        if ty == Type::Void {
            self.no_value(&mut node.operand);
            return node;
        }
        if !ty.is_numeric() {
            self.error(TypeError::invalid_operation(
                format!(
                    "operator {} not defined on {}",
                    kind.symbol(),
                    describe(&node.operand)
                ),
                node.position.clone(),
            ));
            return node;
        }

        node.info = match (&node.operand.info().constant, kind) {
            (None, _) => TypeInfo::value(ty),
            (Some(value), UnaryOpKind::Plus) => TypeInfo::constant(ty, value.clone()),
            (Some(value), UnaryOpKind::Neg) => match value.negate(&ty) {
                Ok(negated) => TypeInfo::constant(ty, negated),
                Err(_) => {
                    let raw = value.negate(&Type::Invalid).ok();
                    self.overflow(&node.to_string(), raw, ty, node.position.clone());
                    TypeInfo::invalid()
                }
            },
        };
        node
    }

    fn binary(&mut self, op: BinaryOp<()>) -> BinaryOp<TypeInfo> {
        let BinaryOp {
            op: kind,
            left,
            right,
            position,
            ..
        } = op;

        let mut node = BinaryOp {
            op: kind,
            left: Box::new(self.expr(*left)),
            right: Box::new(self.expr(*right)),
            position,
            info: TypeInfo::invalid(),
        };
        node.info = self.binary_info(&mut node);
        node
    }

    fn binary_info(&mut self, node: &mut BinaryOp<TypeInfo>) -> TypeInfo {
        let (lt, rt) = (node.left.info().ty, node.right.info().ty);
        if lt.is_invalid() || rt.is_invalid() {
            return TypeInfo::invalid();
        }
        if lt == Type::Void {
            self.no_value(&mut node.left);
            return TypeInfo::invalid();
        }
        if rt == Type::Void {
            self.no_value(&mut node.right);
            return TypeInfo::invalid();
        }

        let Some(ty) = self.match_operands(node) else {
            return TypeInfo::invalid();
        };

        let op = node.op;
        let defined = if op.is_ordering() {
            ty.is_ordered()
        } else if op.is_comparison() {
            true
        } else if op == BinOpKind::Add {
            ty.is_numeric() || ty.is_string()
        } else {
            ty.is_numeric()
        };
        if !defined {
            self.error(TypeError::invalid_operation(
                format!(
                    "operator {} not defined on {}",
                    op.symbol(),
                    describe(&node.left)
                ),
                node.position.clone(),
            ));
            return TypeInfo::invalid();
        }

        let left_const = node.left.info().constant.clone();
        let right_const = node.right.info().constant.clone();

        if op == BinOpKind::Div
            && (ty.is_integer() || left_const.is_some())
            && right_const.as_ref().is_some_and(Constant::is_zero)
        {
            self.error(TypeError::DivisionByZero {
                span: node.right.position(),
            });
            return TypeInfo::invalid();
        }

        let result = if op.is_comparison() {
            Type::Untyped(UntypedKind::Bool)
        } else {
            ty
        };

        let (Some(lhs), Some(rhs)) = (left_const, right_const) else {
            return TypeInfo::value(result);
        };

        match Constant::binary(op, &lhs, &rhs, &result) {
            Ok(value) => TypeInfo::constant(result, value),
            Err(FoldError::DivisionByZero) => {
                self.error(TypeError::DivisionByZero {
                    span: node.right.position(),
                });
                TypeInfo::invalid()
            }
            Err(FoldError::Overflow) => {
                let raw = Constant::binary(op, &lhs, &rhs, &Type::Invalid).ok();
                self.overflow(&node.to_string(), raw, result, node.position.clone());
                TypeInfo::invalid()
            }
            Err(FoldError::Undefined) => TypeInfo::invalid(),
        }
    }

    /// Bring both operands of a binary operation to one type.
    fn match_operands(&mut self, node: &mut BinaryOp<TypeInfo>) -> Option<Type> {
        let (lt, rt) = (node.left.info().ty, node.right.info().ty);

        match (lt, rt) {
            (Type::Untyped(a), Type::Untyped(b)) => {
                if a.is_numeric() && b.is_numeric() {
                    let common = Type::Untyped(a.max(b));
                    let _ = set_type(&mut node.left, common);
                    let _ = set_type(&mut node.right, common);
                    Some(common)
                } else if a == b {
                    Some(lt)
                } else {
                    self.error(TypeError::mismatch(node.to_string(), lt, rt, node.position.clone()));
                    None
                }
            }
            (Type::Untyped(kind), target) => {
                self.convert_operand(node, true, kind, target).then_some(target)
            }
            (target, Type::Untyped(kind)) => {
                self.convert_operand(node, false, kind, target).then_some(target)
            }
            _ if lt == rt => Some(lt),
            _ => {
                self.error(TypeError::mismatch(node.to_string(), lt, rt, node.position.clone()));
                None
            }
        }
    }

    /// Convert the untyped side of `node` to the type of the other side.
    fn convert_operand(
        &mut self,
        node: &mut BinaryOp<TypeInfo>,
        left_is_untyped: bool,
        kind: UntypedKind,
        target: Type,
    ) -> bool {
        if !untyped_fits(kind, target) {
            let (lt, rt) = (node.left.info().ty, node.right.info().ty);
            self.error(TypeError::mismatch(node.to_string(), lt, rt, node.position.clone()));
            return false;
        }

        let operand = if left_is_untyped {
            &mut node.left
        } else {
            &mut node.right
        };
        match set_type(operand, target) {
            Ok(()) => true,
            Err(reason) => {
                let err = TypeError::ConstantConversion {
                    operand: describe(operand),
                    target,
                    reason,
                    span: operand.position(),
                };
                self.error(err);
                false
            }
        }
    }

    fn overflow(&mut self, expr: &str, raw: Option<Constant>, target: Type, span: Span) {
        let operand = match raw {
            Some(value) => format!("{} ({})", expr, constant_detail(expr, &value, target)),
            None => expr.to_string(),
        };
        self.error(TypeError::ConstantOverflow {
            operand,
            target,
            span,
        });
    }
}

fn with_info<T>(ident: Ident<()>, info: T) -> Ident<T> {
    Ident {
        value: ident.value,
        position: ident.position,
        info,
    }
}

fn is_conversion<T>(call: &Call<T>) -> bool {
    call.func.package.is_none() && Type::from_name(&call.func.name).is_some()
}

/// Whether an untyped value of `kind` can become a value of `target` at all.
fn untyped_fits(kind: UntypedKind, target: Type) -> bool {
    match kind {
        UntypedKind::Int | UntypedKind::Rune | UntypedKind::Float => target.is_numeric(),
        UntypedKind::Bool => target.is_bool(),
        UntypedKind::String => target.is_string(),
    }
}

/// Retype an expression. Constants are converted and must stay exact.
fn set_type(expr: &mut Expression<TypeInfo>, target: Type) -> Result<(), Lossy> {
    let info = expr.info_mut();
    if let Some(value) = &info.constant {
        info.constant = Some(value.convert_to(&target)?);
    }
    info.ty = target;
    Ok(())
}

fn constant_detail(text: &str, value: &Constant, ty: Type) -> String {
    let literal = value.to_string();
    match ty {
        Type::Untyped(kind) if literal == text => format!("untyped {} constant", kind.name()),
        Type::Untyped(kind) => format!("untyped {} constant {}", kind.name(), literal),
        _ if literal == text => format!("constant of type {}", ty),
        _ => format!("constant {} of type {}", literal, ty),
    }
}

/// Describe an operand the way diagnostics refer to it, e.g.
/// `price (constant 275 of type float32)` or `x (variable of type int)`.
pub fn describe(expr: &Expression<TypeInfo>) -> String {
    let text = expr.to_string();
    let info = expr.info();
    let detail = match (&info.constant, info.ty) {
        (Some(value), ty) => constant_detail(&text, value, ty),
        (None, Type::Untyped(kind)) => format!("untyped {} value", kind.name()),
        (None, ty) if matches!(expr, Expression::Ident(_)) => format!("variable of type {}", ty),
        (None, ty) => format!("value of type {}", ty),
    };
    format!("{} ({})", text, detail)
}
