use lachs::Span;
use tracing::trace;

use crate::ast::expression::{BinOpKind, BinaryOp, Call, Expression, Ident, UnaryOp, UnaryOpKind};
use crate::ast::statement::{ForLoop, Statement};
use crate::types::{Builtin, Constant, Type, TypeInfo};

use super::Env;
use super::error::RuntimeError;
use super::value::{OpError, RValue};

fn op_error(err: OpError, what: &str, span: Span) -> RuntimeError {
    match err {
        OpError::DivisionByZero => RuntimeError::DivisionByZero { span },
        OpError::Unsupported => RuntimeError::internal(format!("unsupported {}", what), span),
    }
}

impl Expression<TypeInfo> {
    pub fn eval(&self, env: &mut Env<'_>) -> Result<RValue, RuntimeError> {
        let info = self.info();
        if let Some(constant) = &info.constant {
            return Ok(RValue::from_constant(constant, info.ty));
        }

        match self {
            Expression::Ident(ident) => env
                .scope
                .resolve(&ident.value)
                .cloned()
                .ok_or_else(|| {
                    RuntimeError::internal(
                        format!("unbound name {}", ident.value),
                        ident.position.clone(),
                    )
                }),
            Expression::Integer(int) => Ok(RValue::from_constant(&Constant::Int(int.value), info.ty)),
            Expression::Float(float) => {
                Ok(RValue::from_constant(&Constant::Float(float.value), info.ty))
            }
            Expression::Rune(rune) => Ok(RValue::from_constant(
                &Constant::Int(rune.value as i128),
                info.ty,
            )),
            Expression::String(s) => Ok(RValue::String(s.value.clone())),
            Expression::Boolean(b) => Ok(RValue::Bool(b.value)),
            Expression::Call(call) => call.eval(env),
            Expression::BinaryOp(binop) => binop.eval(env),
            Expression::UnaryOp(unop) => unop.eval(env),
        }
    }
}

impl Call<TypeInfo> {
    fn eval(&self, env: &mut Env<'_>) -> Result<RValue, RuntimeError> {
        let args = self
            .args
            .iter()
            .map(|arg| arg.eval(env))
            .collect::<Result<Vec<_>, _>>()?;

        match &self.func.package {
            Some(package) => {
                let builtin = Builtin::lookup(package, &self.func.name).ok_or_else(|| {
                    RuntimeError::internal(
                        format!("unknown function {}", self.func),
                        self.position.clone(),
                    )
                })?;
                builtin.invoke(args, env)
            }
            None => {
                let [arg] = <[RValue; 1]>::try_from(args).map_err(|_| {
                    RuntimeError::internal("conversion takes one argument", self.position.clone())
                })?;
                arg.convert(self.info.ty)
                    .map_err(|err| op_error(err, "conversion", self.position.clone()))
            }
        }
    }
}

impl BinaryOp<TypeInfo> {
    fn eval(&self, env: &mut Env<'_>) -> Result<RValue, RuntimeError> {
        let lhs = self.left.eval(env)?;
        let rhs = self.right.eval(env)?;
        RValue::binary(self.op, lhs, rhs).map_err(|err| op_error(err, "operands", self.position.clone()))
    }
}

impl UnaryOp<TypeInfo> {
    fn eval(&self, env: &mut Env<'_>) -> Result<RValue, RuntimeError> {
        let value = self.operand.eval(env)?;
        match self.op {
            UnaryOpKind::Plus => Ok(value),
            UnaryOpKind::Neg => value
                .negate()
                .map_err(|err| op_error(err, "operand", self.position.clone())),
        }
    }
}

impl Statement<TypeInfo> {
    pub fn exec(&self, env: &mut Env<'_>) -> Result<(), RuntimeError> {
        env.executed += 1;
        trace!(statement = %self, "exec");

        match self {
            Statement::Const(decl) => {
                for spec in &decl.specs {
                    for name in &spec.names {
                        let value = match &name.info.constant {
                            Some(constant) => RValue::from_constant(constant, name.info.ty),
                            None => {
                                return Err(RuntimeError::internal(
                                    format!("constant {} has no value", name.value),
                                    name.position.clone(),
                                ));
                            }
                        };
                        bind(env, name, value);
                    }
                }
                Ok(())
            }
            Statement::Var(decl) => {
                for spec in &decl.specs {
                    let values = eval_all(&spec.values, env)?;
                    if values.is_empty() {
                        for name in &spec.names {
                            bind(env, name, RValue::zero(name.info.ty));
                        }
                    } else {
                        for (name, value) in spec.names.iter().zip(values) {
                            bind(env, name, value);
                        }
                    }
                }
                Ok(())
            }
            Statement::ShortVarDecl(decl) => {
                // names already declared in this block are reassigned in place
                let values = eval_all(&decl.values, env)?;
                for (name, value) in decl.names.iter().zip(values) {
                    bind(env, name, value);
                }
                Ok(())
            }
            Statement::Assignment(assign) => {
                let values = eval_all(&assign.values, env)?;
                for (target, value) in assign.targets.iter().zip(values) {
                    if target.is_blank() {
                        continue;
                    }
                    store(env, target, value)?;
                }
                Ok(())
            }
            Statement::IncDec(inc) => {
                let target = &inc.target;
                let current = env.scope.resolve(&target.value).cloned().ok_or_else(|| {
                    RuntimeError::internal(
                        format!("unbound name {}", target.value),
                        target.position.clone(),
                    )
                })?;
                let one = current.one_like().ok_or_else(|| {
                    RuntimeError::internal("non-numeric increment", inc.position.clone())
                })?;
                let op = if inc.increment {
                    BinOpKind::Add
                } else {
                    BinOpKind::Sub
                };
                let next = RValue::binary(op, current, one)
                    .map_err(|err| op_error(err, "increment", inc.position.clone()))?;
                store(env, target, next)
            }
            Statement::For(for_loop) => for_loop.exec(env),
            Statement::Expression(expr) => expr.eval(env).map(|_| ()),
        }
    }
}

impl ForLoop<TypeInfo> {
    fn exec(&self, env: &mut Env<'_>) -> Result<(), RuntimeError> {
        env.scope.enter();

        if let Some(init) = &self.init {
            init.exec(env)?;
        }

        loop {
            let condition = self.condition.eval(env)?;
            let proceed = condition.as_bool().ok_or_else(|| {
                RuntimeError::internal("non-boolean loop condition", self.condition.position())
            })?;
            if !proceed {
                break;
            }

            env.scope.enter();
            for stmt in &self.body {
                stmt.exec(env)?;
            }
            env.scope.leave();

            if let Some(post) = &self.post {
                post.exec(env)?;
            }
        }

        env.scope.leave();
        Ok(())
    }
}

fn eval_all(values: &[Expression<TypeInfo>], env: &mut Env<'_>) -> Result<Vec<RValue>, RuntimeError> {
    values.iter().map(|value| value.eval(env)).collect()
}

fn bind(env: &mut Env<'_>, name: &Ident<TypeInfo>, value: RValue) {
    if !name.is_blank() {
        env.scope.add(&name.value, coerce(value, name.info.ty));
    }
}

fn store(env: &mut Env<'_>, target: &Ident<TypeInfo>, value: RValue) -> Result<(), RuntimeError> {
    let value = coerce(value, target.info.ty);
    if env.scope.assign(&target.value, value) {
        Ok(())
    } else {
        Err(RuntimeError::internal(
            format!("unbound name {}", target.value),
            target.position.clone(),
        ))
    }
}

/// Give a value the declared type of the variable it is stored in.
fn coerce(value: RValue, ty: Type) -> RValue {
    match ty {
        Type::Basic(_) => value.clone().convert(ty).unwrap_or(value),
        _ => value,
    }
}
