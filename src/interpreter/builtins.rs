use std::io::Write;

use rand::Rng;

use crate::types::{BasicKind, Builtin};

use super::Env;
use super::error::RuntimeError;
use super::value::RValue;

impl Builtin {
    /// Call a package function with already evaluated arguments.
    pub fn invoke(&self, args: Vec<RValue>, env: &mut Env<'_>) -> Result<RValue, RuntimeError> {
        match self {
            Builtin::Println => {
                let line = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(env.out, "{}", line)?;
                Ok(RValue::Unit)
            }
            Builtin::RandInt => {
                let value = env.rng.gen_range(0..=i64::MAX);
                Ok(RValue::Int(value as i128, BasicKind::Int))
            }
        }
    }
}
