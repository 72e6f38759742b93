//! Tree-walking interpreter for checked programs
//!
//! Executes the body of a [`Program<TypeInfo>`] statement by statement over a
//! stack of scope frames. Program output goes to the writer passed to
//! [`run`]; nothing is printed directly.

mod builtins;
mod error;
mod eval;
mod scope;
mod value;

pub use error::RuntimeError;
pub use scope::Scope;
pub use value::{OpError, RValue};

use std::io::Write;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::ast::Program;
use crate::types::TypeInfo;

/// Settings for one run of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Seed of the generator behind `rand.Int`.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig { seed: 1 }
    }
}

/// Execution state shared by every statement.
pub struct Env<'a> {
    pub scope: Scope,
    pub rng: ChaCha20Rng,
    pub out: &'a mut dyn Write,
    executed: usize,
}

impl<'a> Env<'a> {
    pub fn new(config: &RunConfig, out: &'a mut dyn Write) -> Self {
        Env {
            scope: Scope::new(),
            rng: ChaCha20Rng::seed_from_u64(config.seed),
            out,
            executed: 0,
        }
    }

    /// Statements executed so far, loop iterations included.
    pub fn executed(&self) -> usize {
        self.executed
    }
}

/// Run a checked program, writing its output to `out`.
pub fn run(
    program: &Program<TypeInfo>,
    config: &RunConfig,
    out: &mut impl Write,
) -> Result<(), RuntimeError> {
    debug!(seed = config.seed, statements = program.body.len(), "running program");

    let mut env = Env::new(config, out);
    let result = program.body.iter().try_for_each(|stmt| stmt.exec(&mut env));
    env.out.flush()?;

    debug!(executed = env.executed(), ok = result.is_ok(), "program finished");
    result
}
