//! # gobasics - a checked interpreter for basic Go programs
//!
//! gobasics runs small Go programs built from constants, variables, `iota`,
//! arithmetic, a counting `for` loop and `fmt.Println`. Programs are checked
//! the way the Go compiler checks them before anything runs: mixing typed
//! operands of different types, lossy constant conversions and unused
//! variables are all rejected, and a rejected program produces no output.
//!
//! ## Pipeline
//!
//! ```text
//! Source Code (String)
//!     ↓
//! [lexer::prepare] → comments blanked, semicolons inserted
//!     ↓
//! [Lexer] → Token Stream
//!     ↓
//! [Parser] → Surface AST (ast::Program<()>)
//!     ↓
//! [Validation + Type Checking] → Typed AST (ast::Program<TypeInfo>)
//!     ↓
//! [Interpreter] → program output on a writer
//! ```
//!
//! Constant expressions are folded exactly during checking, so the typed AST
//! carries the value of every constant. The interpreter only computes what
//! depends on variables.
//!
//! ## Module Structure
//!
//! - [`lexer`] - Tokenization using lachs
//! - [`ast`] - Syntax tree, generic over per-node information
//! - [`parser`] - Parsing using combinator-based grammar
//! - [`types`] - Types, constants, checking and program validation
//! - [`interpreter`] - Runtime evaluation and execution
//! - [`fmt`] - Value formatting and pretty-printing
//!
//! ## Example Program
//!
//! ```go
//! package main
//!
//! import "fmt"
//!
//! func main() {
//!     const price, tax float32 = 275, 27.50
//!     const quantity = 2
//!     fmt.Println("Total:", quantity*(price+tax))
//! }
//! ```
//!
//! prints `Total: 605`.

pub mod ast;
pub mod fmt;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod types;

use std::io::Write;

use tracing::debug;

use interpreter::RunConfig;
use lexer::Token;
use parser::ParseState;
use types::TypeInfo;

/// Type alias for a parsed program with no additional type information
pub type ParsedProgram = ast::Program<()>;

/// Type alias for a program that passed every static check
pub type CheckedProgram = ast::Program<TypeInfo>;

/// Every problem found in a source file before it could run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub messages: Vec<String>,
}

impl Diagnostics {
    pub fn from_errors<E: ToString>(errors: impl IntoIterator<Item = E>) -> Self {
        Diagnostics {
            messages: errors.into_iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join("\n"))
    }
}

impl std::error::Error for Diagnostics {}

/// Lex and parse a source file.
pub fn parse_source(source: &str) -> anyhow::Result<ParsedProgram> {
    let prepared = lexer::prepare(source);
    let tokens = Token::lex(&prepared).map_err(|err| Diagnostics::from_errors([err]))?;
    debug!(tokens = tokens.len(), "lexed source");

    let mut state = ParseState::new(tokens);
    let (program, errors) = parser::parse(&mut state);

    match program {
        Some(program) if errors.is_empty() => {
            debug!(statements = program.body.len(), "parsed program");
            Ok(program)
        }
        _ => Err(Diagnostics::from_errors(errors).into()),
    }
}

/// Run every static check on a source file.
pub fn check_source(source: &str) -> anyhow::Result<CheckedProgram> {
    let program = parse_source(source)?;
    let checked = types::validate_and_type_check(program).map_err(Diagnostics::from_errors)?;
    debug!("program passed static checks");
    Ok(checked)
}

/// Check and run a source file, writing program output to `out`.
///
/// Static errors surface as [`Diagnostics`], runtime panics as
/// [`interpreter::RuntimeError`]; nothing is written when checking fails.
pub fn run_source(source: &str, config: &RunConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let program = check_source(source)?;
    interpreter::run(&program, config, out)?;
    Ok(())
}
