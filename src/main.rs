use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug};

use gobasics::interpreter::{RunConfig, RuntimeError};
use gobasics::{Diagnostics, check_source, parse_source, run_source};

#[derive(Debug, Parser)]
#[command(name = "gobasics")]
#[command(about = "Check and run basic Go programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a program and run it
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Seed for `rand.Int`
        #[arg(long, default_value = "1")]
        seed: u64,
    },
    /// Only run the static checks
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print a program in canonical layout
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn execute(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run { file, seed } => {
            let source = read_source(&file)?;
            debug!(file = %file.display(), seed, "run");
            let mut out = io::stdout().lock();
            run_source(&source, &RunConfig { seed }, &mut out)
        }
        Command::Check { file } => {
            let source = read_source(&file)?;
            check_source(&source)?;
            Ok(())
        }
        Command::Fmt { file } => {
            let source = read_source(&file)?;
            let program = parse_source(&source)?;
            let mut out = io::stdout().lock();
            write!(out, "{}", program).context("failed to write formatted program")?;
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(diagnostics) = err.downcast_ref::<Diagnostics>() {
                eprintln!("{}", diagnostics);
                ExitCode::from(1)
            } else if let Some(runtime) = err.downcast_ref::<RuntimeError>() {
                eprintln!("{}", runtime);
                ExitCode::from(2)
            } else {
                eprintln!("error: {:#}", err);
                ExitCode::from(1)
            }
        }
    }
}
