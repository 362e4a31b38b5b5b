//! Command-line front end for the sizer flag checker.
//!
//! # Responsibility
//! - Parse arguments, read the project file, run the checks.
//! - Print findings to stdout, one per line; keep logs on stderr.
//!
//! # Invariants
//! - Findings are advisory: the exit code is zero however many there are.
//! - Only fatal input errors (unreadable file, malformed XML, wrong root
//!   element, malformed integer property) exit non-zero.

use clap::Parser;
use log::{error, info};
use sizerlint_core::{
    check_project, read_project, CheckError, Diagnostics, ReadError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Checks wxFormBuilder sizer flags for structural conflicts.
#[derive(Debug, Parser)]
#[command(name = "sizerlint", version, about)]
struct Cli {
    /// A wxFormBuilder XML project file (.fbp)
    project_file: PathBuf,

    /// Print the parsed object tree before checking
    #[arg(long)]
    dump: bool,

    /// Log level for stderr output (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

/// Fatal CLI errors; every variant exits non-zero.
#[derive(Debug)]
enum CliError {
    Logging(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Read(ReadError),
    Check(CheckError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "{message}"),
            Self::Io { path, source } => {
                write!(f, "cannot read `{}`: {source}", path.display())
            }
            Self::Read(err) => write!(f, "{err}"),
            Self::Check(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Read(err) => Some(err),
            Self::Check(err) => Some(err),
        }
    }
}

impl From<ReadError> for CliError {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

impl From<CheckError> for CliError {
    fn from(value: CheckError) -> Self {
        Self::Check(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=run_failed module=cli status=error error={err}");
            eprintln!("sizerlint: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| sizerlint_core::default_log_level());
    sizerlint_core::init_logging(level).map_err(CliError::Logging)?;

    info!(
        "event=run_start module=cli file={}",
        cli.project_file.display()
    );

    let xml = std::fs::read_to_string(&cli.project_file).map_err(|source| CliError::Io {
        path: cli.project_file.clone(),
        source,
    })?;

    let mut diagnostics = Diagnostics::new();
    let project = read_project(&xml, &mut diagnostics)?;

    if cli.dump {
        print!("{project}");
    }

    check_project(&project, &mut diagnostics)?;

    for diagnostic in diagnostics.iter() {
        println!("{diagnostic}");
    }

    info!(
        "event=run_done module=cli status=ok findings={}",
        diagnostics.len()
    );
    Ok(())
}
