//! Operator loop for tuning a follow-the-gap car one lap at a time.
//!
//! Reads single-letter commands from stdin:
//!
//! - `I` record a lap: parameters, then a lap time or `dnf`
//! - `G` request the next vector to try
//! - `B` request the best predicted vector, ignoring uncertainty
//! - `H` show the history size and fastest lap
//! - `S` save history
//! - `Q` save history and quit
//!
//! Logging is controlled by `RUST_LOG` and defaults to `info`.

mod cli;
mod session;

use std::{error::Error, io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use session::Session;

fn main() -> ExitCode {
    enable_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), cli::AppError> {
    let mut session = Session::open(&cli)?;
    let stdin = io::stdin();
    session.run(stdin.lock(), io::stdout().lock())
}

fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}
