//! # Annotator command-line entry point
//!
//! Every invocation loads the session file, applies one command and saves the
//! session again:
//!
//! ```bash
//! annotator init --table participants.tsv
//! annotator map --column sex --variable nb:Sex
//! annotator level --column sex --value M --term snomed:248153007
//! annotator export
//! ```
//!
//! Logs go to stderr and to the log directory (see `annotator::logging`).

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, clippy::print_stderr)] // Command output goes to the terminal

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Err(err) = annotator::logging::init(cli.verbose) {
        // Commands still work without file logs.
        eprintln!("warning: file logging disabled: {err:#}");
    }

    let result = cli::run(cli);
    if let Err(err) = &result {
        tracing::error!("{err:#}");
        if let Ok(path) = annotator::logging::get_current_log_path() {
            eprintln!("Details were logged to {}", path.display());
        }
    }
    result
}
