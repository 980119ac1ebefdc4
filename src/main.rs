//! Foster Pricing CLI

use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = cli::logging::init_subscriber(&cli.logging) {
        report_without_logging(&error);

        return ExitCode::FAILURE;
    }

    match cli::run(&cli, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "no subscriber to log through")]
fn report_without_logging(error: &impl std::fmt::Display) {
    eprintln!("failed to initialise logging: {error}");
}
