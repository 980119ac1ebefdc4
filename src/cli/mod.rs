//! Command line interface.

use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use foster_pricing::{
    error::PricingError,
    money::MoneyParseError,
    policy::{PolicyError, PricingPolicy},
    receipt::{self, ReceiptError},
    refunds::CancellationNote,
};
use thiserror::Error;
use tracing::debug;

pub(crate) mod logging;
pub(crate) mod quote;
pub(crate) mod refund;

use logging::LoggingConfig;
use quote::QuoteArgs;
use refund::RefundArgs;

#[derive(Debug, Parser)]
#[command(
    name = "foster-pricing",
    about = "Quote pet-fostering stays and work out cancellation refunds",
    long_about = None
)]
pub(crate) struct Cli {
    /// YAML file overriding the discount tiers and refund rules
    #[arg(long, env = "FOSTER_PRICING_POLICY", global = true)]
    pub policy: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Price a stay
    Quote(QuoteArgs),

    /// Work out the refund for cancelling a booking
    Refund(RefundArgs),

    /// Show the discount tiers and refund rules in force
    Policy,
}

/// Errors surfaced by the command line front end.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Money(#[from] MoneyParseError),

    #[error("failed to write output")]
    Receipt(#[from] ReceiptError),

    #[error("either --days or both --start and --end are required")]
    MissingStay,

    #[error("cannot cancel: {0}")]
    NotCancellable(CancellationNote),
}

impl Cli {
    /// Load the policy named on the command line, or the standard one.
    pub(crate) fn load_policy(&self) -> Result<PricingPolicy, PolicyError> {
        match &self.policy {
            Some(path) => PricingPolicy::from_path(path),
            None => Ok(PricingPolicy::default()),
        }
    }
}

/// Run a parsed command, writing its output to `out`.
pub(crate) fn run(cli: &Cli, out: impl io::Write) -> Result<(), CliError> {
    let policy = cli.load_policy()?;

    debug!(command = ?cli.command, "running command");

    match &cli.command {
        Commands::Quote(args) => quote::run(args, &policy, out),
        Commands::Refund(args) => refund::run(args, &policy, out),
        Commands::Policy => Ok(receipt::write_policy(out, &policy)?),
    }
}
