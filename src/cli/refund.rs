//! `refund` subcommand

use std::io;

use clap::Args;
use foster_pricing::{
    bookings::BookingStatus,
    clock::{Clock, SystemClock},
    dates::parse_instant,
    money::parse_money,
    policy::PricingPolicy,
    receipt,
    refunds::{CancellationNote, RefundRequest, can_cancel},
};
use tracing::info;

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct RefundArgs {
    /// Amount charged for the booking, e.g. "950.00 CNY"
    #[arg(long)]
    total: String,

    /// Check-in instant; times without an offset are read in the local time zone
    #[arg(long)]
    start: String,

    /// Check-out instant
    #[arg(long)]
    end: String,

    /// Cancellation instant, defaults to now
    #[arg(long)]
    cancel_at: Option<String>,

    /// Booking status (pending, confirmed, in_progress, completed, cancelled)
    #[arg(long)]
    status: Option<BookingStatus>,
}

pub(crate) fn run(args: &RefundArgs, policy: &PricingPolicy, out: impl io::Write) -> Result<(), CliError> {
    run_with_clock(args, policy, &SystemClock, out)
}

fn run_with_clock(
    args: &RefundArgs,
    policy: &PricingPolicy,
    clock: &impl Clock,
    out: impl io::Write,
) -> Result<(), CliError> {
    let now = clock.now();
    let tz = now.time_zone().clone();

    let request = RefundRequest {
        total_price: parse_money(&args.total)?,
        start: parse_instant(&args.start, &tz)?,
        end: parse_instant(&args.end, &tz)?,
        cancel_at: args
            .cancel_at
            .as_deref()
            .map(|cancel_at| parse_instant(cancel_at, &tz))
            .transpose()?,
    };

    if let Some(status) = args.status {
        let cancel_at = request.cancel_at.as_ref().unwrap_or(&now);
        let check = can_cancel(&request.start, status, cancel_at);

        if !check.allowed {
            return Err(CliError::NotCancellable(check.note));
        }

        if check.note == CancellationNote::ProratedRefund {
            info!(%status, "{}", check.note);
        }
    }

    let refund = request.calculate(&policy.refunds, clock)?;

    Ok(receipt::write_refund(out, request.total_price, &refund)?)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use foster_pricing::clock::FixedClock;
    use jiff::{civil::date, tz::TimeZone};
    use testresult::TestResult;

    use crate::cli::{Cli, Commands};

    use super::*;

    fn parse(args: &[&str]) -> Result<RefundArgs, Box<dyn std::error::Error>> {
        let cli = Cli::try_parse_from(["foster-pricing", "refund"].iter().chain(args))?;

        match cli.command {
            Commands::Refund(refund_args) => Ok(refund_args),
            _ => Err("expected refund command".into()),
        }
    }

    fn clock() -> Result<FixedClock, jiff::Error> {
        Ok(FixedClock::new(
            date(2024, 8, 1).at(10, 0, 0, 0).to_zoned(TimeZone::UTC)?,
        ))
    }

    fn refund(args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        run_with_clock(&parse(args)?, &PricingPolicy::default(), &clock()?, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    const STAY: [&str; 6] = [
        "--total",
        "1000.00 CNY",
        "--start",
        "2024-08-04T10:00:00Z",
        "--end",
        "2024-08-13T10:00:00Z",
    ];

    #[test]
    fn cancelling_early_refunds_everything() -> TestResult {
        let output = refund(&STAY)?;

        assert!(output.contains("Full refund (100%)"));
        assert!(output.contains("within 5 working days"));

        Ok(())
    }

    #[test]
    fn explicit_cancellation_instant_wins_over_clock() -> TestResult {
        let mut args = STAY.to_vec();
        args.extend(["--cancel-at", "2024-08-03T10:00:00Z"]);

        let output = refund(&args)?;

        assert!(output.contains("Partial refund (70%)"));
        assert!(output.contains("700.00"));
        assert!(output.contains("300.00"));

        Ok(())
    }

    #[test]
    fn closed_bookings_cannot_be_cancelled() -> TestResult {
        let mut args = STAY.to_vec();
        args.extend(["--status", "completed"]);

        let result = run_with_clock(&parse(&args)?, &PricingPolicy::default(), &clock()?, Vec::new());

        assert!(matches!(
            result,
            Err(CliError::NotCancellable(CancellationNote::AlreadyClosed))
        ));

        Ok(())
    }

    #[test]
    fn unknown_status_is_a_usage_error() {
        let mut args = STAY.to_vec();
        args.extend(["--status", "archived"]);

        assert!(parse(&args).is_err());
    }
}
