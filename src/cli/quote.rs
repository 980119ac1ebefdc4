//! `quote` subcommand

use std::io;

use clap::Args;
use foster_pricing::{
    dates::parse_date,
    money::parse_money,
    policy::{PricingPolicy, parse_rate},
    receipt,
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Price per day, e.g. "100.00 CNY"
    #[arg(long)]
    price: String,

    /// Number of days booked
    #[arg(long, conflicts_with_all = ["start", "end"], required_unless_present = "start")]
    days: Option<i64>,

    /// First day of the stay
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// Last day of the stay, included in the price
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Discount to apply instead of the duration tiers, e.g. "12%" or "0.12"
    #[arg(long)]
    discount: Option<String>,
}

pub(crate) fn run(args: &QuoteArgs, policy: &PricingPolicy, out: impl io::Write) -> Result<(), CliError> {
    let price = parse_money(&args.price)?;
    let override_rate = args.discount.as_deref().map(parse_rate).transpose()?;

    let breakdown = match (args.days, &args.start, &args.end) {
        (Some(days), _, _) => policy.schedule.price_breakdown(price, days, override_rate)?,
        (None, Some(start), Some(end)) => policy.schedule.price_breakdown_for_dates(
            price,
            &parse_date(start)?,
            &parse_date(end)?,
            override_rate,
        )?,
        _ => return Err(CliError::MissingStay),
    };

    Ok(receipt::write_quote(out, &breakdown)?)
}
