//! Receipt
//!
//! Terminal rendering for quotes, refunds and the active policy.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    discounts::{describe_discount, percent_points},
    policy::PricingPolicy,
    pricing::PriceBreakdown,
    refunds::RefundCalculation,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Write an itemised quote.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing to `out` fails.
pub fn write_quote(mut out: impl io::Write, breakdown: &PriceBreakdown<'_>) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Amount"]);
    builder.push_record([
        format!("{} per day x {} days", breakdown.base_price_per_unit(), breakdown.total_units()),
        breakdown.subtotal().to_string(),
    ]);
    builder.push_record([
        describe_discount(breakdown.discount_rate()),
        negated(breakdown.discount_amount()),
    ]);

    write_table(&mut out, builder)?;

    write_summary_line(&mut out, "Total:", &breakdown.total_price().to_string())
}

/// Write the outcome of a cancellation of a booking that cost `total_price`.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing to `out` fails.
pub fn write_refund(
    mut out: impl io::Write,
    total_price: Money<'_, Currency>,
    refund: &RefundCalculation<'_>,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Amount"]);
    builder.push_record(["Booking total".to_string(), total_price.to_string()]);
    builder.push_record([
        "Cancellation fee".to_string(),
        negated(refund.cancellation_fee()),
    ]);
    builder.push_record([
        format!("{} ({}%)", refund.classification(), percent_points(refund.refund_rate()).round_dp(2)),
        refund.refund_amount().to_string(),
    ]);

    write_table(&mut out, builder)?;

    write_summary_line(&mut out, "Reason:", &refund.reason().to_string())?;

    let settlement = match refund.estimated_settlement_days() {
        0 => "nothing to settle".to_string(),
        days => format!("within {days} working days"),
    };

    write_summary_line(&mut out, "Settles:", &settlement)
}

/// Write the discount tiers and refund rules of a policy.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing to `out` fails.
pub fn write_policy(mut out: impl io::Write, policy: &PricingPolicy) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Stay", "Discount"]);

    for tier in policy.schedule.tiers() {
        builder.push_record([
            format!("{}+ days", tier.min_days()),
            describe_discount(tier.rate()),
        ]);
    }

    write_table(&mut out, builder)?;

    for line in policy.refunds.summary() {
        writeln!(out, " - {line}").map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

fn negated(amount: Money<'_, Currency>) -> String {
    if amount.to_minor_units() == 0 {
        amount.to_string()
    } else {
        format!("-{amount}")
    }
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

const GREY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn is_border(ch: char) -> bool {
    ('\u{2500}'..='\u{257F}').contains(&ch)
}

/// Greys out the table frame so amounts stand out.
///
/// Each run of box-drawing characters gets one escape pair; cell text is copied as is.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut chars = table.chars().peekable();

    while let Some(ch) = chars.next() {
        if !is_border(ch) {
            out.push(ch);
            continue;
        }

        out.push_str(GREY);
        out.push(ch);

        while let Some(border) = chars.next_if(|next| is_border(*next)) {
            out.push(border);
        }

        out.push_str(RESET);
    }

    out
}

fn write_summary_line(out: &mut impl io::Write, label: &str, value: &str) -> Result<(), ReceiptError> {
    writeln!(out, " {BOLD}{label:<8}{RESET} {value}").map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, civil::date, tz::TimeZone};
    use rusty_money::iso::CNY;
    use testresult::TestResult;

    use crate::{pricing::price_breakdown, refunds::calculate_refund};

    use super::*;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> Result<(), ReceiptError>) -> Result<String, Box<dyn std::error::Error>> {
        let mut buffer = Vec::new();
        write(&mut buffer)?;

        Ok(String::from_utf8(buffer)?)
    }

    #[test]
    fn quote_lists_subtotal_discount_and_total() -> TestResult {
        let breakdown = price_breakdown(Money::from_minor(10_000, CNY), 10, None)?;

        let output = render(|out| write_quote(out, &breakdown))?;

        assert!(output.contains("x 10 days"));
        assert!(output.contains("5% off"));
        assert!(output.contains("50.00"));
        assert!(output.contains("950.00"));
        assert!(output.contains("Total:"));

        Ok(())
    }

    #[test]
    fn refund_lists_fee_and_reason() -> TestResult {
        let now = date(2024, 6, 10).at(12, 0, 0, 0).to_zoned(TimeZone::UTC)?;
        let start = now.checked_add(SignedDuration::from_hours(24))?;
        let end = start.checked_add(SignedDuration::from_hours(72))?;
        let total = Money::from_minor(50_000, CNY);

        let refund = calculate_refund(total, &start, &end, &now)?;
        let output = render(|out| write_refund(out, total, &refund))?;

        assert!(output.contains("Partial refund (70%)"));
        assert!(output.contains("350.00"));
        assert!(output.contains("150.00"));
        assert!(output.contains("late fee"));
        assert!(output.contains("within 5 working days"));

        Ok(())
    }

    #[test]
    fn policy_lists_tiers_and_rules() -> TestResult {
        let output = render(|out| write_policy(out, &PricingPolicy::default()))?;

        assert!(output.contains("30+ days"));
        assert!(output.contains("15% off"));
        assert!(output.contains("48 hours"));

        Ok(())
    }

    #[test]
    fn colorize_borders_leaves_content_alone() {
        let coloured = colorize_borders("│ab│");

        assert_eq!(coloured, "\x1b[90m│\x1b[0mab\x1b[90m│\x1b[0m");
    }

    #[test]
    fn colorize_borders_wraps_each_run_once() {
        assert_eq!(colorize_borders("╭──╮\n"), "\x1b[90m╭──╮\x1b[0m\n");
    }
}
