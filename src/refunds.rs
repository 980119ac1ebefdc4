//! Refunds
//!
//! Cancellation refunds depend on how far ahead of check-in the booking is cancelled:
//!
//! 1. More than the full-refund window (48 hours) ahead: everything is refunded.
//! 2. Inside the window but before check-in: the late rate (70%) is refunded.
//! 3. After check-in: the late rate is applied to the share of days not yet used.
//!
//! Refunds are always calculated from the total stored on the booking, never from the
//! current price of the service package.

use std::fmt;

use decimal_percentage::Percentage;
use jiff::{SignedDuration, Zoned};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    bookings::BookingStatus,
    clock::Clock,
    dates::{days_between, lead_time},
    discounts::{fraction_of_minor, is_fraction, no_discount, percent_points, rate_value},
    error::{ArgumentError, PricingError},
};

/// How much of the booking is refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundClassification {
    /// The whole total is returned.
    Full,

    /// Part of the total is returned.
    Partial,

    /// Nothing is returned.
    None,
}

impl fmt::Display for RefundClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefundClassification::Full => "Full refund",
            RefundClassification::Partial => "Partial refund",
            RefundClassification::None => "No refund",
        })
    }
}

/// Which rule of the refund policy applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundReason {
    /// Cancelled before the full-refund window.
    FullRefundWindow,

    /// Cancelled inside the full-refund window, before check-in.
    LateCancellation,

    /// Cancelled after check-in with days still unused.
    ProratedAfterStart {
        /// Days of the stay left after the cancellation day
        remaining_days: i64,
    },

    /// Cancelled after the stay was used up.
    NothingRemaining,
}

impl fmt::Display for RefundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefundReason::FullRefundWindow => {
                f.write_str("cancelled ahead of the full refund window")
            }
            RefundReason::LateCancellation => {
                f.write_str("cancelled inside the full refund window, late fee charged")
            }
            RefundReason::ProratedAfterStart { remaining_days } => {
                write!(f, "cancelled after check-in, {remaining_days} unused days prorated")
            }
            RefundReason::NothingRemaining => {
                f.write_str("cancelled after the stay was used up")
            }
        }
    }
}

/// Outcome of a cancellation.
///
/// `refund_amount + cancellation_fee` always equals the booking total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefundCalculation<'a> {
    refund_amount: Money<'a, Currency>,
    cancellation_fee: Money<'a, Currency>,
    refund_rate: Percentage,
    reason: RefundReason,
    classification: RefundClassification,
    estimated_settlement_days: u32,
}

impl<'a> RefundCalculation<'a> {
    /// Amount returned to the customer
    pub fn refund_amount(&self) -> Money<'a, Currency> {
        self.refund_amount
    }

    /// Amount kept as a cancellation fee
    pub fn cancellation_fee(&self) -> Money<'a, Currency> {
        self.cancellation_fee
    }

    /// Share of the total that is refunded
    pub fn refund_rate(&self) -> Percentage {
        self.refund_rate
    }

    /// Rule that produced this refund
    pub fn reason(&self) -> RefundReason {
        self.reason
    }

    /// Full, partial or no refund
    pub fn classification(&self) -> RefundClassification {
        self.classification
    }

    /// Working days until the refund reaches the customer
    pub fn estimated_settlement_days(&self) -> u32 {
        self.estimated_settlement_days
    }
}

/// Cancellation rules and their constants.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundPolicy {
    /// Cancelling further ahead of check-in than this refunds everything.
    pub full_refund_window: SignedDuration,

    /// Share refunded for late cancellations, and for the unused share of a started stay.
    pub late_refund_rate: Percentage,

    /// Settlement time for cancellations before check-in.
    pub settlement_days: u32,

    /// Settlement time for prorated cancellations after check-in.
    pub prorated_settlement_days: u32,
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RefundPolicy {
    /// 48 hour full-refund window, 70% late refund, settled in 5 or 7 working days.
    pub fn standard() -> Self {
        Self {
            full_refund_window: SignedDuration::from_hours(48),
            late_refund_rate: Percentage::from(Decimal::new(7, 1)),
            settlement_days: 5,
            prorated_settlement_days: 7,
        }
    }

    /// Calculate the refund for cancelling a booking at `cancel_at`.
    ///
    /// `start` and `end` bound the stay; day counts use the calendar of `start`'s time
    /// zone.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidArgument`]: `total_price` is negative, `end` is before
    ///   `start`, the policy's late refund rate lies outside `0..=1`, or its full refund
    ///   window is negative.
    /// - [`PricingError::Overflow`]: the refund can't be represented in minor units.
    pub fn calculate<'a>(
        &self,
        total_price: Money<'a, Currency>,
        start: &Zoned,
        end: &Zoned,
        cancel_at: &Zoned,
    ) -> Result<RefundCalculation<'a>, PricingError> {
        let total_minor = total_price.to_minor_units();

        if total_minor < 0 {
            return Err(ArgumentError::NegativePrice.into());
        }

        if end.timestamp() < start.timestamp() {
            return Err(ArgumentError::EndBeforeStart.into());
        }

        if !is_fraction(self.late_refund_rate) {
            return Err(ArgumentError::RateOutOfRange.into());
        }

        if self.full_refund_window.is_negative() {
            return Err(ArgumentError::NegativeWindow.into());
        }

        let currency = total_price.currency();
        let lead = lead_time(start, cancel_at);

        let calculation = if lead > self.full_refund_window {
            RefundCalculation {
                refund_amount: total_price,
                cancellation_fee: Money::from_minor(0, currency),
                refund_rate: Percentage::from(Decimal::ONE),
                reason: RefundReason::FullRefundWindow,
                classification: RefundClassification::Full,
                estimated_settlement_days: self.settlement_days,
            }
        } else if lead > SignedDuration::ZERO {
            let refund_minor = fraction_of_minor(rate_value(self.late_refund_rate), total_minor)?;

            RefundCalculation {
                refund_amount: Money::from_minor(refund_minor, currency),
                cancellation_fee: Money::from_minor(total_minor - refund_minor, currency),
                refund_rate: self.late_refund_rate,
                reason: RefundReason::LateCancellation,
                classification: RefundClassification::Partial,
                estimated_settlement_days: self.settlement_days,
            }
        } else {
            self.prorate(total_price, start, end, cancel_at)?
        };

        debug_assert_eq!(
            calculation.refund_amount.to_minor_units()
                + calculation.cancellation_fee.to_minor_units(),
            total_minor,
            "refund and fee must add up to the total"
        );

        debug!(
            total_minor,
            lead_seconds = lead.as_secs(),
            refund_minor = calculation.refund_amount.to_minor_units(),
            fee_minor = calculation.cancellation_fee.to_minor_units(),
            reason = %calculation.reason,
            "calculated refund"
        );

        Ok(calculation)
    }

    /// Refund for a stay that has already started.
    fn prorate<'a>(
        &self,
        total_price: Money<'a, Currency>,
        start: &Zoned,
        end: &Zoned,
        cancel_at: &Zoned,
    ) -> Result<RefundCalculation<'a>, PricingError> {
        let currency = total_price.currency();
        let total_minor = total_price.to_minor_units();

        let cancel_day = cancel_at.with_time_zone(start.time_zone().clone());

        let total_days = days_between(start, end);
        let used_days = days_between(start, &cancel_day);
        let remaining_days = (total_days - used_days).max(0);

        if remaining_days == 0 {
            return Ok(RefundCalculation {
                refund_amount: Money::from_minor(0, currency),
                cancellation_fee: total_price,
                refund_rate: no_discount(),
                reason: RefundReason::NothingRemaining,
                classification: RefundClassification::None,
                estimated_settlement_days: 0,
            });
        }

        let unused_share = Decimal::from(remaining_days)
            .checked_div(Decimal::from(total_days))
            .ok_or(PricingError::Overflow)?;

        let refund_fraction = unused_share
            .checked_mul(rate_value(self.late_refund_rate))
            .ok_or(PricingError::Overflow)?;

        let refund_minor = fraction_of_minor(refund_fraction, total_minor)?;

        Ok(RefundCalculation {
            refund_amount: Money::from_minor(refund_minor, currency),
            cancellation_fee: Money::from_minor(total_minor - refund_minor, currency),
            refund_rate: Percentage::from(refund_fraction),
            reason: RefundReason::ProratedAfterStart { remaining_days },
            classification: RefundClassification::Partial,
            estimated_settlement_days: self.prorated_settlement_days,
        })
    }

    /// Human readable lines describing this policy.
    pub fn summary(&self) -> Vec<String> {
        let hours = self.full_refund_window.as_hours();
        let refunded = percent_points(self.late_refund_rate);
        let fee = Decimal::ONE_HUNDRED - refunded;

        vec![
            format!("Cancel more than {hours} hours before check-in for a full refund"),
            format!(
                "Cancel within {hours} hours of check-in for a {refunded}% refund ({fee}% cancellation fee)"
            ),
            format!("Cancel after check-in for a {refunded}% refund of the unused days"),
            format!(
                "Refunds settle within {}-{} working days",
                self.settlement_days, self.prorated_settlement_days
            ),
        ]
    }
}

/// Calculate a refund under the standard policy.
///
/// # Errors
///
/// See [`RefundPolicy::calculate`].
pub fn calculate_refund<'a>(
    total_price: Money<'a, Currency>,
    start: &Zoned,
    end: &Zoned,
    cancel_at: &Zoned,
) -> Result<RefundCalculation<'a>, PricingError> {
    RefundPolicy::standard().calculate(total_price, start, end, cancel_at)
}

/// A cancellation whose instant may be left to a [`Clock`].
#[derive(Debug, Clone)]
pub struct RefundRequest<'a> {
    /// Total stored on the booking
    pub total_price: Money<'a, Currency>,

    /// Check-in
    pub start: Zoned,

    /// Check-out
    pub end: Zoned,

    /// Moment of cancellation, `None` for the clock's current instant
    pub cancel_at: Option<Zoned>,
}

impl<'a> RefundRequest<'a> {
    /// Calculate the refund, asking `clock` for the cancellation instant if none was
    /// given.
    ///
    /// # Errors
    ///
    /// See [`RefundPolicy::calculate`].
    pub fn calculate(
        &self,
        policy: &RefundPolicy,
        clock: &impl Clock,
    ) -> Result<RefundCalculation<'a>, PricingError> {
        let cancel_at = self.cancel_at.clone().unwrap_or_else(|| clock.now());

        policy.calculate(self.total_price, &self.start, &self.end, &cancel_at)
    }
}

/// Extra context returned with a cancellation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationNote {
    /// The booking is already completed or cancelled.
    AlreadyClosed,

    /// The stay has started, so the refund will be prorated.
    ProratedRefund,

    /// The booking can be cancelled under the standard rules.
    Standard,
}

impl fmt::Display for CancellationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CancellationNote::AlreadyClosed => {
                "the booking is already completed or cancelled"
            }
            CancellationNote::ProratedRefund => {
                "the stay has started, the refund will be prorated over the unused days"
            }
            CancellationNote::Standard => "the booking can be cancelled",
        })
    }
}

/// Whether a booking may be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationCheck {
    /// True if cancellation is allowed.
    pub allowed: bool,

    /// Why, or what to expect.
    pub note: CancellationNote,
}

/// Check whether a booking in `status`, starting at `start`, can be cancelled at `now`.
///
/// Only completed and cancelled bookings are refused. Stays that have already started
/// are allowed but flagged as prorated.
pub fn can_cancel(start: &Zoned, status: BookingStatus, now: &Zoned) -> CancellationCheck {
    if matches!(status, BookingStatus::Completed | BookingStatus::Cancelled) {
        return CancellationCheck {
            allowed: false,
            note: CancellationNote::AlreadyClosed,
        };
    }

    let note = if lead_time(start, now) <= SignedDuration::ZERO {
        CancellationNote::ProratedRefund
    } else {
        CancellationNote::Standard
    };

    CancellationCheck {
        allowed: true,
        note,
    }
}
