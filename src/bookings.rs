//! Bookings
//!
//! A booking keeps its own copy of the price it was sold at. [`PriceSnapshot`] is taken
//! from the [`PriceBreakdown`] once, when the booking is created, and holds no link back
//! to the [`ServicePackage`]; later price changes on the package can't reach it.

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use jiff::Zoned;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    dates::CalendarDay,
    discounts::DiscountSchedule,
    error::PricingError,
    pricing::PriceBreakdown,
    refunds::{RefundCalculation, RefundPolicy},
};

/// Lifecycle state of a booking, as reported by the booking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation
    Pending,

    /// Confirmed by the institution
    Confirmed,

    /// The pet has checked in
    InProgress,

    /// The stay is over
    Completed,

    /// The booking was cancelled
    Cancelled,
}

/// A status string that isn't a known [`BookingStatus`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown booking status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        })
    }
}

/// A bookable service with a live per-day price.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePackage<'a> {
    name: String,
    price_per_day: Money<'a, Currency>,
}

impl<'a> ServicePackage<'a> {
    /// Create a new package
    pub fn new(name: impl Into<String>, price_per_day: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            price_per_day,
        }
    }

    /// Package name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current per-day price
    pub fn price_per_day(&self) -> Money<'a, Currency> {
        self.price_per_day
    }

    /// Change the per-day price. Existing snapshots are unaffected.
    pub fn set_price_per_day(&mut self, price_per_day: Money<'a, Currency>) {
        self.price_per_day = price_per_day;
    }

    /// Preview the price of a stay at the current package price.
    ///
    /// # Errors
    ///
    /// See [`DiscountSchedule::price_breakdown`].
    pub fn quote(
        &self,
        schedule: &DiscountSchedule,
        start: &impl CalendarDay,
        end: &impl CalendarDay,
        override_rate: Option<Percentage>,
    ) -> Result<PriceBreakdown<'a>, PricingError> {
        schedule.price_breakdown_for_dates(self.price_per_day, start, end, override_rate)
    }

    /// Price a new booking and freeze the result.
    ///
    /// # Errors
    ///
    /// See [`DiscountSchedule::price_breakdown`].
    pub fn book(
        &self,
        schedule: &DiscountSchedule,
        start: &impl CalendarDay,
        end: &impl CalendarDay,
        override_rate: Option<Percentage>,
    ) -> Result<PriceSnapshot<'a>, PricingError> {
        let snapshot = PriceSnapshot::from(&self.quote(schedule, start, end, override_rate)?);

        debug!(
            package = %self.name,
            total_minor = snapshot.total_price.to_minor_units(),
            "took price snapshot"
        );

        Ok(snapshot)
    }
}

/// Price fields stored on a booking at creation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot<'a> {
    base_price_per_unit: Money<'a, Currency>,
    total_units: i64,
    discount_amount: Money<'a, Currency>,
    total_price: Money<'a, Currency>,
}

impl<'a> From<&PriceBreakdown<'a>> for PriceSnapshot<'a> {
    fn from(breakdown: &PriceBreakdown<'a>) -> Self {
        Self {
            base_price_per_unit: breakdown.base_price_per_unit(),
            total_units: breakdown.total_units(),
            discount_amount: breakdown.discount_amount(),
            total_price: breakdown.total_price(),
        }
    }
}

impl<'a> PriceSnapshot<'a> {
    /// Per-day price the booking was sold at
    pub fn base_price_per_unit(&self) -> Money<'a, Currency> {
        self.base_price_per_unit
    }

    /// Days booked
    pub fn total_units(&self) -> i64 {
        self.total_units
    }

    /// Discount granted at booking time
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Amount charged
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total_price
    }

    /// Refund for cancelling this booking, based on the stored total.
    ///
    /// # Errors
    ///
    /// See [`RefundPolicy::calculate`].
    pub fn refund(
        &self,
        policy: &RefundPolicy,
        start: &Zoned,
        end: &Zoned,
        cancel_at: &Zoned,
    ) -> Result<RefundCalculation<'a>, PricingError> {
        policy.calculate(self.total_price, start, end, cancel_at)
    }
}
