//! Pricing
//!
//! Quotes a stay from a per-day price and its length. A [`PriceBreakdown`] is computed
//! on demand, either to preview a quote or once when a booking is created; see
//! [`crate::bookings::PriceSnapshot`] for the copy that is kept afterwards.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    dates::{CalendarDay, days_between},
    discounts::{DiscountSchedule, is_fraction, percent_of_minor},
    error::{ArgumentError, PricingError},
};

/// Itemised price of a stay.
///
/// `subtotal` is exact, `discount_amount` is rounded once to whole minor units and
/// `total_price` is whatever remains, so `total_price <= subtotal` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown<'a> {
    base_price_per_unit: Money<'a, Currency>,
    total_units: i64,
    subtotal: Money<'a, Currency>,
    discount_rate: Percentage,
    discount_amount: Money<'a, Currency>,
    total_price: Money<'a, Currency>,
}

impl<'a> PriceBreakdown<'a> {
    /// Price charged per day
    pub fn base_price_per_unit(&self) -> Money<'a, Currency> {
        self.base_price_per_unit
    }

    /// Number of days priced
    pub fn total_units(&self) -> i64 {
        self.total_units
    }

    /// Price before any discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount rate that was applied
    pub fn discount_rate(&self) -> Percentage {
        self.discount_rate
    }

    /// Amount taken off the subtotal
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Price to be paid
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total_price
    }

    /// Currency of every amount in the breakdown
    pub fn currency(&self) -> &'a Currency {
        self.base_price_per_unit.currency()
    }
}

impl DiscountSchedule {
    /// Price a stay of `days` days at `price_per_day`.
    ///
    /// The discount rate comes from this schedule unless `override_rate` is given.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidArgument`]: the price or day count is negative, or the
    ///   override rate lies outside `0..=1`.
    /// - [`PricingError::Overflow`]: the subtotal doesn't fit in minor units.
    pub fn price_breakdown<'a>(
        &self,
        price_per_day: Money<'a, Currency>,
        days: i64,
        override_rate: Option<Percentage>,
    ) -> Result<PriceBreakdown<'a>, PricingError> {
        if price_per_day.to_minor_units() < 0 {
            return Err(ArgumentError::NegativePrice.into());
        }

        if days < 0 {
            return Err(ArgumentError::NegativeDays.into());
        }

        let discount_rate = match override_rate {
            Some(rate) if !is_fraction(rate) => {
                return Err(ArgumentError::RateOutOfRange.into());
            }
            Some(rate) => rate,
            None => self.rate_for(days)?,
        };

        let currency = price_per_day.currency();

        let subtotal_minor = price_per_day
            .to_minor_units()
            .checked_mul(days)
            .ok_or(PricingError::Overflow)?;

        let discount_minor = percent_of_minor(discount_rate, subtotal_minor)?;
        let total_minor = subtotal_minor - discount_minor;

        debug!(
            price_per_day = price_per_day.to_minor_units(),
            days, subtotal_minor, discount_minor, total_minor, "priced stay"
        );

        Ok(PriceBreakdown {
            base_price_per_unit: price_per_day,
            total_units: days,
            subtotal: Money::from_minor(subtotal_minor, currency),
            discount_rate,
            discount_amount: Money::from_minor(discount_minor, currency),
            total_price: Money::from_minor(total_minor, currency),
        })
    }

    /// Price the stay between two dates, both days included.
    ///
    /// # Errors
    ///
    /// See [`DiscountSchedule::price_breakdown`].
    pub fn price_breakdown_for_dates<'a>(
        &self,
        price_per_day: Money<'a, Currency>,
        start: &impl CalendarDay,
        end: &impl CalendarDay,
        override_rate: Option<Percentage>,
    ) -> Result<PriceBreakdown<'a>, PricingError> {
        self.price_breakdown(price_per_day, days_between(start, end), override_rate)
    }
}

/// Price a stay of `days` days with the standard discount schedule.
///
/// # Errors
///
/// See [`DiscountSchedule::price_breakdown`].
pub fn price_breakdown(
    price_per_day: Money<'_, Currency>,
    days: i64,
    override_rate: Option<Percentage>,
) -> Result<PriceBreakdown<'_>, PricingError> {
    DiscountSchedule::standard().price_breakdown(price_per_day, days, override_rate)
}

/// Price the stay between two dates with the standard discount schedule.
///
/// # Errors
///
/// See [`DiscountSchedule::price_breakdown`].
pub fn price_breakdown_for_dates<'a>(
    price_per_day: Money<'a, Currency>,
    start: &impl CalendarDay,
    end: &impl CalendarDay,
    override_rate: Option<Percentage>,
) -> Result<PriceBreakdown<'a>, PricingError> {
    DiscountSchedule::standard().price_breakdown_for_dates(price_per_day, start, end, override_rate)
}
