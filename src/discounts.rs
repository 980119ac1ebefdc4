//! Discounts
//!
//! Long stays are rewarded with a duration discount. A [`DiscountSchedule`] maps day
//! thresholds to discount rates; the highest threshold a stay reaches decides its rate.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::error::{ArgumentError, PricingError};

/// Reasons a discount schedule can be rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// A tier's rate fell outside `0..=1`.
    #[error("tier starting at {min_days} days has a rate outside 0..=1")]
    RateOutOfRange {
        /// Threshold of the offending tier
        min_days: i64,
    },

    /// A tier threshold was below zero.
    #[error("tier threshold {0} is negative")]
    NegativeThreshold(i64),

    /// Two tiers share a threshold.
    #[error("more than one tier starts at {0} days")]
    DuplicateThreshold(i64),

    /// A longer tier offers a smaller rate than a shorter one.
    #[error("tier starting at {min_days} days has a lower rate than a shorter tier")]
    NotMonotonic {
        /// Threshold of the offending tier
        min_days: i64,
    },
}

/// A single duration tier: stays of at least `min_days` get `rate` off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountTier {
    min_days: i64,
    rate: Percentage,
}

impl DiscountTier {
    /// Create a new tier.
    pub fn new(min_days: i64, rate: Percentage) -> Self {
        Self { min_days, rate }
    }

    /// Minimum stay length, in days, that qualifies for this tier.
    pub fn min_days(&self) -> i64 {
        self.min_days
    }

    /// Discount rate for this tier.
    pub fn rate(&self) -> Percentage {
        self.rate
    }
}

/// An ordered set of duration tiers.
///
/// Tiers are kept sorted from the longest threshold to the shortest so lookups can stop
/// at the first tier a stay qualifies for. Rates never decrease as the threshold grows,
/// which keeps the discount monotonic in the length of the stay.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl DiscountSchedule {
    /// Build a schedule from tiers in any order.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if a rate is outside `0..=1`, a threshold is negative
    /// or repeated, or a longer tier has a smaller rate than a shorter one.
    pub fn new(mut tiers: Vec<DiscountTier>) -> Result<Self, ScheduleError> {
        tiers.sort_by_key(|tier| tier.min_days);

        let mut previous: Option<&DiscountTier> = None;

        for tier in &tiers {
            if tier.min_days < 0 {
                return Err(ScheduleError::NegativeThreshold(tier.min_days));
            }

            if !is_fraction(tier.rate) {
                return Err(ScheduleError::RateOutOfRange {
                    min_days: tier.min_days,
                });
            }

            if let Some(previous) = previous {
                if previous.min_days == tier.min_days {
                    return Err(ScheduleError::DuplicateThreshold(tier.min_days));
                }

                if rate_value(tier.rate) < rate_value(previous.rate) {
                    return Err(ScheduleError::NotMonotonic {
                        min_days: tier.min_days,
                    });
                }
            }

            previous = Some(tier);
        }

        tiers.reverse();

        Ok(Self { tiers })
    }

    /// The marketplace's standard schedule: 5% off from 7 days, 10% from 14 and 15%
    /// from 30.
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                DiscountTier::new(30, Percentage::from(Decimal::new(15, 2))),
                DiscountTier::new(14, Percentage::from(Decimal::new(10, 2))),
                DiscountTier::new(7, Percentage::from(Decimal::new(5, 2))),
            ],
        }
    }

    /// A schedule that never discounts.
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Tiers from the longest threshold to the shortest.
    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// Discount rate for a stay of `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidArgument`] if `days` is negative.
    pub fn rate_for(&self, days: i64) -> Result<Percentage, PricingError> {
        if days < 0 {
            return Err(ArgumentError::NegativeDays.into());
        }

        Ok(self
            .tiers
            .iter()
            .find(|tier| days >= tier.min_days)
            .map_or_else(no_discount, DiscountTier::rate))
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

/// Discount rate the standard schedule gives a stay of `days` days.
///
/// # Errors
///
/// Returns [`PricingError::InvalidArgument`] if `days` is negative.
pub fn discount_rate_for_duration(days: i64) -> Result<Percentage, PricingError> {
    DiscountSchedule::standard().rate_for(days)
}

/// A zero rate.
pub fn no_discount() -> Percentage {
    Percentage::from(Decimal::ZERO)
}

/// The fraction behind a percentage, e.g. `0.15` for 15%.
pub fn rate_value(percent: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the underlying Decimal
    percent * Decimal::ONE
}

/// Returns true if the rate lies within `0..=1`.
pub fn is_fraction(percent: Percentage) -> bool {
    let value = rate_value(percent);

    value >= Decimal::ZERO && value <= Decimal::ONE
}

/// Apply a fraction to an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product can't be represented.
pub fn fraction_of_minor(fraction: Decimal, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    fraction
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}

/// Apply a percentage to an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product can't be represented.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    fraction_of_minor(rate_value(percent), minor)
}

/// Percent points of a fractional rate, e.g. `15` for `0.15`.
pub fn percent_points(rate: Percentage) -> Decimal {
    (rate_value(rate) * Decimal::ONE_HUNDRED).normalize()
}

/// Human readable label for a discount rate, e.g. `"5% off"`.
pub fn describe_discount(rate: Percentage) -> String {
    let points = percent_points(rate);

    if points.is_zero() {
        "No discount".to_string()
    } else {
        format!("{points}% off")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn pct(basis: i64) -> Percentage {
        Percentage::from(Decimal::new(basis, 2))
    }

    #[test]
    fn standard_tiers_match_boundaries() -> TestResult {
        assert_eq!(discount_rate_for_duration(0)?, pct(0));
        assert_eq!(discount_rate_for_duration(6)?, pct(0));
        assert_eq!(discount_rate_for_duration(7)?, pct(5));
        assert_eq!(discount_rate_for_duration(13)?, pct(5));
        assert_eq!(discount_rate_for_duration(14)?, pct(10));
        assert_eq!(discount_rate_for_duration(29)?, pct(10));
        assert_eq!(discount_rate_for_duration(30)?, pct(15));
        assert_eq!(discount_rate_for_duration(365)?, pct(15));

        Ok(())
    }

    #[test]
    fn standard_tiers_are_monotonic() -> TestResult {
        let mut previous = Decimal::ZERO;

        for days in 0..=400 {
            let rate = rate_value(discount_rate_for_duration(days)?);

            assert!(rate >= previous, "rate dropped at {days} days");

            previous = rate;
        }

        Ok(())
    }

    #[test]
    fn negative_days_are_rejected() {
        assert_eq!(
            discount_rate_for_duration(-1),
            Err(PricingError::InvalidArgument(ArgumentError::NegativeDays))
        );
    }

    #[test]
    fn schedule_sorts_tiers_longest_first() -> TestResult {
        let schedule =
            DiscountSchedule::new(vec![DiscountTier::new(3, pct(2)), DiscountTier::new(10, pct(8))])?;

        let thresholds: Vec<i64> = schedule.tiers().iter().map(DiscountTier::min_days).collect();

        assert_eq!(thresholds, vec![10, 3]);
        assert_eq!(schedule.rate_for(2)?, pct(0));
        assert_eq!(schedule.rate_for(3)?, pct(2));
        assert_eq!(schedule.rate_for(12)?, pct(8));

        Ok(())
    }

    #[test]
    fn schedule_rejects_rates_outside_unit_range() {
        let result = DiscountSchedule::new(vec![DiscountTier::new(7, pct(120))]);

        assert_eq!(result, Err(ScheduleError::RateOutOfRange { min_days: 7 }));
    }

    #[test]
    fn schedule_rejects_negative_thresholds() {
        let result = DiscountSchedule::new(vec![DiscountTier::new(-2, pct(5))]);

        assert_eq!(result, Err(ScheduleError::NegativeThreshold(-2)));
    }

    #[test]
    fn schedule_rejects_duplicate_thresholds() {
        let result =
            DiscountSchedule::new(vec![DiscountTier::new(7, pct(5)), DiscountTier::new(7, pct(6))]);

        assert_eq!(result, Err(ScheduleError::DuplicateThreshold(7)));
    }

    #[test]
    fn schedule_rejects_decreasing_rates() {
        let result = DiscountSchedule::new(vec![
            DiscountTier::new(7, pct(10)),
            DiscountTier::new(14, pct(5)),
        ]);

        assert_eq!(result, Err(ScheduleError::NotMonotonic { min_days: 14 }));
    }

    #[test]
    fn empty_schedule_never_discounts() -> TestResult {
        assert_eq!(DiscountSchedule::none().rate_for(90)?, pct(0));

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_half_up() -> TestResult {
        // 5% of 10.50 is 0.525
        assert_eq!(percent_of_minor(pct(5), 1050)?, 53);
        assert_eq!(percent_of_minor(pct(5), 1040)?, 52);

        Ok(())
    }

    #[test]
    fn fraction_of_minor_overflow_returns_error() {
        let result = fraction_of_minor(Decimal::TWO, i64::MAX);

        assert_eq!(result, Err(PricingError::Overflow));
    }

    #[test]
    fn describe_discount_labels() {
        assert_eq!(describe_discount(pct(0)), "No discount");
        assert_eq!(describe_discount(pct(5)), "5% off");
        assert_eq!(
            describe_discount(Percentage::from(Decimal::new(125, 3))),
            "12.5% off"
        );
    }
}
