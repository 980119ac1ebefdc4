//! Pricing Policy
//!
//! Discount tiers and refund rules can be overridden with a YAML file. Anything left out
//! keeps the standard value.
//!
//! ```yaml
//! discounts:
//!   - min_days: 7
//!     rate: "5%"
//!   - min_days: 14
//!     rate: "0.10"
//! refunds:
//!   full_refund_window_hours: 48
//!   late_refund_rate: "70%"
//!   settlement_days: 5
//!   prorated_settlement_days: 7
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use jiff::SignedDuration;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    discounts::{DiscountSchedule, DiscountTier, ScheduleError, is_fraction},
    refunds::RefundPolicy,
};

/// Policy loading errors
#[derive(Debug, Error)]
pub enum PolicyError {
    /// IO error reading the policy file
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse policy YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A rate couldn't be parsed or lies outside `0..=1`
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// The full refund window was negative
    #[error("full refund window must not be negative, got {0} hours")]
    NegativeWindow(i64),

    /// The full refund window doesn't fit in a duration
    #[error("full refund window of {0} hours is too large")]
    WindowTooLarge(i64),

    /// The discount tiers are inconsistent
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Discount tier from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountTierConfig {
    /// Minimum stay length in days
    pub min_days: i64,

    /// Rate as a fraction (`"0.05"`) or percentage (`"5%"`)
    pub rate: String,
}

/// Refund rules from YAML
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefundPolicyConfig {
    /// Hours ahead of check-in that still earn a full refund
    pub full_refund_window_hours: Option<i64>,

    /// Share refunded for late or prorated cancellations
    pub late_refund_rate: Option<String>,

    /// Settlement days before check-in
    pub settlement_days: Option<u32>,

    /// Settlement days after check-in
    pub prorated_settlement_days: Option<u32>,
}

/// Policy file layout
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Discount tiers, replacing the standard schedule when present
    pub discounts: Option<Vec<DiscountTierConfig>>,

    /// Refund rule overrides
    #[serde(default)]
    pub refunds: RefundPolicyConfig,
}

/// Discount schedule and refund policy used for quotes and cancellations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingPolicy {
    /// Duration discount tiers
    pub schedule: DiscountSchedule,

    /// Cancellation rules
    pub refunds: RefundPolicy,
}

impl PricingPolicy {
    /// Parse a policy from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the YAML is malformed or describes an invalid policy.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let config: PolicyConfig = serde_norway::from_str(yaml)?;

        Self::try_from(config)
    }

    /// Read a policy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] if the file can't be read or doesn't hold a valid policy.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let policy = Self::from_yaml(&fs::read_to_string(path)?)?;

        info!(path = %path.display(), tiers = policy.schedule.tiers().len(), "loaded pricing policy");

        Ok(policy)
    }
}

impl TryFrom<PolicyConfig> for PricingPolicy {
    type Error = PolicyError;

    fn try_from(config: PolicyConfig) -> Result<Self, Self::Error> {
        let schedule = match config.discounts {
            Some(tiers) => DiscountSchedule::new(
                tiers
                    .into_iter()
                    .map(|tier| Ok(DiscountTier::new(tier.min_days, parse_rate(&tier.rate)?)))
                    .collect::<Result<Vec<_>, PolicyError>>()?,
            )?,
            None => DiscountSchedule::standard(),
        };

        Ok(Self {
            schedule,
            refunds: RefundPolicy::try_from(config.refunds)?,
        })
    }
}

impl TryFrom<RefundPolicyConfig> for RefundPolicy {
    type Error = PolicyError;

    fn try_from(config: RefundPolicyConfig) -> Result<Self, Self::Error> {
        let standard = RefundPolicy::standard();

        let full_refund_window = match config.full_refund_window_hours {
            Some(hours) if hours < 0 => return Err(PolicyError::NegativeWindow(hours)),
            Some(hours) => SignedDuration::try_from_hours(hours)
                .ok_or(PolicyError::WindowTooLarge(hours))?,
            None => standard.full_refund_window,
        };

        let late_refund_rate = match config.late_refund_rate {
            Some(rate) => parse_rate(&rate)?,
            None => standard.late_refund_rate,
        };

        Ok(Self {
            full_refund_window,
            late_refund_rate,
            settlement_days: config.settlement_days.unwrap_or(standard.settlement_days),
            prorated_settlement_days: config
                .prorated_settlement_days
                .unwrap_or(standard.prorated_settlement_days),
        })
    }
}

/// Parse a rate written as a fraction (`"0.15"`) or a percentage (`"15%"`).
///
/// # Errors
///
/// Returns [`PolicyError::InvalidRate`] if the value isn't a number or lies outside
/// `0..=1`.
pub fn parse_rate(s: &str) -> Result<Percentage, PolicyError> {
    let trimmed = s.trim();

    let parsed = match trimmed.strip_suffix('%') {
        Some(points) => points
            .trim()
            .parse::<Decimal>()
            .map(|points| points / Decimal::ONE_HUNDRED),
        None => trimmed.parse::<Decimal>(),
    };

    let value = parsed.map_err(|_err| PolicyError::InvalidRate(s.to_string()))?;

    let rate = Percentage::from(value);

    if !is_fraction(rate) {
        return Err(PolicyError::InvalidRate(s.to_string()));
    }

    Ok(rate)
}
