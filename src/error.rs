//! Errors

use rusty_money::MoneyError;
use thiserror::Error;

/// The argument that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// A price or total was below zero.
    NegativePrice,

    /// A day count was below zero.
    NegativeDays,

    /// The end of a stay falls before its start.
    EndBeforeStart,

    /// A rate fell outside the `0..=1` range.
    RateOutOfRange,

    /// A refund window was negative.
    NegativeWindow,
}

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            ArgumentError::NegativePrice => "price must be non-negative",
            ArgumentError::NegativeDays => "days must be non-negative",
            ArgumentError::EndBeforeStart => "end date must not be before start date",
            ArgumentError::RateOutOfRange => "rate must be between 0 and 1",
            ArgumentError::NegativeWindow => "full refund window must not be negative",
        };

        f.write_str(message)
    }
}

/// Errors returned by the pricing and refund calculations.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An input was rejected before any calculation took place.
    #[error("invalid argument: {0}")]
    InvalidArgument(ArgumentError),

    /// A date or timestamp could not be parsed into a calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Minor-unit arithmetic did not fit the underlying integer or decimal type.
    #[error("amount overflowed while calculating")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl From<ArgumentError> for PricingError {
    fn from(error: ArgumentError) -> Self {
        PricingError::InvalidArgument(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_names_the_argument() {
        let error = PricingError::from(ArgumentError::NegativeDays);

        assert_eq!(
            error.to_string(),
            "invalid argument: days must be non-negative"
        );
    }

    #[test]
    fn invalid_date_message_includes_input() {
        let error = PricingError::InvalidDate("2024-13-01".to_string());

        assert!(error.to_string().contains("2024-13-01"));
    }
}
