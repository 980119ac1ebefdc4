//! Money parsing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors parsing an amount of money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    /// The input wasn't of the form `AMOUNT CURRENCY`.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code isn't an ISO 4217 currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Parse an amount such as `"88.50 CNY"` into minor units of that currency.
///
/// Amounts with more decimal places than the currency supports are rounded.
///
/// # Errors
///
/// Returns a [`MoneyParseError`] if the format is wrong, the amount isn't a number or
/// doesn't fit in minor units, or the currency code is unknown.
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, MoneyParseError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(MoneyParseError::InvalidAmount(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = iso::find(code).ok_or_else(|| MoneyParseError::UnknownCurrency((*code).to_string()))?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidAmount(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| MoneyParseError::InvalidAmount(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CNY, JPY};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_money_reads_minor_units() -> TestResult {
        assert_eq!(parse_money("88.50 CNY")?, Money::from_minor(8_850, CNY));
        assert_eq!(parse_money("100 CNY")?, Money::from_minor(10_000, CNY));

        Ok(())
    }

    #[test]
    fn parse_money_respects_currency_exponent() -> TestResult {
        assert_eq!(parse_money("1500 JPY")?, Money::from_minor(1_500, JPY));

        Ok(())
    }

    #[test]
    fn parse_money_rejects_missing_currency() {
        assert!(matches!(
            parse_money("88.50"),
            Err(MoneyParseError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_money_rejects_unknown_currency() {
        assert_eq!(
            parse_money("10 XYZ"),
            Err(MoneyParseError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn parse_money_rejects_non_numbers() {
        assert!(matches!(
            parse_money("ten CNY"),
            Err(MoneyParseError::InvalidAmount(_))
        ));
    }
}
