//! Dates
//!
//! Calendar arithmetic shared by the price and refund calculations. Stay lengths are
//! counted in calendar days, so every input is reduced to its local date (midnight)
//! before differencing.

use jiff::{
    SignedDuration, Timestamp, Zoned,
    civil::{Date, DateTime},
    tz::TimeZone,
};

use crate::error::PricingError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Anything that falls on a single calendar day.
pub trait CalendarDay {
    /// The local calendar date, with the time of day stripped.
    fn calendar_day(&self) -> Date;
}

impl CalendarDay for Date {
    fn calendar_day(&self) -> Date {
        *self
    }
}

impl CalendarDay for DateTime {
    fn calendar_day(&self) -> Date {
        self.date()
    }
}

impl CalendarDay for Zoned {
    fn calendar_day(&self) -> Date {
        self.date()
    }
}

/// Inclusive number of calendar days spanned by two dates.
///
/// The order of the arguments doesn't matter and the result is never below 1: a stay
/// that starts and ends on the same day counts as one day.
pub fn days_between(start: &impl CalendarDay, end: &impl CalendarDay) -> i64 {
    let start = start.calendar_day();
    let end = end.calendar_day();

    let elapsed = start.duration_until(end).as_secs().abs();

    elapsed / SECONDS_PER_DAY + 1
}

/// Exact time remaining between `cancel_at` and the start of a stay.
///
/// Negative once the stay has started.
pub fn lead_time(start: &Zoned, cancel_at: &Zoned) -> SignedDuration {
    cancel_at.timestamp().duration_until(start.timestamp())
}

/// Fractional hours remaining until the start of a stay, negative once it has started.
pub fn hours_until_start(start: &Zoned, cancel_at: &Zoned) -> f64 {
    lead_time(start, cancel_at).as_secs_f64() / 3600.0
}

/// Parse a calendar date, stripping any time of day.
///
/// Accepts plain dates (`2024-05-01`), civil datetimes (`2024-05-01T14:30`), zoned
/// datetimes (`2024-05-01T14:30[Asia/Shanghai]`) and RFC 3339 timestamps. Civil and
/// zoned inputs keep the date as written; `Z` timestamps use the UTC date.
///
/// # Errors
///
/// Returns [`PricingError::InvalidDate`] if the input matches none of the formats.
pub fn parse_date(input: &str) -> Result<Date, PricingError> {
    let input = input.trim();

    if let Ok(zoned) = input.parse::<Zoned>() {
        return Ok(zoned.date());
    }

    if let Ok(datetime) = input.parse::<DateTime>() {
        return Ok(datetime.date());
    }

    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp.to_zoned(TimeZone::UTC).date());
    }

    Err(PricingError::InvalidDate(input.to_string()))
}

/// Parse an instant, resolving inputs without a zone or offset in `tz`.
///
/// Bare dates resolve to midnight.
///
/// # Errors
///
/// Returns [`PricingError::InvalidDate`] if the input can't be parsed or names a local
/// time that doesn't exist in `tz`.
pub fn parse_instant(input: &str, tz: &TimeZone) -> Result<Zoned, PricingError> {
    let input = input.trim();

    if let Ok(zoned) = input.parse::<Zoned>() {
        return Ok(zoned);
    }

    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp.to_zoned(tz.clone()));
    }

    input
        .parse::<DateTime>()
        .and_then(|datetime| datetime.to_zoned(tz.clone()))
        .map_err(|err| PricingError::InvalidDate(format!("{input}: {err}")))
}
