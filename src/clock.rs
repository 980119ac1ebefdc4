//! Clock
//!
//! Calculations never read the system time themselves; callers that want "now" pass a
//! [`Clock`] so the same inputs always replay to the same result.

use jiff::{Zoned, tz::TimeZone};

/// Source of the current instant.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Zoned;
}

/// Reads the system clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Zoned,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Zoned) -> Self {
        Self { now }
    }

    /// The instant this clock is frozen at, in `tz`.
    pub fn in_time_zone(&self, tz: TimeZone) -> Zoned {
        self.now.with_time_zone(tz)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.now.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Zoned {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn fixed_clock_is_frozen() -> TestResult {
        let instant = date(2024, 5, 1).at(9, 30, 0, 0).to_zoned(TimeZone::UTC)?;
        let clock = FixedClock::new(instant.clone());

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());

        Ok(())
    }

    #[test]
    fn fixed_clock_converts_time_zones_without_moving() -> TestResult {
        let instant = date(2024, 5, 1).at(23, 0, 0, 0).to_zoned(TimeZone::UTC)?;
        let clock = FixedClock::new(instant.clone());

        let shifted = clock.in_time_zone(TimeZone::fixed(jiff::tz::offset(8)));

        assert_eq!(shifted.timestamp(), instant.timestamp());
        assert_eq!(shifted.date(), date(2024, 5, 2));

        Ok(())
    }

    fn read(clock: impl Clock) -> Zoned {
        clock.now()
    }

    #[test]
    fn clock_works_through_references() -> TestResult {
        let instant = date(2024, 5, 1).at(0, 0, 0, 0).to_zoned(TimeZone::UTC)?;
        let clock = FixedClock::new(instant.clone());
        let by_ref: &dyn Clock = &clock;

        assert_eq!(read(&clock), instant);
        assert_eq!(read(by_ref), instant);

        Ok(())
    }
}
