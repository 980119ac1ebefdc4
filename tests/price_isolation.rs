//! Integration tests for booking price snapshots

use jiff::{SignedDuration, civil::date, tz::TimeZone};
use rusty_money::{Money, iso::CNY};
use testresult::TestResult;

use foster_pricing::{
    bookings::ServicePackage, discounts::DiscountSchedule, policy::PricingPolicy,
};

#[test]
fn snapshots_survive_repeated_repricing() -> TestResult {
    let policy = PricingPolicy::default();
    let mut package = ServicePackage::new("Dog boarding", Money::from_minor(10_000, CNY));

    let snapshot = package.book(&policy.schedule, &date(2024, 8, 1), &date(2024, 8, 10), None)?;

    for price in [12_000, 0, 99_999] {
        package.set_price_per_day(Money::from_minor(price, CNY));

        assert_eq!(snapshot.base_price_per_unit(), Money::from_minor(10_000, CNY));
        assert_eq!(snapshot.total_units(), 10);
        assert_eq!(snapshot.discount_amount(), Money::from_minor(5_000, CNY));
        assert_eq!(snapshot.total_price(), Money::from_minor(95_000, CNY));
    }

    Ok(())
}

#[test]
fn new_bookings_use_the_current_price() -> TestResult {
    let schedule = DiscountSchedule::standard();
    let mut package = ServicePackage::new("Dog boarding", Money::from_minor(10_000, CNY));

    let first = package.book(&schedule, &date(2024, 8, 1), &date(2024, 8, 3), None)?;

    package.set_price_per_day(Money::from_minor(15_000, CNY));

    let second = package.book(&schedule, &date(2024, 8, 1), &date(2024, 8, 3), None)?;

    assert_eq!(first.total_price(), Money::from_minor(30_000, CNY));
    assert_eq!(second.total_price(), Money::from_minor(45_000, CNY));

    Ok(())
}

#[test]
fn refunds_are_based_on_the_snapshot() -> TestResult {
    let policy = PricingPolicy::default();
    let mut package = ServicePackage::new("Cat suite", Money::from_minor(10_000, CNY));

    let snapshot = package.book(&policy.schedule, &date(2024, 8, 1), &date(2024, 8, 10), None)?;

    package.set_price_per_day(Money::from_minor(50_000, CNY));

    let start = date(2024, 8, 1).at(14, 0, 0, 0).to_zoned(TimeZone::UTC)?;
    let end = date(2024, 8, 10).at(11, 0, 0, 0).to_zoned(TimeZone::UTC)?;
    let cancel_at = start.checked_sub(SignedDuration::from_hours(96))?;

    let refund = snapshot.refund(&policy.refunds, &start, &end, &cancel_at)?;

    assert_eq!(refund.refund_amount(), Money::from_minor(95_000, CNY));

    Ok(())
}
