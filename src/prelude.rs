//! Foster pricing prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bookings::{BookingStatus, PriceSnapshot, ServicePackage},
    clock::{Clock, FixedClock, SystemClock},
    dates::{CalendarDay, days_between, parse_date, parse_instant},
    discounts::{DiscountSchedule, DiscountTier, discount_rate_for_duration},
    error::PricingError,
    money::parse_money,
    policy::{PolicyError, PricingPolicy},
    pricing::{PriceBreakdown, price_breakdown, price_breakdown_for_dates},
    receipt::ReceiptError,
    refunds::{
        CancellationCheck, RefundCalculation, RefundClassification, RefundPolicy, RefundReason,
        RefundRequest, calculate_refund, can_cancel,
    },
};
