//! Foster Pricing
//!
//! Pricing and refund rules for a pet-fostering marketplace: inclusive day counts,
//! duration discounts, itemised price breakdowns, booking price snapshots and
//! cancellation refunds.
//!
//! All amounts are integer minor units held in [`rusty_money::Money`]; every derived
//! amount is rounded exactly once, half away from zero.

pub mod bookings;
pub mod clock;
pub mod dates;
pub mod discounts;
pub mod error;
pub mod money;
pub mod policy;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod refunds;
