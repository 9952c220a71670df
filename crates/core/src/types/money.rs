//! Price conversion for the payment provider.
//!
//! The backend stores prices in the currency's standard unit (dollars) as
//! JSON numbers. The payment provider expects integer minor units (cents).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency used when a line item does not name one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Convert a standard-unit amount to minor units, rounding half away from zero.
///
/// Returns `None` if the result does not fit in an `i64`.
///
/// ```
/// use babyshop_core::to_minor_units;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_minor_units(Decimal::new(1999, 2)), Some(1999));
/// assert_eq!(to_minor_units(Decimal::new(10005, 3)), Some(1001));
/// ```
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
