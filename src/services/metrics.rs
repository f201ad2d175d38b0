//! Derived performance metrics
//!
//! Listing gain and current return are never stored; both are recomputed
//! from the record's price fields on every read.

use rust_decimal::Decimal;

/// Percentage change from `base` to `price`, rounded to 2 fraction digits.
///
/// Returns `None` unless both operands are present and `base` is strictly
/// positive. Missing operands propagate as "not available" rather than an
/// error.
pub fn percent_change(base: Option<Decimal>, price: Option<Decimal>) -> Option<Decimal> {
    match (base, price) {
        (Some(base), Some(price)) if base > Decimal::ZERO => {
            Some((Decimal::ONE_HUNDRED * (price - base) / base).round_dp(2))
        }
        _ => None,
    }
}

/// Listing gain: offer price to first listed price
pub fn listing_gain(
    ipo_price: Option<Decimal>,
    listing_price: Option<Decimal>,
) -> Option<Decimal> {
    percent_change(ipo_price, listing_price)
}

/// Current return: offer price to latest known market price
pub fn current_return(
    ipo_price: Option<Decimal>,
    current_market_price: Option<Decimal>,
) -> Option<Decimal> {
    percent_change(ipo_price, current_market_price)
}
