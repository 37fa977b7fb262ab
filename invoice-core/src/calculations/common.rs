//! Shared arithmetic helpers for invoice calculations.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero). Called only at presentation
/// time; intermediate amounts stay unrounded so rounding error cannot compound
/// across line items.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use invoice_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(123.456)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `pct` percent of `amount`, unrounded, or `None` when the
/// product overflows the decimal range.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use invoice_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(250.00), dec!(10)), Some(dec!(25.000)));
/// assert_eq!(percent_of(dec!(225.00), dec!(20)), Some(dec!(45.0000)));
/// ```
pub fn percent_of(
    amount: Decimal,
    pct: Decimal,
) -> Option<Decimal> {
    amount
        .checked_mul(pct)
        .map(|product| product / Decimal::ONE_HUNDRED)
}
