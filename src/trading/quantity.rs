//! Order quantity normalization

use rust_decimal::Decimal;

/// Convert a requested amount into the quantity to submit
///
/// Assets priced under one quote unit trade in whole units, so the amount is
/// floored; everything else keeps its fractional amount. The result is
/// checked against the pair's real lot size afterwards.
pub fn normalize_quantity(requested: Decimal, price: Decimal) -> Decimal {
    if price < Decimal::ONE {
        requested.floor()
    } else {
        requested
    }
}
