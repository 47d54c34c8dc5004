//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::models::OrderItem;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed catalog price per item
pub const MAX_PRICE: f64 = 10_000.0;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an f64 amount to cents
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// quantity × unit_price, rounded
pub fn line_total(quantity: i64, unit_price: f64) -> Decimal {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Σ quantity × unit_price over the given lines
pub fn order_total(items: &[OrderItem]) -> f64 {
    let total = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc + line_total(item.quantity, item.unit_price));
    to_f64(total)
}

/// Check that a price is finite, positive and within the catalog limit
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0 && price <= MAX_PRICE
}

/// Format an amount with two decimals for documents
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", to_decimal(value).round_dp_with_strategy(
        DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    ))
}
