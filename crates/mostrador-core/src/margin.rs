//! # Margin Computation
//!
//! Profit margin as a percentage markup over cost:
//! `(price - cost) / cost * 100`.
//!
//! Money is integer cents everywhere; the margin percentage is the one
//! derived floating-point value in the system. The same formula is also
//! expressed in SQL inside the price-update statement (see
//! `mostrador-db::repository::price`) so a concurrent update can never
//! store a margin that disagrees with its inputs.

/// Computes the margin percentage for a price/cost pair.
///
/// Returns `None` when cost is absent or not positive: a margin over an
/// unknown or zero cost is meaningless, and division by zero is not a
/// price strategy.
///
/// ## Example
/// ```rust
/// use mostrador_core::margin::margin_percent;
///
/// assert_eq!(margin_percent(1500, Some(1000)), Some(50.0));
/// assert_eq!(margin_percent(1000, Some(0)), None);
/// assert_eq!(margin_percent(1000, None), None);
/// ```
pub fn margin_percent(price_cents: i64, cost_cents: Option<i64>) -> Option<f64> {
    match cost_cents {
        Some(cost) if cost > 0 => Some((price_cents - cost) as f64 / cost as f64 * 100.0),
        _ => None,
    }
}
