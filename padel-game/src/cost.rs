//! Upgrade pricing.
use crate::numbers::level_to_exponent;

/// Price of advancing an upgrade from `level` to `level + 1`.
///
/// `floor(base_cost * cost_multiplier^level)`; strictly increasing in `level`
/// whenever `cost_multiplier > 1` and the growth per level exceeds one point.
#[must_use]
pub fn upgrade_cost(base_cost: f64, cost_multiplier: f64, level: u32) -> f64 {
    (base_cost * cost_multiplier.powi(level_to_exponent(level))).floor()
}
