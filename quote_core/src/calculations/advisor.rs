//! # Small-Piece Advisor
//!
//! Short, light prints end up with a unit price that is hard to sell on its
//! own. The advisor compares the computed price against a market target and
//! proposes a minimum batch with a volume discount.
//!
//! The result is informational only; it never blocks adding a piece.

use serde::{Deserialize, Serialize};

/// Pieces printing faster than this (hours) are considered small
pub const TIME_THRESHOLD_HOURS: f64 = 2.0;

/// Pieces lighter than this (grams) are considered small
pub const GRAMS_THRESHOLD: f64 = 25.0;

/// Unit prices above this are checked against the target
pub const PRICE_THRESHOLD: f64 = 60.0;

/// Upper bound of the volume discount in percent
pub const MAX_VOLUME_DISCOUNT_PERCENT: f64 = 30.0;

/// Discount granted per unit beyond the first, in percent
const DISCOUNT_STEP_PERCENT: f64 = 3.0;

/// Batch suggestion for an under-priced piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmallPieceAdvisory {
    /// Unit price that was evaluated
    pub current_price: f64,
    /// Market target for a piece of this size
    pub target_price: f64,
    /// Smallest batch that reaches the current price at the target
    pub minimum_quantity: u32,
    pub volume_discount_percent: f64,
    pub discounted_unit_price: f64,
    /// Savings across the whole suggested batch
    pub total_savings: f64,
}

/// Target unit price for a piece, tiered by print time with mass surcharges.
pub fn target_price(time_hours: f64, grams_used: f64) -> f64 {
    let mut target = if time_hours < 1.0 {
        15.0
    } else if time_hours < 1.5 {
        20.0
    } else {
        // Under 2h and the fallback share the same tier
        25.0
    };

    if grams_used > 15.0 {
        target += 5.0;
    }
    if grams_used > 30.0 {
        target += 10.0;
    }

    target
}

/// Evaluate a priced piece.
///
/// Returns `None` unless the piece is short (`time < 2h`), light
/// (`grams < 25`) or expensive (`price > 60`). All comparisons are strict.
///
/// ```rust
/// use quote_core::calculations::advisor::evaluate;
///
/// let advisory = evaluate(93.85, 1.5, 29.8).unwrap();
/// assert_eq!(advisory.target_price, 30.0);
/// assert_eq!(advisory.minimum_quantity, 4);
///
/// assert!(evaluate(55.0, 3.0, 40.0).is_none());
/// ```
pub fn evaluate(final_unit_price: f64, time_hours: f64, grams_used: f64) -> Option<SmallPieceAdvisory> {
    let is_small = time_hours < TIME_THRESHOLD_HOURS
        || grams_used < GRAMS_THRESHOLD
        || final_unit_price > PRICE_THRESHOLD;
    if !is_small {
        return None;
    }

    let target = target_price(time_hours, grams_used);
    let minimum_quantity = (final_unit_price / target).ceil().max(0.0) as u32;

    let volume_discount_percent = ((f64::from(minimum_quantity) - 1.0) * DISCOUNT_STEP_PERCENT)
        .clamp(0.0, MAX_VOLUME_DISCOUNT_PERCENT);
    let discounted_unit_price = final_unit_price * (1.0 - volume_discount_percent / 100.0);
    let total_savings = (final_unit_price - discounted_unit_price) * f64::from(minimum_quantity);

    Some(SmallPieceAdvisory {
        current_price: final_unit_price,
        target_price: target,
        minimum_quantity,
        volume_discount_percent,
        discounted_unit_price,
        total_savings,
    })
}
