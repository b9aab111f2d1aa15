//! Action classification — a fixed-order decision tree.
//!
//! The rule order is business policy: profitability and pricing problems
//! override stock urgency. Do not reorder the rules.

use crate::domain::{DerivedMetrics, RecommendedAction, ScoreResult};
use crate::engine::velocity::VelocityEstimate;

/// Price gap above which ordering more stock is wasteful until the price
/// is fixed.
pub const FIX_PRICE_GAP_PCT: f64 = 15.0;

/// Score floor for an ordinary reorder.
const ORDER_SCORE: u8 = 50;
/// Score floor for a zero-stock reorder.
const ORDER_SCORE_ZERO_STOCK: u8 = 30;
/// Score floor below which a product is not even worth watching.
const WATCH_SCORE: u8 = 25;

/// Classify one product. First matching rule wins.
pub fn classify(
    stock_qty: u32,
    score: &ScoreResult,
    metrics: &DerivedMetrics,
    velocity: &VelocityEstimate,
) -> RecommendedAction {
    // 1. Never recommend ordering an unprofitable product.
    if metrics.margin_pct <= 0.0 {
        return RecommendedAction::Stop;
    }

    // 2. Materially above competitors: fix the price first.
    if matches!(metrics.price_gap_pct, Some(gap) if gap > FIX_PRICE_GAP_PCT) {
        return RecommendedAction::FixPrice;
    }

    // 3. High score and depleted (or below the reorder point).
    let below_reorder_point = matches!(metrics.reorder_point, Some(rop) if stock_qty < rop);
    if score.total >= ORDER_SCORE && (stock_qty == 0 || below_reorder_point) {
        return RecommendedAction::Order;
    }

    // 4. Zero stock with a modest score still orders.
    if stock_qty == 0 && score.total >= ORDER_SCORE_ZERO_STOCK {
        return RecommendedAction::Order;
    }

    // 5. Worth watching, or not enough information to stop.
    if score.total >= WATCH_SCORE || velocity.is_unmeasured() {
        return RecommendedAction::Watch;
    }

    RecommendedAction::Stop
}
