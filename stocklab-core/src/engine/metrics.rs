//! Derived metrics — pure functions from snapshot + velocity to health numbers.
//!
//! Every ratio guards its denominator and short-circuits to `None`/0 with a
//! defined meaning. Nothing here can panic or divide by zero.

use crate::domain::{DerivedMetrics, ProductSnapshot};
use crate::engine::EngineConfig;

/// Compute all derived metrics for one product.
///
/// `measured_rate` is the *measured* daily sales rate; price-band estimates
/// deliberately do not feed days-of-cover or the reorder point, so those
/// stay `None` when demand was never observed.
pub fn derive_metrics(
    product: &ProductSnapshot,
    measured_rate: Option<f64>,
    config: &EngineConfig,
) -> DerivedMetrics {
    DerivedMetrics {
        days_of_cover: days_of_cover(product.stock_qty, measured_rate),
        reorder_point: reorder_point(measured_rate, config),
        margin_pct: margin_pct(product.buying_price, product.selling_price),
        price_gap_pct: price_gap_pct(product.selling_price, product.competitor_low),
    }
}

/// stock / rate, rounded. Zero stock is always 0 days; unknown rate is `None`.
pub fn days_of_cover(stock_qty: u32, measured_rate: Option<f64>) -> Option<u32> {
    if stock_qty == 0 {
        return Some(0);
    }
    let rate = measured_rate?;
    if rate <= 0.0 {
        return None;
    }
    Some((stock_qty as f64 / rate).round() as u32)
}

/// ceil(rate x (lead time + safety stock)), `None` when rate is unknown.
pub fn reorder_point(measured_rate: Option<f64>, config: &EngineConfig) -> Option<u32> {
    let rate = measured_rate?;
    if rate <= 0.0 {
        return None;
    }
    let horizon = (config.lead_time_days + config.safety_stock_days) as f64;
    Some((rate * horizon).ceil() as u32)
}

/// (sell - buy) / sell x 100 when both prices are positive, else 0.
pub fn margin_pct(buying_price: f64, selling_price: f64) -> f64 {
    if buying_price <= 0.0 || selling_price <= 0.0 {
        return 0.0;
    }
    (selling_price - buying_price) / selling_price * 100.0
}

/// (sell - competitor low) / competitor low x 100; `None` without usable
/// competitor data.
pub fn price_gap_pct(selling_price: f64, competitor_low: Option<f64>) -> Option<f64> {
    let low = competitor_low?;
    if low <= 0.0 || selling_price <= 0.0 {
        return None;
    }
    Some((selling_price - low) / low * 100.0)
}
