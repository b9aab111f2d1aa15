//! Order quantity planning under a strategy template.

use crate::domain::{OrderPriority, OrderRecommendation, ProductSnapshot};
use crate::engine::velocity::VelocityEstimate;
use crate::template::StrategyTemplate;

/// Suggest a reorder quantity for one product.
///
/// `target_stock = ceil(rate x coverage x safety)`; the order is the
/// shortfall against current stock. The planning rate may be price-band
/// estimated — a stocked-out item with no history still gets a quantity.
/// Returns `None` when there is nothing to order.
///
/// When even the fallback rate is unavailable and the product is stocked
/// out, a minimum order of 1 unit is suggested rather than silently
/// skipping the SKU.
pub fn suggest_order(
    product: &ProductSnapshot,
    velocity: &VelocityEstimate,
    score_total: u8,
    template: &StrategyTemplate,
) -> Option<OrderRecommendation> {
    let quantity = match velocity.planning_rate() {
        Some(rate) => {
            let target = (rate
                * template.coverage_target_days as f64
                * template.safety_multiplier)
                .ceil() as u32;
            target.saturating_sub(product.stock_qty)
        }
        None if product.stock_qty == 0 => 1,
        None => 0,
    };

    if quantity == 0 {
        return None;
    }

    let cost = quantity as f64 * product.buying_price;
    Some(OrderRecommendation {
        sku: product.sku.clone(),
        quantity,
        cost,
        priority: OrderPriority::from_score(score_total),
        below_minimum: cost < template.min_order_value,
    })
}
