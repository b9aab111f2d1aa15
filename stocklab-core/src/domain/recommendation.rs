//! Suggested purchase orders.

use serde::{Deserialize, Serialize};

use super::action::OrderPriority;

/// A suggested reorder for one SKU.
///
/// `below_minimum` marks orders whose cost falls under the template's
/// minimum order value: the batch layer drops them from the actionable
/// list but still counts them in diagnostic totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecommendation {
    pub sku: String,
    pub quantity: u32,
    /// quantity x buying price.
    pub cost: f64,
    pub priority: OrderPriority,
    pub below_minimum: bool,
}
