//! Derived inventory-health metrics, ephemeral per evaluation.

use serde::{Deserialize, Serialize};

/// Metrics computed from one snapshot plus its velocity estimate.
///
/// `None` always means "unknown", never zero: a product with no measured
/// velocity has unknown days of cover, which downstream scoring treats
/// differently from a verified zero-demand product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Estimated days until stockout. `Some(0)` when stock is already zero.
    pub days_of_cover: Option<u32>,
    /// Stock level that should trigger a reorder (lead time + safety stock).
    pub reorder_point: Option<u32>,
    /// (sell - buy) / sell as a percentage; 0 when either price is missing.
    pub margin_pct: f64,
    /// Percentage above (+) or below (-) the lowest competitor price.
    pub price_gap_pct: Option<f64>,
}
