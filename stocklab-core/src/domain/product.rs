//! ProductSnapshot — the fundamental catalog input unit.

use serde::{Deserialize, Serialize};

/// One product row as produced by the external catalog sync.
///
/// The engine treats snapshots as read-only: every derived value is a pure
/// function of the snapshot, its stock history, and the active template.
/// Competitor prices come from a separate price feed and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub supplier: String,
    pub category: String,
    pub stock_qty: u32,
    pub buying_price: f64,
    pub selling_price: f64,
    pub competitor_low: Option<f64>,
    pub competitor_high: Option<f64>,
    /// Volumetric weight ("desi"), carried for export but unused by the engine.
    pub desi: Option<f64>,
}

impl ProductSnapshot {
    /// Basic sanity check: prices are finite and non-negative, SKU is non-empty.
    pub fn is_sane(&self) -> bool {
        !self.sku.is_empty()
            && self.buying_price.is_finite()
            && self.selling_price.is_finite()
            && self.buying_price >= 0.0
            && self.selling_price >= 0.0
            && self.competitor_low.map_or(true, |p| p.is_finite())
            && self.competitor_high.map_or(true, |p| p.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> ProductSnapshot {
        ProductSnapshot {
            sku: "SKU-1001".into(),
            name: "Espresso Grinder".into(),
            brand: "Brewline".into(),
            supplier: "Acme Wholesale".into(),
            category: "Kitchen".into(),
            stock_qty: 12,
            buying_price: 40.0,
            selling_price: 65.0,
            competitor_low: Some(59.9),
            competitor_high: Some(89.0),
            desi: Some(3.5),
        }
    }

    #[test]
    fn product_is_sane() {
        assert!(sample_product().is_sane());
    }

    #[test]
    fn product_rejects_nan_price() {
        let mut p = sample_product();
        p.selling_price = f64::NAN;
        assert!(!p.is_sane());
    }

    #[test]
    fn product_rejects_empty_sku() {
        let mut p = sample_product();
        p.sku.clear();
        assert!(!p.is_sane());
    }

    #[test]
    fn product_serialization_roundtrip() {
        let p = sample_product();
        let json = serde_json::to_string(&p).unwrap();
        let deser: ProductSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(p.sku, deser.sku);
        assert_eq!(p.stock_qty, deser.stock_qty);
        assert_eq!(p.competitor_low, deser.competitor_low);
    }
}
