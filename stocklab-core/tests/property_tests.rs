//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Restock-only histories never yield a measured velocity
//! 2. Score is always in [0, 100] and each factor respects its cap
//! 3. Margin <= 0 always classifies as Stop
//! 4. Price gap > 15% always classifies as FixPrice unless margin <= 0
//! 5. Planned order quantities are never negative and cost = qty x buy

use chrono::NaiveDate;
use proptest::prelude::*;

use stocklab_core::domain::{ProductSnapshot, RecommendedAction, StockHistoryPoint};
use stocklab_core::engine::scoring::{
    COMPETITION_CAP, PROFITABILITY_CAP, STOCKOUT_RISK_CAP, VELOCITY_CAP,
};
use stocklab_core::engine::{evaluate_product, EngineConfig};
use stocklab_core::template::StrategyTemplate;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..2000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_product() -> impl Strategy<Value = ProductSnapshot> {
    (
        0u32..500,
        arb_price(),
        arb_price(),
        prop::option::of(arb_price()),
    )
        .prop_map(|(stock, buy, sell, competitor_low)| ProductSnapshot {
            sku: "SKU-P".into(),
            name: "Prop".into(),
            brand: "B".into(),
            supplier: "S".into(),
            category: "C".into(),
            stock_qty: stock,
            buying_price: buy,
            selling_price: sell,
            competitor_low,
            competitor_high: None,
            desi: None,
        })
}

/// History with only non-decreasing quantities (restocks, never sales).
fn arb_restock_history() -> impl Strategy<Value = Vec<StockHistoryPoint>> {
    (prop::collection::vec(0u32..50, 0..12), 1u32..20).prop_map(|(increments, stride)| {
        let mut qty = 5u32;
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        increments
            .iter()
            .enumerate()
            .map(|(i, inc)| {
                qty += inc;
                StockHistoryPoint {
                    sku: "SKU-P".into(),
                    quantity: qty,
                    observed_on: base + chrono::Duration::days((i as u32 * stride) as i64),
                }
            })
            .collect()
    })
}

fn arb_history() -> impl Strategy<Value = Vec<StockHistoryPoint>> {
    prop::collection::vec((0u32..200, 0i64..90), 0..20).prop_map(|pairs| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        pairs
            .into_iter()
            .map(|(qty, offset)| StockHistoryPoint {
                sku: "SKU-P".into(),
                quantity: qty,
                observed_on: base + chrono::Duration::days(offset),
            })
            .collect()
    })
}

// ── 1. Restocks are not sales ────────────────────────────────────────

proptest! {
    /// A history with only non-negative quantity changes must never
    /// produce a measured velocity: unknown, not zero, not negative.
    #[test]
    fn restock_only_history_measures_nothing(history in arb_restock_history()) {
        let p = ProductSnapshot {
            sku: "SKU-P".into(),
            name: "Prop".into(),
            brand: "B".into(),
            supplier: "S".into(),
            category: "C".into(),
            stock_qty: 10,
            buying_price: 50.0,
            selling_price: 80.0,
            competitor_low: None,
            competitor_high: None,
            desi: None,
        };
        let eval = evaluate_product(
            &p,
            &history,
            &StrategyTemplate::weekly_90(),
            &EngineConfig::default(),
        );
        prop_assert!(eval.velocity.measured_rate().is_none());
    }
}

// ── 2. Score bounds ──────────────────────────────────────────────────

proptest! {
    /// Score stays in [0, 100]; each factor never exceeds its cap.
    #[test]
    fn score_and_factors_are_bounded(
        product in arb_product(),
        history in arb_history(),
    ) {
        let eval = evaluate_product(
            &product,
            &history,
            &StrategyTemplate::weekly_90(),
            &EngineConfig::default(),
        );
        prop_assert!(eval.score.total <= 100);
        prop_assert!(eval.score.factors.stockout_risk <= STOCKOUT_RISK_CAP);
        prop_assert!(eval.score.factors.velocity <= VELOCITY_CAP);
        prop_assert!(eval.score.factors.profitability <= PROFITABILITY_CAP);
        prop_assert!(eval.score.factors.competition <= COMPETITION_CAP);
        prop_assert_eq!(eval.score.total as u32, eval.score.factors.sum().min(100));
    }
}

// ── 3 & 4. Classifier overrides ──────────────────────────────────────

proptest! {
    /// Margin <= 0 is always Stop, regardless of everything else.
    #[test]
    fn non_positive_margin_always_stops(
        product in arb_product(),
        history in arb_history(),
    ) {
        let mut product = product;
        // Force buying >= selling so the margin is non-positive.
        product.buying_price = product.selling_price + 1.0;
        let eval = evaluate_product(
            &product,
            &history,
            &StrategyTemplate::weekly_90(),
            &EngineConfig::default(),
        );
        prop_assert_eq!(eval.action, RecommendedAction::Stop);
    }

    /// Gap > 15% is FixPrice unless the margin override fires first.
    #[test]
    fn wide_gap_fixes_price_unless_unprofitable(
        product in arb_product(),
        history in arb_history(),
        gap_pct in 15.1..80.0_f64,
    ) {
        let mut product = product;
        product.competitor_low = Some(product.selling_price / (1.0 + gap_pct / 100.0));
        let eval = evaluate_product(
            &product,
            &history,
            &StrategyTemplate::weekly_90(),
            &EngineConfig::default(),
        );
        if eval.metrics.margin_pct <= 0.0 {
            prop_assert_eq!(eval.action, RecommendedAction::Stop);
        } else {
            prop_assert_eq!(eval.action, RecommendedAction::FixPrice);
        }
    }
}

// ── 5. Planner sanity ────────────────────────────────────────────────

proptest! {
    /// Recommendations always carry a positive quantity and a consistent cost.
    #[test]
    fn recommendations_are_consistent(
        product in arb_product(),
        history in arb_history(),
    ) {
        let eval = evaluate_product(
            &product,
            &history,
            &StrategyTemplate::biweekly_60(),
            &EngineConfig::default(),
        );
        if let Some(rec) = &eval.recommendation {
            prop_assert_eq!(eval.action, RecommendedAction::Order);
            prop_assert!(rec.quantity > 0);
            let expected = rec.quantity as f64 * product.buying_price;
            prop_assert!((rec.cost - expected).abs() < 1e-9);
        }
    }
}
