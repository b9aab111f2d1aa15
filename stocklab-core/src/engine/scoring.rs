//! Four-factor weighted priority scoring.
//!
//! Each factor is independently capped; the total is their sum, defensively
//! clamped to 100. Tier conditions are evaluated in the documented order
//! and the first match wins, so the most severe condition always decides.
//! Every non-trivial factor appends a human-readable reason so a score can
//! be explained after the fact.

use crate::domain::{DerivedMetrics, FactorBreakdown, ProductSnapshot, ScoreResult};
use crate::engine::velocity::VelocityEstimate;
use crate::engine::EngineConfig;

/// Factor caps. Together they sum to exactly 100.
pub const STOCKOUT_RISK_CAP: u8 = 45;
pub const VELOCITY_CAP: u8 = 25;
pub const PROFITABILITY_CAP: u8 = 20;
pub const COMPETITION_CAP: u8 = 10;

/// Neutral velocity points when no rate was measured.
const VELOCITY_NEUTRAL: u8 = 10;
/// Neutral competition points when no competitor price is known.
const COMPETITION_NEUTRAL: u8 = 5;

/// Score one product from its snapshot, velocity estimate, and metrics.
pub fn score_product(
    product: &ProductSnapshot,
    velocity: &VelocityEstimate,
    metrics: &DerivedMetrics,
    config: &EngineConfig,
) -> ScoreResult {
    let mut reasons = Vec::new();

    let stockout_risk = stockout_risk_factor(product.stock_qty, metrics, config, &mut reasons);
    let velocity_pts = velocity_factor(velocity, &mut reasons);
    let profitability = profitability_factor(metrics.margin_pct, &mut reasons);
    let competition = competition_factor(metrics.price_gap_pct, &mut reasons);

    let factors = FactorBreakdown {
        stockout_risk,
        velocity: velocity_pts,
        profitability,
        competition,
    };

    // Redundant given the individual caps, enforced anyway.
    let total = factors.sum().min(100) as u8;

    ScoreResult {
        total,
        factors,
        reasons,
        margin_pct: metrics.margin_pct,
    }
}

/// Stockout risk, capped at 45. First matching tier wins.
fn stockout_risk_factor(
    stock_qty: u32,
    metrics: &DerivedMetrics,
    config: &EngineConfig,
    reasons: &mut Vec<String>,
) -> u8 {
    let cover = metrics.days_of_cover;

    if stock_qty == 0 {
        reasons.push("out of stock".into());
        return STOCKOUT_RISK_CAP;
    }
    if matches!(cover, Some(d) if d < 7) {
        reasons.push(format!("under a week of cover ({} days)", cover.unwrap_or(0)));
        return 40;
    }
    if stock_qty < config.critical_stock {
        reasons.push(format!("critically low stock ({} units)", stock_qty));
        return 35;
    }
    if matches!(cover, Some(d) if d < 14) {
        reasons.push(format!("under two weeks of cover ({} days)", cover.unwrap_or(0)));
        return 25;
    }
    if stock_qty < config.low_stock {
        reasons.push(format!("low stock ({} units)", stock_qty));
        return 20;
    }
    if matches!(cover, Some(d) if d < 30) {
        reasons.push(format!("under a month of cover ({} days)", cover.unwrap_or(0)));
        return 10;
    }
    0
}

/// Sales velocity, capped at 25. Unmeasured velocity scores a fixed
/// neutral value rather than 0, reflecting genuine uncertainty.
fn velocity_factor(velocity: &VelocityEstimate, reasons: &mut Vec<String>) -> u8 {
    let rate = match velocity.measured_rate() {
        Some(r) => r,
        None => {
            reasons.push("no measured sales history; demand unknown".into());
            return VELOCITY_NEUTRAL;
        }
    };

    if rate >= 3.0 {
        reasons.push(format!("very fast mover ({:.1}/day)", rate));
        VELOCITY_CAP
    } else if rate >= 1.5 {
        reasons.push(format!("fast mover ({:.1}/day)", rate));
        22
    } else if rate >= 0.7 {
        reasons.push(format!("steady mover ({:.1}/day)", rate));
        18
    } else if rate >= 0.3 {
        reasons.push(format!("moderate mover ({:.2}/day)", rate));
        12
    } else if rate >= 0.1 {
        6
    } else {
        2
    }
}

/// Profitability, capped at 20. Margin <= 0 scores exactly 0; the
/// classifier treats that as an override signal.
fn profitability_factor(margin_pct: f64, reasons: &mut Vec<String>) -> u8 {
    if margin_pct <= 0.0 {
        reasons.push("unprofitable at current prices".into());
        return 0;
    }
    if margin_pct >= 35.0 {
        reasons.push(format!("strong margin ({:.0}%)", margin_pct));
        PROFITABILITY_CAP
    } else if margin_pct >= 25.0 {
        reasons.push(format!("healthy margin ({:.0}%)", margin_pct));
        16
    } else if margin_pct >= 15.0 {
        12
    } else if margin_pct >= 8.0 {
        7
    } else {
        reasons.push(format!("thin margin ({:.1}%)", margin_pct));
        3
    }
}

/// Competitive position, capped at 10. Unknown gap scores neutral.
fn competition_factor(price_gap_pct: Option<f64>, reasons: &mut Vec<String>) -> u8 {
    let gap = match price_gap_pct {
        Some(g) => g,
        None => return COMPETITION_NEUTRAL,
    };

    if gap <= 0.0 {
        reasons.push("cheapest on the market".into());
        COMPETITION_CAP
    } else if gap <= 5.0 {
        reasons.push(format!("within 5% of cheapest competitor ({:.1}%)", gap));
        8
    } else if gap <= 10.0 {
        5
    } else if gap <= 20.0 {
        reasons.push(format!("priced {:.0}% above cheapest competitor", gap));
        2
    } else {
        reasons.push(format!("priced {:.0}% above cheapest competitor", gap));
        0
    }
}
