//! Priority score result with per-factor breakdown and reasons.

use serde::{Deserialize, Serialize};

/// Contribution of each scoring factor, bounded by its documented cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// Stockout risk, capped at 45.
    pub stockout_risk: u8,
    /// Sales velocity, capped at 25.
    pub velocity: u8,
    /// Profitability, capped at 20.
    pub profitability: u8,
    /// Competitive position, capped at 10.
    pub competition: u8,
}

impl FactorBreakdown {
    pub fn sum(&self) -> u32 {
        self.stockout_risk as u32
            + self.velocity as u32
            + self.profitability as u32
            + self.competition as u32
    }
}

/// Full scoring output for one product.
///
/// `reasons` holds human-readable explanations in factor evaluation order
/// (stockout risk, velocity, profitability, competition) so every score is
/// reproducible and explainable after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Total score in [0, 100].
    pub total: u8,
    pub factors: FactorBreakdown,
    pub reasons: Vec<String>,
    pub margin_pct: f64,
}
