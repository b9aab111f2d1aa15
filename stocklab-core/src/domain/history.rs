//! Stock history observations — sparse, unordered, possibly absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single periodic stock-level observation for one SKU.
///
/// Observations arrive as an unordered bag covering at most the last ~90
/// days. Gaps, duplicate dates, and empty histories are all normal; the
/// velocity estimator normalizes all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHistoryPoint {
    pub sku: String,
    pub quantity: u32,
    pub observed_on: NaiveDate,
}

/// Sort observations chronologically, oldest first.
///
/// Stable sort: duplicate dates keep their input order, which the pairwise
/// velocity walk then treats as a zero-day span.
pub fn sort_chronological(points: &mut [StockHistoryPoint]) {
    points.sort_by_key(|p| p.observed_on);
}
