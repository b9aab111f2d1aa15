//! Sales velocity estimation from irregular stock snapshots.
//!
//! The estimator walks chronologically consecutive observation pairs and
//! sums only positive quantity drops; restocks contribute nothing. Total
//! inferred sales divided by the calendar span (minimum 1 day) gives the
//! daily rate. Fewer than two points, or a window with zero inferred
//! sales, means the measured velocity is unknown — explicitly `None`,
//! never coerced to zero, so "no data" and "verified zero demand" stay
//! distinguishable downstream.

use serde::{Deserialize, Serialize};

use crate::domain::{sort_chronological, StockHistoryPoint};

// ---------------------------------------------------------------------------
// Price-band fallback table.
//
// When no velocity can be measured, a coarse daily rate is guessed from the
// selling price alone: cheap items are assumed to turn over faster. This is
// a replaceable policy table, not an algorithmic contract; tests pin only
// its monotonicity.
// ---------------------------------------------------------------------------

/// (upper price bound, assumed units/day), evaluated in order.
const PRICE_BANDS: &[(f64, f64)] = &[
    (50.0, 0.50),
    (150.0, 0.25),
    (400.0, 0.12),
    (1000.0, 0.05),
];

/// Assumed rate for items above the last price band.
const PRICE_BAND_FLOOR_RATE: f64 = 0.02;

/// Minimum calendar span used as the rate denominator.
const MIN_SPAN_DAYS: i64 = 1;

/// Velocity estimate for one SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityEstimate {
    /// Units per day. Measured from history, or price-band guessed when
    /// `estimated` is true. `None` only when neither is possible.
    pub daily_rate: Option<f64>,
    /// True when `daily_rate` came from the price-band fallback.
    pub estimated: bool,
    /// How many history points fed the estimate.
    pub observations: usize,
}

impl VelocityEstimate {
    /// The rate, only if it was actually measured from history.
    pub fn measured_rate(&self) -> Option<f64> {
        if self.estimated {
            None
        } else {
            self.daily_rate
        }
    }

    /// The rate usable for order planning: measured or estimated.
    pub fn planning_rate(&self) -> Option<f64> {
        self.daily_rate
    }

    /// True when no velocity was measured (the fallback may still have
    /// provided a planning rate).
    pub fn is_unmeasured(&self) -> bool {
        self.measured_rate().is_none()
    }
}

/// Estimate daily sales velocity from one SKU's history window.
///
/// Input order does not matter; duplicate dates and single points
/// normalize to "unknown measured velocity", which then falls back to the
/// price bands when the selling price is positive.
pub fn estimate_velocity(history: &[StockHistoryPoint], selling_price: f64) -> VelocityEstimate {
    let observations = history.len();

    if let Some(rate) = measure_rate(history) {
        return VelocityEstimate {
            daily_rate: Some(rate),
            estimated: false,
            observations,
        };
    }

    let fallback = price_band_rate(selling_price);
    VelocityEstimate {
        daily_rate: fallback,
        estimated: fallback.is_some(),
        observations,
    }
}

/// Measured rate from pairwise positive drops, or `None` when unknown.
fn measure_rate(history: &[StockHistoryPoint]) -> Option<f64> {
    if history.len() < 2 {
        return None;
    }

    let mut points = history.to_vec();
    sort_chronological(&mut points);

    let mut sold: u64 = 0;
    for pair in points.windows(2) {
        let prev = pair[0].quantity;
        let next = pair[1].quantity;
        if prev > next {
            sold += (prev - next) as u64;
        }
        // Increases are restocks, not negative sales.
    }

    if sold == 0 {
        return None;
    }

    let span_days = (points[points.len() - 1].observed_on - points[0].observed_on)
        .num_days()
        .max(MIN_SPAN_DAYS);

    Some(sold as f64 / span_days as f64)
}

/// Coarse daily-rate guess from the selling price, `None` when the price
/// itself is unusable.
fn price_band_rate(selling_price: f64) -> Option<f64> {
    if !selling_price.is_finite() || selling_price <= 0.0 {
        return None;
    }
    for &(bound, rate) in PRICE_BANDS {
        if selling_price < bound {
            return Some(rate);
        }
    }
    Some(PRICE_BAND_FLOOR_RATE)
}
