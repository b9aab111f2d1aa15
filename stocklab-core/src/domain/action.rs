//! Recommended actions and order priority labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification for one product. No further state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    /// Replenish: stock urgency justifies a purchase order.
    Order,
    /// Keep observing: not enough urgency or confidence to act.
    Watch,
    /// Selling price is materially above the cheapest competitor; fix the
    /// price before ordering more stock.
    FixPrice,
    /// Do not reorder: unprofitable or no demand signal.
    Stop,
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecommendedAction::Order => "ORDER",
            RecommendedAction::Watch => "WATCH",
            RecommendedAction::FixPrice => "FIX_PRICE",
            RecommendedAction::Stop => "STOP",
        };
        f.write_str(s)
    }
}

/// Priority label derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPriority {
    Low,
    Medium,
    High,
}

impl OrderPriority {
    /// Score >= 70 is High, >= 40 is Medium, anything below is Low.
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => OrderPriority::High,
            40..=69 => OrderPriority::Medium,
            _ => OrderPriority::Low,
        }
    }
}

impl fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderPriority::Low => "LOW",
            OrderPriority::Medium => "MEDIUM",
            OrderPriority::High => "HIGH",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_thresholds() {
        assert_eq!(OrderPriority::from_score(100), OrderPriority::High);
        assert_eq!(OrderPriority::from_score(70), OrderPriority::High);
        assert_eq!(OrderPriority::from_score(69), OrderPriority::Medium);
        assert_eq!(OrderPriority::from_score(40), OrderPriority::Medium);
        assert_eq!(OrderPriority::from_score(39), OrderPriority::Low);
        assert_eq!(OrderPriority::from_score(0), OrderPriority::Low);
    }

    #[test]
    fn action_serializes_screaming_snake() {
        let json = serde_json::to_string(&RecommendedAction::FixPrice).unwrap();
        assert_eq!(json, "\"FIX_PRICE\"");
    }
}
