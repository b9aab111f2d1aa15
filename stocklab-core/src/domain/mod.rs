//! Domain types: products, history, metrics, scores, actions, orders.

mod action;
mod history;
mod metrics;
mod product;
mod recommendation;
mod score;

pub use action::{OrderPriority, RecommendedAction};
pub use history::{sort_chronological, StockHistoryPoint};
pub use metrics::DerivedMetrics;
pub use product::ProductSnapshot;
pub use recommendation::OrderRecommendation;
pub use score::{FactorBreakdown, ScoreResult};
