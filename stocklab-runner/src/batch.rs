//! Parallel batch evaluation with deterministic ranking.
//!
//! Per-SKU evaluations are independent pure computations, so they fan out
//! over the rayon pool in chunks; the sort/aggregate step is the barrier.
//! Cancellation is cooperative at chunk boundaries — a cancelled run
//! returns an error and no partial output (the engine never writes, so
//! there is no partial state to corrupt).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use stocklab_core::domain::{OrderPriority, ProductSnapshot, RecommendedAction};
use stocklab_core::engine::{evaluate_product, ProductEvaluation};
use stocklab_core::template::StrategyTemplate;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::config::{BatchConfig, ConfigError};

/// SKUs per cancellation check.
const CHUNK_SIZE: usize = 256;

/// Errors from a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch run cancelled")]
    Cancelled,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Shared cancellation flag, checked between chunks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Top-level KPIs for one batch run.
///
/// All KPI values cover the *full* evaluated set, before the result limit
/// truncates the ranked list. Grouped summaries, by contrast, describe the
/// limited list the reader actually sees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchKpis {
    pub evaluated: usize,
    /// Products skipped due to per-SKU read failures.
    pub skipped: usize,
    pub out_of_stock: usize,
    /// In stock but below the critical threshold.
    pub critical_stock: usize,
    /// Mean total score across the evaluated set.
    pub avg_score: f64,
    /// Sum of actionable (at-or-above-minimum) suggested order costs.
    pub total_order_cost: f64,
    /// Orders dropped for falling below the template's minimum value.
    pub dropped_orders: usize,
    pub dropped_order_cost: f64,
    /// Daily revenue at risk from stocked-out SKUs with measured demand.
    pub revenue_at_risk_daily: f64,
}

/// Result of one batch run, before report assembly.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub template: StrategyTemplate,
    /// Ranked and limited evaluations.
    pub items: Vec<ProductEvaluation>,
    pub kpis: BatchKpis,
    pub action_distribution: BTreeMap<RecommendedAction, usize>,
    pub priority_distribution: BTreeMap<OrderPriority, usize>,
}

/// Run the full pipeline over the filtered catalog.
pub fn run_batch(
    catalog: &dyn ProductCatalog,
    config: &BatchConfig,
    cancel: &CancelToken,
) -> Result<BatchRun, BatchError> {
    config.validate()?;
    let template = config.resolve_template()?;

    let started = Instant::now();
    let products = catalog.products(&config.filter)?;
    info!(
        products = products.len(),
        template = %template.name,
        "starting batch evaluation"
    );

    let (mut evaluations, skipped) =
        evaluate_all(catalog, &products, &template, config, cancel)?;

    sort_deterministic(&mut evaluations);

    let kpis = compute_kpis(&evaluations, config, skipped);
    let action_distribution = action_distribution(&evaluations);
    let priority_distribution = priority_distribution(&evaluations);

    evaluations.truncate(config.limit);

    info!(
        evaluated = kpis.evaluated,
        skipped = kpis.skipped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch evaluation finished"
    );

    Ok(BatchRun {
        template,
        items: evaluations,
        kpis,
        action_distribution,
        priority_distribution,
    })
}

/// Evaluate every product, in parallel chunks with cooperative cancellation.
///
/// Returns the successful evaluations plus a skipped tally: a single SKU
/// whose history read fails must not abort the batch.
fn evaluate_all(
    catalog: &dyn ProductCatalog,
    products: &[ProductSnapshot],
    template: &StrategyTemplate,
    config: &BatchConfig,
    cancel: &CancelToken,
) -> Result<(Vec<ProductEvaluation>, usize), BatchError> {
    let evaluate_chunk = |chunk: &[ProductSnapshot]| -> Result<Vec<Option<ProductEvaluation>>, BatchError> {
        if cancel.is_cancelled() {
            return Err(BatchError::Cancelled);
        }
        Ok(chunk
            .iter()
            .map(|product| evaluate_one(catalog, product, template, config))
            .collect())
    };

    let chunk_results: Result<Vec<Vec<Option<ProductEvaluation>>>, BatchError> =
        if config.parallel {
            products.par_chunks(CHUNK_SIZE).map(evaluate_chunk).collect()
        } else {
            products.chunks(CHUNK_SIZE).map(evaluate_chunk).collect()
        };

    let mut evaluations = Vec::with_capacity(products.len());
    let mut skipped = 0usize;
    for maybe in chunk_results?.into_iter().flatten() {
        match maybe {
            Some(eval) => evaluations.push(eval),
            None => skipped += 1,
        }
    }
    Ok((evaluations, skipped))
}

/// Evaluate one product; `None` means skipped (counted, never fatal).
fn evaluate_one(
    catalog: &dyn ProductCatalog,
    product: &ProductSnapshot,
    template: &StrategyTemplate,
    config: &BatchConfig,
) -> Option<ProductEvaluation> {
    if !product.is_sane() {
        warn!(sku = %product.sku, "skipping insane product row");
        return None;
    }
    let history = match catalog.history(&product.sku) {
        Ok(h) => h,
        Err(e) => {
            warn!(sku = %product.sku, error = %e, "skipping product: history read failed");
            return None;
        }
    };
    debug!(sku = %product.sku, points = history.len(), "evaluating");
    Some(evaluate_product(product, &history, template, &config.engine))
}

/// Total order: score descending, stock ascending (more depleted first),
/// SKU lexicographic as the final tiebreak.
fn sort_deterministic(evaluations: &mut [ProductEvaluation]) {
    evaluations.sort_by(|a, b| {
        b.score
            .total
            .cmp(&a.score.total)
            .then_with(|| a.stock_qty.cmp(&b.stock_qty))
            .then_with(|| a.sku.cmp(&b.sku))
    });
}

fn compute_kpis(
    evaluations: &[ProductEvaluation],
    config: &BatchConfig,
    skipped: usize,
) -> BatchKpis {
    let mut kpis = BatchKpis {
        evaluated: evaluations.len(),
        skipped,
        ..Default::default()
    };

    let mut score_sum = 0u64;
    for eval in evaluations {
        score_sum += eval.score.total as u64;

        if eval.stock_qty == 0 {
            kpis.out_of_stock += 1;
            if let Some(rate) = eval.velocity.measured_rate() {
                kpis.revenue_at_risk_daily += rate * eval.selling_price;
            }
        } else if eval.stock_qty < config.engine.critical_stock {
            kpis.critical_stock += 1;
        }

        if let Some(rec) = &eval.recommendation {
            if rec.below_minimum {
                kpis.dropped_orders += 1;
                kpis.dropped_order_cost += rec.cost;
            } else {
                kpis.total_order_cost += rec.cost;
            }
        }
    }

    if !evaluations.is_empty() {
        kpis.avg_score = score_sum as f64 / evaluations.len() as f64;
    }

    kpis
}

fn action_distribution(
    evaluations: &[ProductEvaluation],
) -> BTreeMap<RecommendedAction, usize> {
    let mut dist = BTreeMap::new();
    for eval in evaluations {
        *dist.entry(eval.action).or_insert(0) += 1;
    }
    dist
}

fn priority_distribution(
    evaluations: &[ProductEvaluation],
) -> BTreeMap<OrderPriority, usize> {
    let mut dist = BTreeMap::new();
    for eval in evaluations {
        if let Some(rec) = &eval.recommendation {
            *dist.entry(rec.priority).or_insert(0) += 1;
        }
    }
    dist
}

/// Compare two ranked lists for byte-identical ordering (test helper and
/// idempotence check).
pub fn same_ranking(a: &[ProductEvaluation], b: &[ProductEvaluation]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| {
            x.sku == y.sku && x.score.total == y.score.total && x.stock_qty == y.stock_qty
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocklab_core::domain::{FactorBreakdown, ScoreResult};

    fn eval(sku: &str, score: u8, stock: u32) -> ProductEvaluation {
        ProductEvaluation {
            sku: sku.into(),
            name: format!("P {sku}"),
            brand: "B".into(),
            supplier: "S".into(),
            category: "C".into(),
            stock_qty: stock,
            buying_price: 10.0,
            selling_price: 15.0,
            velocity: stocklab_core::engine::velocity::VelocityEstimate {
                daily_rate: None,
                estimated: false,
                observations: 0,
            },
            metrics: stocklab_core::domain::DerivedMetrics {
                days_of_cover: None,
                reorder_point: None,
                margin_pct: 33.0,
                price_gap_pct: None,
            },
            score: ScoreResult {
                total: score,
                factors: FactorBreakdown {
                    stockout_risk: score.min(45),
                    velocity: 0,
                    profitability: 0,
                    competition: 0,
                },
                reasons: Vec::new(),
                margin_pct: 33.0,
            },
            action: RecommendedAction::Watch,
            recommendation: None,
        }
    }

    #[test]
    fn sort_is_score_desc_stock_asc_sku_asc() {
        let mut items = vec![
            eval("C", 50, 5),
            eval("A", 80, 0),
            eval("B", 50, 2),
            eval("D", 50, 2),
        ];
        sort_deterministic(&mut items);
        let order: Vec<&str> = items.iter().map(|e| e.sku.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn cancel_token_round_trip() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn same_ranking_detects_reorder() {
        let a = vec![eval("A", 50, 1), eval("B", 40, 1)];
        let mut b = a.clone();
        assert!(same_ranking(&a, &b));
        b.reverse();
        assert!(!same_ranking(&a, &b));
    }
}
