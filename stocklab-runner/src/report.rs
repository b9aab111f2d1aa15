//! Report assembly and export — JSON batch reports, grouped planner
//! summaries, and CSV recommendation export.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stocklab_core::domain::{OrderPriority, OrderRecommendation, RecommendedAction};
use stocklab_core::engine::ProductEvaluation;
use stocklab_core::template::StrategyTemplate;

use crate::batch::{BatchKpis, BatchRun};
use crate::config::{BatchConfig, RunId};

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete JSON-serializable result of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub generated_at: NaiveDateTime,
    /// The configuration that produced this run.
    pub config: BatchConfig,
    /// The resolved template the run executed under.
    pub template: StrategyTemplate,
    pub kpis: BatchKpis,
    pub action_distribution: BTreeMap<RecommendedAction, usize>,
    pub priority_distribution: BTreeMap<OrderPriority, usize>,
    /// Ranked, limited evaluations.
    pub items: Vec<ProductEvaluation>,
}

impl BatchReport {
    /// Assemble a report from a finished run.
    pub fn from_run(run: BatchRun, config: &BatchConfig) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: config.run_id(),
            generated_at: chrono::Utc::now().naive_utc(),
            config: config.clone(),
            template: run.template,
            kpis: run.kpis,
            action_distribution: run.action_distribution,
            priority_distribution: run.priority_distribution,
            items: run.items,
        }
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// Per-group rollup of the limited result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    /// Items in the limited list belonging to this group.
    pub items: usize,
    /// Summed actionable order quantity.
    pub order_quantity: u64,
    /// Summed actionable order cost.
    pub order_cost: f64,
}

/// Grouped view for the template-planner entry point.
///
/// Groups cover the *limited* item list — the report the user actually
/// sees — unlike the KPI block, which covers the full evaluated set.
/// Below-minimum orders are excluded from both the sums and the
/// recommendation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerReport {
    pub supplier_summary: Vec<GroupSummary>,
    pub category_summary: Vec<GroupSummary>,
    pub brand_summary: Vec<GroupSummary>,
    /// Actionable recommendations in ranked order.
    pub recommendations: Vec<OrderRecommendation>,
}

impl PlannerReport {
    pub fn from_items(items: &[ProductEvaluation]) -> Self {
        Self {
            supplier_summary: summarize(items, |e| &e.supplier),
            category_summary: summarize(items, |e| &e.category),
            brand_summary: summarize(items, |e| &e.brand),
            recommendations: items
                .iter()
                .filter_map(|e| e.recommendation.as_ref())
                .filter(|rec| !rec.below_minimum)
                .cloned()
                .collect(),
        }
    }

    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// Roll items up by a key, summing actionable order cost/quantity.
///
/// Sorted by order cost descending, then key ascending, for a
/// deterministic report.
fn summarize<'a, F>(items: &'a [ProductEvaluation], key_fn: F) -> Vec<GroupSummary>
where
    F: Fn(&'a ProductEvaluation) -> &'a str,
{
    let mut groups: BTreeMap<&str, GroupSummary> = BTreeMap::new();
    for eval in items {
        let key = key_fn(eval);
        let entry = groups.entry(key).or_insert_with(|| GroupSummary {
            key: key.to_string(),
            items: 0,
            order_quantity: 0,
            order_cost: 0.0,
        });
        entry.items += 1;
        if let Some(rec) = &eval.recommendation {
            if !rec.below_minimum {
                entry.order_quantity += rec.quantity as u64;
                entry.order_cost += rec.cost;
            }
        }
    }

    let mut summaries: Vec<GroupSummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| {
        b.order_cost
            .partial_cmp(&a.order_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    summaries
}

/// Write actionable recommendations as CSV.
pub fn write_recommendations_csv(
    path: &Path,
    recommendations: &[OrderRecommendation],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for rec in recommendations {
        writer.serialize(rec)?;
    }
    writer.flush()?;
    Ok(())
}
