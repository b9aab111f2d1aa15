//! StockLab Runner — batch orchestration over the core engine.
//!
//! - Catalog sources (trait + in-memory + CSV ingest)
//! - Batch configuration with fail-fast validation and content-hash run IDs
//! - Parallel chunked evaluation with cooperative cancellation
//! - Deterministic ranking, KPIs, and grouped supplier/category/brand reports

pub mod batch;
pub mod catalog;
pub mod config;
pub mod report;

pub use batch::{run_batch, BatchError, BatchKpis, BatchRun, CancelToken};
pub use catalog::{CatalogError, CatalogFilter, LoadStats, MemoryCatalog, ProductCatalog};
pub use config::{BatchConfig, ConfigError, RunId, TemplateConfig};
pub use report::{
    write_recommendations_csv, BatchReport, GroupSummary, PlannerReport, SCHEMA_VERSION,
};
