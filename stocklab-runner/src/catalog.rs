//! Catalog data sources — the read-only product/history store.
//!
//! The engine only ever reads: a filterable product table and a per-SKU
//! history feed. `MemoryCatalog` builds its SKU lookup once at
//! construction and is shared immutably across worker threads; there is no
//! process-wide cache.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use stocklab_core::domain::{ProductSnapshot, StockHistoryPoint};

/// Errors from catalog construction or reads.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate SKU in product input: {0}")]
    DuplicateSku(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Conjunctive product filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub supplier: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Keep only products at or below this stock level.
    pub max_stock: Option<u32>,
}

impl CatalogFilter {
    pub fn matches(&self, product: &ProductSnapshot) -> bool {
        self.supplier.as_ref().map_or(true, |s| &product.supplier == s)
            && self.category.as_ref().map_or(true, |c| &product.category == c)
            && self.brand.as_ref().map_or(true, |b| &product.brand == b)
            && self.max_stock.map_or(true, |m| product.stock_qty <= m)
    }
}

/// A read-only product/history source.
///
/// Implementations must support concurrent reads: the batch runner calls
/// `history()` from rayon worker threads.
pub trait ProductCatalog: Send + Sync {
    /// All products matching the filter.
    fn products(&self, filter: &CatalogFilter) -> Result<Vec<ProductSnapshot>, CatalogError>;

    /// History observations for one SKU, possibly empty, in any order.
    fn history(&self, sku: &str) -> Result<Vec<StockHistoryPoint>, CatalogError>;
}

/// Row-skipping statistics from a CSV load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub product_rows: usize,
    pub history_rows: usize,
    /// Malformed or insane rows skipped, never a load failure.
    pub skipped_rows: usize,
}

/// In-memory catalog with an explicit per-batch SKU lookup.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: Vec<ProductSnapshot>,
    history: HashMap<String, Vec<StockHistoryPoint>>,
}

impl MemoryCatalog {
    /// Build from pre-loaded rows. Duplicate SKUs are rejected eagerly.
    pub fn new(
        products: Vec<ProductSnapshot>,
        history: Vec<StockHistoryPoint>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashMap::with_capacity(products.len());
        for p in &products {
            if seen.insert(p.sku.clone(), ()).is_some() {
                return Err(CatalogError::DuplicateSku(p.sku.clone()));
            }
        }

        let mut by_sku: HashMap<String, Vec<StockHistoryPoint>> = HashMap::new();
        for point in history {
            by_sku.entry(point.sku.clone()).or_default().push(point);
        }

        Ok(Self {
            products,
            history: by_sku,
        })
    }

    /// Load products (and optionally history) from CSV files.
    ///
    /// Malformed rows are skipped with a warning and counted in the
    /// returned stats; a bad row never aborts the load.
    pub fn from_csv(
        products_path: &Path,
        history_path: Option<&Path>,
    ) -> Result<(Self, LoadStats), CatalogError> {
        let mut stats = LoadStats::default();

        let mut products = Vec::new();
        let mut reader = csv::Reader::from_path(products_path)?;
        for record in reader.deserialize::<ProductSnapshot>() {
            match record {
                Ok(p) if p.is_sane() => {
                    products.push(p);
                    stats.product_rows += 1;
                }
                Ok(p) => {
                    warn!(sku = %p.sku, "skipping insane product row");
                    stats.skipped_rows += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping malformed product row");
                    stats.skipped_rows += 1;
                }
            }
        }

        let mut history = Vec::new();
        if let Some(path) = history_path {
            let mut reader = csv::Reader::from_path(path)?;
            for record in reader.deserialize::<StockHistoryPoint>() {
                match record {
                    Ok(point) => {
                        history.push(point);
                        stats.history_rows += 1;
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping malformed history row");
                        stats.skipped_rows += 1;
                    }
                }
            }
        }

        Ok((Self::new(products, history)?, stats))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for MemoryCatalog {
    fn products(&self, filter: &CatalogFilter) -> Result<Vec<ProductSnapshot>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn history(&self, sku: &str) -> Result<Vec<StockHistoryPoint>, CatalogError> {
        Ok(self.history.get(sku).cloned().unwrap_or_default())
    }
}
