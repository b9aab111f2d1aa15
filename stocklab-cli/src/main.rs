//! StockLab CLI — replenishment planning commands.
//!
//! Commands:
//! - `plan` — run a batch replenishment plan from CSV inputs and write
//!   JSON (and optionally CSV) reports
//! - `templates` — list built-in strategy templates

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use stocklab_core::template::StrategyTemplate;
use stocklab_runner::batch::{run_batch, CancelToken};
use stocklab_runner::catalog::{CatalogFilter, MemoryCatalog};
use stocklab_runner::config::{BatchConfig, TemplateConfig};
use stocklab_runner::report::{write_recommendations_csv, BatchReport, PlannerReport};

#[derive(Parser)]
#[command(
    name = "stocklab",
    about = "StockLab CLI — replenishment decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch replenishment plan and write reports.
    Plan {
        /// Product snapshot CSV.
        #[arg(long)]
        products: PathBuf,

        /// Stock history CSV (optional; omit for price-band fallback only).
        #[arg(long)]
        history: Option<PathBuf>,

        /// Path to a TOML batch config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Built-in template name: weekly-90, biweekly-60, monthly-90.
        #[arg(long)]
        template: Option<String>,

        /// Keep only this supplier.
        #[arg(long)]
        supplier: Option<String>,

        /// Keep only this category.
        #[arg(long)]
        category: Option<String>,

        /// Keep only this brand.
        #[arg(long)]
        brand: Option<String>,

        /// Keep only products at or below this stock level.
        #[arg(long)]
        max_stock: Option<u32>,

        /// Maximum number of ranked items in the report.
        #[arg(long)]
        limit: Option<usize>,

        /// Output directory for report files.
        #[arg(long, default_value = "reports")]
        out: PathBuf,

        /// Also write recommendations.csv.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// List built-in strategy templates.
    Templates,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            products,
            history,
            config,
            template,
            supplier,
            category,
            brand,
            max_stock,
            limit,
            out,
            csv,
        } => run_plan(
            products, history, config, template, supplier, category, brand, max_stock, limit,
            out, csv,
        ),
        Commands::Templates => run_templates(),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    products_path: PathBuf,
    history_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    template_name: Option<String>,
    supplier: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    max_stock: Option<u32>,
    limit: Option<usize>,
    out_dir: PathBuf,
    write_csv: bool,
) -> Result<()> {
    if config_path.is_some() && template_name.is_some() {
        bail!("--config and --template are mutually exclusive");
    }

    let mut config = match config_path {
        Some(path) => BatchConfig::from_toml_path(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BatchConfig::default(),
    };
    if let Some(name) = template_name {
        config.template = TemplateConfig::Named { name };
    }

    // CLI filter flags override the config file.
    let flag_filter = CatalogFilter {
        supplier,
        category,
        brand,
        max_stock,
    };
    if flag_filter != CatalogFilter::default() {
        config.filter = flag_filter;
    }
    if let Some(limit) = limit {
        config.limit = limit;
    }
    config.validate()?;

    let (catalog, stats) = MemoryCatalog::from_csv(&products_path, history_path.as_deref())
        .with_context(|| format!("loading catalog {}", products_path.display()))?;
    if stats.skipped_rows > 0 {
        eprintln!("Warning: skipped {} malformed input rows", stats.skipped_rows);
    }

    let run = run_batch(&catalog, &config, &CancelToken::new())?;
    let planner = PlannerReport::from_items(&run.items);
    let report = BatchReport::from_run(run, &config);

    print_summary(&report);

    std::fs::create_dir_all(&out_dir)?;
    let report_path = out_dir.join("report.json");
    report.write_json(&report_path)?;
    let planner_path = out_dir.join("planner.json");
    planner.write_json(&planner_path)?;
    println!("Reports saved to: {}", out_dir.display());

    if write_csv {
        let csv_path = out_dir.join("recommendations.csv");
        write_recommendations_csv(&csv_path, &planner.recommendations)?;
        println!("Recommendations saved to: {}", csv_path.display());
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    let k = &report.kpis;
    println!("Template:           {}", report.template.name);
    println!("Evaluated:          {} ({} skipped)", k.evaluated, k.skipped);
    println!("Out of stock:       {}", k.out_of_stock);
    println!("Critical stock:     {}", k.critical_stock);
    println!("Average score:      {:.1}", k.avg_score);
    println!("Suggested spend:    {:.2}", k.total_order_cost);
    println!(
        "Dropped small orders: {} ({:.2})",
        k.dropped_orders, k.dropped_order_cost
    );
    println!("Daily revenue at risk: {:.2}", k.revenue_at_risk_daily);

    println!("\nActions:");
    for (action, count) in &report.action_distribution {
        println!("  {action:<10} {count}");
    }

    println!("\nTop items:");
    for item in report.items.iter().take(10) {
        let qty = item
            .recommendation
            .as_ref()
            .map(|r| r.quantity.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<3} {:<12} {:<10} stock {:<5} qty {}",
            item.score.total, item.sku, item.action, item.stock_qty, qty
        );
    }
}

fn run_templates() -> Result<()> {
    println!(
        "{:<14} {:>8} {:>10} {:>8} {:>10}",
        "name", "window", "coverage", "safety", "min value"
    );
    for t in StrategyTemplate::builtins() {
        println!(
            "{:<14} {:>8} {:>10} {:>8.2} {:>10.2}",
            t.name,
            t.analysis_window_days,
            t.coverage_target_days,
            t.safety_multiplier,
            t.min_order_value
        );
    }
    Ok(())
}
