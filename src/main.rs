use anyhow::{Context, Result};
use tracing::info;

use aggregator::DemandAggregator;
use config::PipelineConfig;
use loader::CsvLoader;
use processor::{DatetimeNormalizer, OrderNormalizer, QualityReport};
use writer::ReportWriter;

mod aggregator;
mod config;
mod error;
mod loader;
mod processor;
mod writer;

const CONFIG_FILE: &str = "pipeline.toml";

/// Exit status for an operator-requested stop, distinct from the status 1
/// a fatal pipeline error produces.
const INTERRUPT_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // An operator abort stops the run promptly with a short notice. Output
    // files from already-completed stages are left in place; nothing here is
    // transactional.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nInterrupted — stopping before the run completes");
            std::process::exit(INTERRUPT_EXIT_CODE);
        }
    });

    let config = PipelineConfig::load(CONFIG_FILE)
        .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;

    info!("🚀 Starting weekly ingredient purchase pipeline");

    let loader = CsvLoader;
    let order_normalizer = OrderNormalizer;
    let datetime_normalizer = DatetimeNormalizer::new()?;
    let quality = QualityReport;
    let aggregator = DemandAggregator;
    let writer = ReportWriter;

    // === Extract ===
    let tables = loader.load_all(&config)?;

    // Per-source data quality, reported before any repair touches the frames
    let raw_sources = [
        (&config.sources.order_details, &tables.order_details),
        (&config.sources.orders, &tables.orders),
        (&config.sources.pizzas, &tables.pizzas),
        (&config.sources.pizza_types, &tables.pizza_types),
    ];
    for (source, df) in raw_sources {
        let mut report = quality.build(df)?;
        quality.print(&source.path, &report);
        writer.write_csv(&mut report, &format!("{}_quality_report.csv", source.stem()))?;
    }

    // === Transform ===
    let mut order_details = order_normalizer.normalize(tables.order_details)?;
    let mut orders = datetime_normalizer.normalize(tables.orders)?;

    let volumes = aggregator.weekly_volumes(&order_details, &tables.pizzas)?;
    let demand = aggregator.ingredient_demand(&tables.pizzas, &tables.pizza_types, &volumes)?;

    // === Load ===
    let mut demand_df = writer.demand_to_dataframe(&demand)?;
    writer.write_csv(&mut demand_df, &config.outputs.ingredient_report)?;
    writer.write_csv(&mut order_details, &config.outputs.clean_order_details)?;
    writer.write_csv(&mut orders, &config.outputs.clean_orders)?;

    println!(
        "\nIn one week the manager should purchase the following ingredient amounts:\n\n{}",
        demand_df
    );
    info!("🎉 Weekly ingredient purchase pipeline completed successfully");

    Ok(())
}
