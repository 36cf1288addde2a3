use anyhow::Result;
use polars::prelude::*;

#[path = "../error.rs"]
mod error;

#[path = "../aggregator/mod.rs"]
mod aggregator;

use aggregator::DemandAggregator;

fn main() -> Result<()> {
    println!("=== TESTING WEEKLY PLAN AGGREGATION ===\n");

    // A year of cleaned order lines for a small two-recipe catalog
    let order_details = DataFrame::new(vec![
        Series::new(
            "pizza_id".into(),
            vec!["veggie_s", "veggie_s", "hawaiian_m"],
        )
        .into(),
        Series::new("quantity".into(), vec![100i64, 4, 52]).into(),
    ])?;
    let pizzas = DataFrame::new(vec![
        Series::new(
            "pizza_id".into(),
            vec!["veggie_s", "veggie_l", "hawaiian_m"],
        )
        .into(),
        Series::new(
            "pizza_type_id".into(),
            vec!["veggie", "veggie", "hawaiian"],
        )
        .into(),
        Series::new("size".into(), vec!["s", "l", "m"]).into(),
    ])?;
    let pizza_types = DataFrame::new(vec![
        Series::new("pizza_type_id".into(), vec!["veggie", "hawaiian"]).into(),
        Series::new(
            "ingredients".into(),
            vec!["dough, sauce, cheese", "dough, ham, pineapple"],
        )
        .into(),
    ])?;

    let aggregator = DemandAggregator;

    let volumes = aggregator.weekly_volumes(&order_details, &pizzas)?;
    println!("1. Estimated weekly volumes:");
    for (pizza, volume) in &volumes {
        println!("   {:12} {}", pizza, volume);
    }

    let demand = aggregator.ingredient_demand(&pizzas, &pizza_types, &volumes)?;
    println!("\n2. Weekly ingredient demand (catalog order):");
    for (ingredient, amount) in &demand {
        println!("   {:12} {}", ingredient, amount);
    }

    println!("\n✅ Weekly plan computed");
    Ok(())
}
