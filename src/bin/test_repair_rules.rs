use anyhow::Result;

#[path = "../error.rs"]
mod error;

#[path = "../processor/order_normalizer.rs"]
mod order_normalizer;

#[path = "../processor/datetime_normalizer.rs"]
mod datetime_normalizer;

use datetime_normalizer::DatetimeNormalizer;
use order_normalizer::OrderNormalizer;

fn main() -> Result<()> {
    println!("=== TESTING REPAIR RULES ===\n");

    let order_normalizer = OrderNormalizer;
    let datetime_normalizer = DatetimeNormalizer::new()?;

    // Identifiers with the artifacts seen in the raw order export
    let dirty_pizza_ids = [
        "h@w@iian-m",
        "bbq chicken_l",
        "s0ppressata_s",
        "bbq_chicken_l",
    ];
    println!("1. Pizza identifier repair:");
    for raw in dirty_pizza_ids {
        println!(
            "   {:20} -> {}",
            format!("{:?}", raw),
            order_normalizer.repair_pizza_id(raw)
        );
    }

    let dirty_quantities = ["One", "one", "two", "-3", "2"];
    println!("\n2. Quantity repair:");
    for raw in dirty_quantities {
        println!(
            "   {:8} -> {}",
            format!("{:?}", raw),
            order_normalizer.repair_quantity(raw)?
        );
    }

    let dirty_dates = ["2016-01-01", "1454284800", "2016-03-05 09:30:00"];
    println!("\n3. Date repair:");
    for raw in dirty_dates {
        println!(
            "   {:24} -> {}",
            format!("{:?}", raw),
            datetime_normalizer.repair_date(raw)?
        );
    }

    let dirty_times = ["13:57:40", "02:15 PM", "11H 38M 36S", "1451634300"];
    println!("\n4. Time repair:");
    for raw in dirty_times {
        println!(
            "   {:16} -> {}",
            format!("{:?}", raw),
            datetime_normalizer.repair_time(raw)?
        );
    }

    println!("\n✅ All repair rules applied");
    Ok(())
}
