use anyhow::{Context, Result};
use indexmap::IndexMap;
use polars::prelude::*;
use std::fs::File;
use tracing::info;

/// Writes the pipeline outputs. Side effects only; the single reshaping
/// step is turning the demand map into a two-column table.
pub struct ReportWriter;

impl ReportWriter {
    /// The weekly demand map as a two-column frame, preserving map order.
    pub fn demand_to_dataframe(&self, demand: &IndexMap<String, i64>) -> Result<DataFrame> {
        let ingredients: Vec<String> = demand.keys().cloned().collect();
        let amounts: Vec<i64> = demand.values().copied().collect();
        let df = DataFrame::new(vec![
            Series::new("Ingredient".into(), ingredients).into(),
            Series::new("Amount (units)".into(), amounts).into(),
        ])?;
        Ok(df)
    }

    pub fn write_csv(&self, df: &mut DataFrame, path: &str) -> Result<()> {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create output file {}", path))?;
        CsvWriter::new(&mut file)
            .finish(df)
            .with_context(|| format!("Failed to write CSV to {}", path))?;
        info!("💾 Wrote {} rows to {}", df.height(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_frame_preserves_map_order() {
        let mut demand = IndexMap::new();
        demand.insert("dough".to_string(), 6);
        demand.insert("sauce".to_string(), 6);
        demand.insert("cheese".to_string(), 6);

        let df = ReportWriter.demand_to_dataframe(&demand).unwrap();

        assert_eq!(df.height(), 3);
        let ingredients = df.column("Ingredient").unwrap().str().unwrap();
        assert_eq!(ingredients.get(0), Some("dough"));
        assert_eq!(ingredients.get(1), Some("sauce"));
        assert_eq!(ingredients.get(2), Some("cheese"));
        let amounts = df.column("Amount (units)").unwrap().i64().unwrap();
        assert_eq!(amounts.get(0), Some(6));
    }

    #[test]
    fn test_write_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("purchases.csv");

        let mut demand = IndexMap::new();
        demand.insert("dough".to_string(), 11);
        let mut df = ReportWriter.demand_to_dataframe(&demand).unwrap();
        ReportWriter
            .write_csv(&mut df, path.to_str().unwrap())
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Ingredient,Amount (units)"));
        assert!(written.contains("dough,11"));
    }

    #[test]
    fn test_unwritable_destination_is_fatal() {
        let mut demand = IndexMap::new();
        demand.insert("dough".to_string(), 1);
        let mut df = ReportWriter.demand_to_dataframe(&demand).unwrap();

        let result = ReportWriter.write_csv(&mut df, "no_such_dir/purchases.csv");
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("no_such_dir/purchases.csv"));
    }
}
