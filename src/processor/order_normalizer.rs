use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use crate::error::PipelineError;

/// Character repairs for the OCR/encoding artifacts seen in raw pizza
/// identifiers, applied in order as exact character replacement. No
/// replacement output appears as a later input, so a single pass over the
/// string is equivalent to applying the rules sequentially.
const PIZZA_ID_REPAIRS: [(char, char); 5] = [
    ('@', 'a'),
    ('3', 'e'),
    ('0', 'o'),
    ('-', '_'),
    (' ', '_'),
];

/// Word-form quantities seen in the raw data, replaced case-sensitively in
/// this order before integer parsing.
const QUANTITY_REPAIRS: [(&str, &str); 3] = [("One", "1"), ("one", "1"), ("two", "2")];

/// Repairs the order-line table: drops rows with missing pizza_id or
/// quantity, canonicalizes both columns, and sorts by order id.
pub struct OrderNormalizer;

impl OrderNormalizer {
    pub fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        let before = df.height();
        let df = df
            .lazy()
            .filter(col("pizza_id").is_not_null().and(col("quantity").is_not_null()))
            .collect()?;
        let dropped = before - df.height();
        if dropped > 0 {
            info!(
                "🧹 Dropped {} order lines with missing pizza_id or quantity",
                dropped
            );
        }

        let pizza_ids: Vec<String> = df
            .column("pizza_id")?
            .str()?
            .into_no_null_iter()
            .map(|raw| self.repair_pizza_id(raw))
            .collect();
        let quantities = df
            .column("quantity")?
            .str()?
            .into_no_null_iter()
            .map(|raw| self.repair_quantity(raw))
            .collect::<Result<Vec<i64>, PipelineError>>()?;

        let mut df = df;
        df.with_column(Series::new("pizza_id".into(), pizza_ids))?;
        df.with_column(Series::new("quantity".into(), quantities))?;

        let df = df
            .lazy()
            .with_columns([
                col("order_details_id").cast(DataType::Int64),
                col("order_id").cast(DataType::Int64),
            ])
            .collect()?;
        let df = df.sort(
            ["order_id"],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        info!("✅ Normalized {} order lines", df.height());
        Ok(df)
    }

    /// Canonicalize a raw pizza identifier to `<name>_<size>` form, e.g.
    /// `"h@w@iian m"` -> `"hawaiian_m"`. Already-canonical identifiers pass
    /// through unchanged.
    pub fn repair_pizza_id(&self, raw: &str) -> String {
        raw.chars()
            .map(|c| {
                PIZZA_ID_REPAIRS
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map_or(c, |(_, to)| *to)
            })
            .collect()
    }

    /// Turn a raw quantity string into a positive integer. Negative values
    /// are sign errors at data entry, not returns, so they keep their
    /// magnitude rather than being dropped.
    pub fn repair_quantity(&self, raw: &str) -> Result<i64, PipelineError> {
        let mut value = raw.to_string();
        for (from, to) in QUANTITY_REPAIRS {
            value = value.replace(from, to);
        }
        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| PipelineError::BadQuantity(raw.to_string()))?;
        Ok(parsed.abs())
    }
}
