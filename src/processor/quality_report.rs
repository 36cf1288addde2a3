use anyhow::Result;
use polars::prelude::*;

/// Per-column data-quality summary for a raw source table, built before any
/// repair runs. Rows the normalizers later drop silently are only visible
/// in aggregate here.
pub struct QualityReport;

impl QualityReport {
    /// One report row per source column: null count, NaN count, dtype.
    pub fn build(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(df.width());
        let mut null_counts = Vec::with_capacity(df.width());
        let mut nan_counts = Vec::with_capacity(df.width());
        let mut dtypes = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            columns.push(column.name().to_string());
            null_counts.push(column.null_count() as i64);
            nan_counts.push(self.nan_count(column)? as i64);
            dtypes.push(column.dtype().to_string());
        }

        let report = DataFrame::new(vec![
            Series::new("column".into(), columns).into(),
            Series::new("null_count".into(), null_counts).into(),
            Series::new("nan_count".into(), nan_counts).into(),
            Series::new("dtype".into(), dtypes).into(),
        ])?;
        Ok(report)
    }

    /// NaN is a float concern; every other dtype reports zero.
    fn nan_count(&self, column: &Column) -> Result<usize> {
        match column.dtype() {
            DataType::Float64 => Ok(column.f64()?.is_nan().sum().unwrap_or(0) as usize),
            DataType::Float32 => Ok(column.f32()?.is_nan().sum().unwrap_or(0) as usize),
            _ => Ok(0),
        }
    }

    pub fn print(&self, source_path: &str, report: &DataFrame) {
        let total_nulls: i64 = report
            .column("null_count")
            .ok()
            .and_then(|c| c.i64().ok())
            .and_then(|ca| ca.sum())
            .unwrap_or(0);

        println!(
            "\nData quality for \"{}\" ({} missing values in total):",
            source_path, total_nulls
        );
        println!("{}", report);
    }
}
