use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use tracing::{info, warn};

use crate::config::{PipelineConfig, SourceConfig};

/// The four raw tables, exactly as found on disk.
pub struct SourceTables {
    pub order_details: DataFrame,
    pub orders: DataFrame,
    pub pizzas: DataFrame,
    pub pizza_types: DataFrame,
}

pub struct CsvLoader;

impl CsvLoader {
    pub fn load_all(&self, config: &PipelineConfig) -> Result<SourceTables> {
        Ok(SourceTables {
            order_details: self.load_source(&config.sources.order_details)?,
            orders: self.load_source(&config.sources.orders)?,
            pizzas: self.load_source(&config.sources.pizzas)?,
            pizza_types: self.load_source(&config.sources.pizza_types)?,
        })
    }

    /// Read one source with its declared separator and encoding.
    ///
    /// Every column is read as a string column so that malformed values
    /// (word-form quantities, mixed date encodings) reach the normalizers
    /// untouched instead of tripping schema inference. Empty fields and
    /// pandas-style NA tokens load as nulls.
    pub fn load_source(&self, source: &SourceConfig) -> Result<DataFrame> {
        let bytes = std::fs::read(&source.path)
            .with_context(|| format!("Failed to read source file {}", source.path))?;

        let encoding = source.resolve_encoding()?;
        let (decoded, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "⚠️ {} contains byte sequences invalid for {}; they were replaced",
                source.path,
                encoding.name()
            );
        }

        let cursor = Cursor::new(decoded.into_owned().into_bytes());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(source.separator_byte()?)
                    .with_null_values(Some(NullValues::AllColumns(vec![
                        "NaN".into(),
                        "None".into(),
                        "null".into(),
                    ]))),
            )
            .into_reader_with_file_handle(cursor)
            .finish()
            .with_context(|| format!("Failed to parse CSV from {}", source.path))?;

        info!(
            "📥 Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            source.path
        );
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_latin1_source_decodes() {
        let dir = tempfile::tempdir().unwrap();
        // "Jalape\xf1o Peppers" is "Jalapeño Peppers" in Latin-1
        let mut bytes = b"pizza_type_id,name,category,ingredients\n".to_vec();
        bytes.extend_from_slice(b"cali_ckn,The California Chicken Pizza,Chicken,");
        bytes.extend_from_slice(b"\"Chicken, Jalape\xf1o Peppers\"\n");
        let path = write_source(&dir, "pizza_types.csv", &bytes);

        let source = SourceConfig {
            path,
            separator: ",".to_string(),
            encoding: "latin-1".to_string(),
        };

        let df = CsvLoader.load_source(&source).unwrap();
        assert_eq!(df.height(), 1);
        let ingredients = df.column("ingredients").unwrap().str().unwrap().get(0);
        assert_eq!(ingredients, Some("Chicken, Jalapeño Peppers"));
    }

    #[test]
    fn test_custom_separator_and_string_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            &dir,
            "order_details.csv",
            b"order_details_id;order_id;pizza_id;quantity\n1;1;hawaiian_m;One\n2;1;bbq_ckn_l;-2\n",
        );

        let source = SourceConfig {
            path,
            separator: ";".to_string(),
            encoding: "utf-8".to_string(),
        };

        let df = CsvLoader.load_source(&source).unwrap();
        assert_eq!(df.height(), 2);
        // no schema inference: the quantity column stays textual
        assert_eq!(df.column("quantity").unwrap().dtype(), &DataType::String);
        let quantities = df.column("quantity").unwrap().str().unwrap();
        assert_eq!(quantities.get(0), Some("One"));
        assert_eq!(quantities.get(1), Some("-2"));
    }

    #[test]
    fn test_na_tokens_load_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(
            &dir,
            "orders.csv",
            b"order_id;date;time\n1;2016-01-01;NaN\n2;;13:57:40\n",
        );

        let source = SourceConfig {
            path,
            separator: ";".to_string(),
            encoding: "utf-8".to_string(),
        };

        let df = CsvLoader.load_source(&source).unwrap();
        assert_eq!(df.column("time").unwrap().null_count(), 1);
        assert_eq!(df.column("date").unwrap().null_count(), 1);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let source = SourceConfig {
            path: "does_not_exist.csv".to_string(),
            separator: ";".to_string(),
            encoding: "utf-8".to_string(),
        };
        let result = CsvLoader.load_source(&source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("does_not_exist.csv"));
    }
}
