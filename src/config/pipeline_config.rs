use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full pipeline configuration: the four input sources and the output paths.
///
/// Compiled-in defaults cover the standard layout (all files in the working
/// directory); an optional `pipeline.toml` can override any entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sources: SourcesConfig,
    pub outputs: OutputsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub order_details: SourceConfig,
    pub orders: SourceConfig,
    pub pizzas: SourceConfig,
    pub pizza_types: SourceConfig,
}

/// One tabular input: where it lives and how to read it. Separator and
/// encoding are declared per source because the sources genuinely differ
/// (the pizza types file is Latin-1; reading it as UTF-8 mangles ingredient
/// names with accented characters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub separator: String,
    pub encoding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    pub ingredient_report: String,
    pub clean_order_details: String,
    pub clean_orders: String,
}

impl SourceConfig {
    fn new(path: &str, separator: &str, encoding: &str) -> Self {
        SourceConfig {
            path: path.to_string(),
            separator: separator.to_string(),
            encoding: encoding.to_string(),
        }
    }

    /// The CSV field separator as a single byte.
    pub fn separator_byte(&self) -> Result<u8> {
        match self.separator.as_bytes() {
            [b] => Ok(*b),
            _ => bail!(
                "separator {:?} for {} must be a single ASCII character",
                self.separator,
                self.path
            ),
        }
    }

    /// Resolve the configured encoding label (e.g. "utf-8", "latin-1").
    pub fn resolve_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.as_bytes()).with_context(|| {
            format!(
                "unknown text encoding {:?} for source {}",
                self.encoding, self.path
            )
        })
    }

    /// File stem used to derive per-source report names.
    pub fn stem(&self) -> &str {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.path)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            sources: SourcesConfig {
                order_details: SourceConfig::new("order_details.csv", ";", "utf-8"),
                orders: SourceConfig::new("orders.csv", ";", "utf-8"),
                pizzas: SourceConfig::new("pizzas.csv", ",", "utf-8"),
                pizza_types: SourceConfig::new("pizza_types.csv", ",", "latin-1"),
            },
            outputs: OutputsConfig {
                ingredient_report: "weekly_ingredient_purchases.csv".to_string(),
                clean_order_details: "order_details_clean.csv".to_string(),
                clean_orders: "orders_clean.csv".to_string(),
            },
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: PipelineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        let config = PipelineConfig::default();

        assert_eq!(config.sources.order_details.path, "order_details.csv");
        assert_eq!(config.sources.order_details.separator_byte().unwrap(), b';');
        assert_eq!(config.sources.orders.separator_byte().unwrap(), b';');
        assert_eq!(config.sources.pizzas.separator_byte().unwrap(), b',');
        assert_eq!(
            config.sources.pizza_types.resolve_encoding().unwrap(),
            encoding_rs::WINDOWS_1252
        );
        assert_eq!(
            config.sources.orders.resolve_encoding().unwrap(),
            encoding_rs::UTF_8
        );
    }

    #[test]
    fn test_override_file_parses() {
        let toml_text = r#"
            [sources.order_details]
            path = "data/order_details.csv"
            separator = ";"
            encoding = "utf-8"

            [sources.orders]
            path = "data/orders.csv"
            separator = ";"
            encoding = "utf-8"

            [sources.pizzas]
            path = "data/pizzas.csv"
            separator = ","
            encoding = "utf-8"

            [sources.pizza_types]
            path = "data/pizza_types.csv"
            separator = ","
            encoding = "latin-1"

            [outputs]
            ingredient_report = "out/purchases.csv"
            clean_order_details = "out/order_details.csv"
            clean_orders = "out/orders.csv"
        "#;

        let config: PipelineConfig = toml::from_str(toml_text).unwrap();
        assert_eq!(config.sources.pizza_types.path, "data/pizza_types.csv");
        assert_eq!(config.outputs.ingredient_report, "out/purchases.csv");
    }

    #[test]
    fn test_bad_separator_rejected() {
        let source = SourceConfig::new("x.csv", ";;", "utf-8");
        assert!(source.separator_byte().is_err());
    }

    #[test]
    fn test_stem() {
        let source = SourceConfig::new("data/pizza_types.csv", ",", "latin-1");
        assert_eq!(source.stem(), "pizza_types");
    }
}
