use std::collections::HashMap;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use polars::prelude::*;
use tracing::info;

use crate::error::PipelineError;

/// Weeks used to scale annual order totals down to a weekly estimate.
const WEEKS_PER_YEAR: i64 = 52;

/// Sellable pizza sizes and the factor by which each scales its recipe's
/// ingredient amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PizzaSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
    DoubleExtraLarge,
}

impl PizzaSize {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" => Some(PizzaSize::Small),
            "m" => Some(PizzaSize::Medium),
            "l" => Some(PizzaSize::Large),
            "xl" => Some(PizzaSize::ExtraLarge),
            "xxl" => Some(PizzaSize::DoubleExtraLarge),
            _ => None,
        }
    }

    pub fn multiplier(self) -> i64 {
        match self {
            PizzaSize::Small => 1,
            PizzaSize::Medium => 2,
            PizzaSize::Large => 3,
            PizzaSize::ExtraLarge => 4,
            PizzaSize::DoubleExtraLarge => 5,
        }
    }
}

/// Turns the cleaned order lines plus the two catalog tables into a weekly
/// ingredient purchase plan.
pub struct DemandAggregator;

impl DemandAggregator {
    /// Estimated weekly order volume per catalog variant.
    ///
    /// Annual totals are floor-divided by 52 and then incremented, so the
    /// estimate always rounds upward — including at exact multiples of 52,
    /// and including variants nobody ordered (they yield 1, not 0).
    pub fn weekly_volumes(
        &self,
        order_details: &DataFrame,
        pizzas: &DataFrame,
    ) -> Result<HashMap<String, i64>> {
        let line_ids = order_details.column("pizza_id")?.str()?;
        let quantities = order_details.column("quantity")?.i64()?;

        let mut annual: HashMap<String, i64> = HashMap::new();
        for (pizza_id, quantity) in line_ids
            .into_no_null_iter()
            .zip(quantities.into_no_null_iter())
        {
            *annual.entry(pizza_id.to_string()).or_insert(0) += quantity;
        }

        let mut volumes = HashMap::new();
        for pizza_id in pizzas.column("pizza_id")?.str()?.into_no_null_iter() {
            let total = annual.get(pizza_id).copied().unwrap_or(0);
            volumes.insert(pizza_id.to_string(), total / WEEKS_PER_YEAR + 1);
        }

        info!("📈 Estimated weekly volume for {} pizzas", volumes.len());
        Ok(volumes)
    }

    /// Weekly unit demand per ingredient, keyed in the order ingredients
    /// first appear in the pizza types table so the report is reproducible
    /// run to run.
    pub fn ingredient_demand(
        &self,
        pizzas: &DataFrame,
        pizza_types: &DataFrame,
        volumes: &HashMap<String, i64>,
    ) -> Result<IndexMap<String, i64>> {
        let mut recipes: HashMap<String, Vec<String>> = HashMap::new();
        let mut demand: IndexMap<String, i64> = IndexMap::new();

        let type_ids = pizza_types.column("pizza_type_id")?.str()?;
        let ingredient_lists = pizza_types.column("ingredients")?.str()?;
        for (type_id, list) in type_ids
            .into_no_null_iter()
            .zip(ingredient_lists.into_no_null_iter())
        {
            let ingredients: Vec<String> = list.split(", ").map(str::to_string).collect();
            for ingredient in &ingredients {
                demand.entry(ingredient.clone()).or_insert(0);
            }
            recipes.insert(type_id.to_string(), ingredients);
        }

        let pizza_ids = pizzas.column("pizza_id")?.str()?;
        let base_names = pizzas.column("pizza_type_id")?.str()?;
        let sizes = pizzas.column("size")?.str()?;
        for ((pizza_id, base_name), size_code) in pizza_ids
            .into_no_null_iter()
            .zip(base_names.into_no_null_iter())
            .zip(sizes.into_no_null_iter())
        {
            let size = PizzaSize::from_code(size_code).ok_or_else(|| {
                PipelineError::UnknownSizeCode {
                    pizza_id: pizza_id.to_string(),
                    size: size_code.to_string(),
                }
            })?;
            let ingredients =
                recipes
                    .get(base_name)
                    .ok_or_else(|| PipelineError::UnknownRecipe {
                        pizza_id: pizza_id.to_string(),
                        pizza_type_id: base_name.to_string(),
                    })?;
            let volume = volumes
                .get(pizza_id)
                .copied()
                .with_context(|| format!("no weekly volume was computed for {}", pizza_id))?;

            for ingredient in ingredients {
                *demand.entry(ingredient.clone()).or_insert(0) += volume * size.multiplier();
            }
        }

        info!("🧾 Accumulated demand for {} ingredients", demand.len());
        Ok(demand)
    }
}
