// crates/larder-core/src/stage/forecast.rs

use std::collections::{BTreeMap, HashMap};

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::paths::DataPaths;
use crate::reader::read_table;
use crate::schema::FORECAST_SCHEMA;
use crate::table::{cell_f64, cell_str, column, write_staged};

/// Projects next-period ingredient usage from the staged sales and staged
/// ingredient tables on disk (this stage assumes both upstream stages
/// already ran) and persists `staged/forecast_ingredients.csv`.
pub fn stage_forecast(paths: &DataPaths) -> Result<DataFrame> {
    let sales = read_table(&paths.staged_sales())?;
    let recipe = read_table(&paths.staged_ingredients())?;

    let mut staged = project_usage(&sales, &recipe)?;

    FORECAST_SCHEMA.validate(&staged)?;

    let output = paths.staged_forecast();
    write_staged(&mut staged, &output)?;
    info!(rows = staged.height(), output = %output.display(), "staged forecast");
    Ok(staged)
}

/// Naive projection: left join of sales rows to recipe rows on menu item,
/// multiplying sold quantity by the per-item ingredient quantity and
/// summing per ingredient. A sold item with no recipe row contributes
/// nothing. Output rows are ordered by ingredient name, which keeps reruns
/// byte-identical. No seasonality, trend, or confidence modeling.
pub fn project_usage(sales: &DataFrame, recipe: &DataFrame) -> Result<DataFrame> {
    let recipe_items = column(recipe, "menu_item")?;
    let recipe_ingredients = column(recipe, "ingredient_name")?;
    let recipe_quantities = column(recipe, "quantity")?;

    let mut per_item: HashMap<String, Vec<(String, f64)>> = HashMap::new();
    for idx in 0..recipe.height() {
        let (Some(item), Some(ingredient)) = (
            cell_str(recipe_items, idx),
            cell_str(recipe_ingredients, idx),
        ) else {
            continue;
        };
        let per_unit = cell_f64(recipe_quantities, idx).unwrap_or(0.0);
        per_item.entry(item).or_default().push((ingredient, per_unit));
    }

    let sales_items = column(sales, "menu_item")?;
    let sales_quantities = column(sales, "quantity")?;

    let mut usage: BTreeMap<String, f64> = BTreeMap::new();
    for idx in 0..sales.height() {
        let Some(item) = cell_str(sales_items, idx) else {
            continue;
        };
        let Some(components) = per_item.get(&item) else {
            continue;
        };
        let sold = cell_f64(sales_quantities, idx).unwrap_or(0.0);
        for (ingredient, per_unit) in components {
            *usage.entry(ingredient.clone()).or_insert(0.0) += sold * per_unit;
        }
    }

    let mut names: Vec<String> = Vec::with_capacity(usage.len());
    let mut totals: Vec<f64> = Vec::with_capacity(usage.len());
    for (name, total) in usage {
        names.push(name);
        totals.push(total);
    }

    Ok(DataFrame::new(vec![
        Series::new("ingredient_name".into(), names).into(),
        Series::new("predicted_usage_next_month".into(), totals).into(),
    ])?)
}
