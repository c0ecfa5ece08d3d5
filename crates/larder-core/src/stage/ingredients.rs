// crates/larder-core/src/stage/ingredients.rs

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::paths::DataPaths;
use crate::reader::read_table;
use crate::schema::INGREDIENT_SCHEMA;
use crate::table::{cell_str, column, write_staged};

/// Header the POS export uses for the item identifier column.
const RAW_ITEM_COLUMN: &str = "Item name";
const ITEM_KEY: &str = "menu_item";

/// Stages the wide ingredient-per-menu-item export into canonical long form
/// at `staged/ingredients_staged.csv`.
pub fn stage_ingredients(paths: &DataPaths) -> Result<DataFrame> {
    let raw = read_table(&paths.raw_ingredients())?;
    let mut staged = reshape_wide_to_long(raw)?;

    INGREDIENT_SCHEMA.validate(&staged)?;

    let output = paths.staged_ingredients();
    write_staged(&mut staged, &output)?;
    info!(rows = staged.height(), output = %output.display(), "staged ingredients");
    Ok(staged)
}

/// One output row per (menu item, ingredient column) pair whose source cell
/// is non-missing. Ingredient names come from the column headers, trimmed
/// and lower-cased; missing quantities drop the pair, non-numeric ones
/// coerce to zero.
pub fn reshape_wide_to_long(mut raw: DataFrame) -> Result<DataFrame> {
    raw.rename(RAW_ITEM_COLUMN, ITEM_KEY.into())?;

    let items = column(&raw, ITEM_KEY)?.clone();
    let height = raw.height();

    let mut menu_items: Vec<Option<String>> = Vec::new();
    let mut ingredient_names: Vec<String> = Vec::new();
    let mut quantities: Vec<f64> = Vec::new();

    for col in raw.get_columns() {
        if col.name().as_str() == ITEM_KEY {
            continue;
        }
        let ingredient = col.name().as_str().trim().to_lowercase();
        let series = col.as_materialized_series();

        for idx in 0..height {
            let Some(value) = cell_str(series, idx) else {
                continue;
            };
            menu_items.push(cell_str(&items, idx));
            ingredient_names.push(ingredient.clone());
            quantities.push(value.parse::<f64>().unwrap_or(0.0));
        }
    }

    Ok(DataFrame::new(vec![
        Series::new(
            ITEM_KEY.into(),
            menu_items
                .iter()
                .map(|item| item.as_deref())
                .collect::<Vec<Option<&str>>>(),
        )
        .into(),
        Series::new("ingredient_name".into(), ingredient_names).into(),
        Series::new("quantity".into(), quantities).into(),
    ])?)
}
