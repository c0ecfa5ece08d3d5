use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use larder_core::error::PipelineError;
use larder_core::paths::{STAGED_FORECAST, STAGED_SALES, STAGED_SHIPMENTS};
use larder_core::reader::read_table;
use larder_core::table::{cell_f64, cell_i64, cell_str, column, has_column};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub ingredient_name: String,
    pub total_quantity: f64,
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForecastEntry {
    pub ingredient_name: String,
    pub predicted_usage_next_month: f64,
}

#[derive(Debug, Serialize)]
pub struct ShipmentEntry {
    pub ingredient_name: String,
    pub expected_date: Option<String>,
    pub arrival_date: Option<String>,
    pub delay_days: Option<i64>,
    pub quantity: Option<f64>,
}

pub enum ApiError {
    NotFound(String),
    MissingColumns(String),
    Internal(PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(dataset) => (
                StatusCode::NOT_FOUND,
                format!("Dataset {dataset} not found."),
            ),
            ApiError::MissingColumns(dataset) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{dataset} missing required columns."),
            ),
            ApiError::Internal(err) => {
                tracing::error!(%err, "dataset read failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Reads a dataset, preferring the processed copy over the staged one.
fn read_dataset(state: &AppState, filename: &str) -> Result<DataFrame, ApiError> {
    let Some(path) = state.paths.dataset(filename) else {
        tracing::error!(dataset = filename, "dataset not found");
        return Err(ApiError::NotFound(filename.to_string()));
    };
    let df = read_table(&path).map_err(ApiError::Internal)?;
    tracing::info!(dataset = filename, rows = df.height(), "loaded dataset");
    Ok(df)
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// Filter by month name, e.g. `/inventory?month=october`.
    pub month: Option<String>,
}

/// Ingredient usage summaries from the staged sales table, grouped by
/// ingredient and month.
pub async fn inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<IngredientSummary>>, ApiError> {
    let df = read_dataset(&state, STAGED_SALES)?;

    if !has_column(&df, "ingredient_name") || !has_column(&df, "quantity") {
        return Err(ApiError::MissingColumns(STAGED_SALES.to_string()));
    }

    let ingredients = column(&df, "ingredient_name").map_err(ApiError::Internal)?;
    let quantities = column(&df, "quantity").map_err(ApiError::Internal)?;
    let months = if has_column(&df, "month") {
        Some(column(&df, "month").map_err(ApiError::Internal)?)
    } else {
        None
    };

    let mut totals: BTreeMap<(String, Option<String>), f64> = BTreeMap::new();
    for idx in 0..df.height() {
        let Some(ingredient) = cell_str(ingredients, idx) else {
            continue;
        };
        let month = months.and_then(|series| cell_str(series, idx));

        if let Some(filter) = &query.month {
            let matches = month
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(filter));
            if !matches {
                continue;
            }
        }

        let quantity = cell_f64(quantities, idx).unwrap_or(0.0);
        *totals.entry((ingredient, month)).or_insert(0.0) += quantity;
    }

    let summaries = totals
        .into_iter()
        .map(|((ingredient_name, month), total_quantity)| IngredientSummary {
            ingredient_name,
            total_quantity,
            month,
        })
        .collect();
    Ok(Json(summaries))
}

/// Forecasted ingredient usage for the next period.
pub async fn forecast(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ForecastEntry>>, ApiError> {
    let df = read_dataset(&state, STAGED_FORECAST)?;

    if !has_column(&df, "ingredient_name") || !has_column(&df, "predicted_usage_next_month") {
        return Err(ApiError::MissingColumns(STAGED_FORECAST.to_string()));
    }

    let ingredients = column(&df, "ingredient_name").map_err(ApiError::Internal)?;
    let predictions = column(&df, "predicted_usage_next_month").map_err(ApiError::Internal)?;

    let mut entries = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        entries.push(ForecastEntry {
            ingredient_name: cell_str(ingredients, idx).unwrap_or_default(),
            predicted_usage_next_month: cell_f64(predictions, idx).unwrap_or(0.0),
        });
    }
    Ok(Json(entries))
}

/// Shipment and delay data for inventory tracking.
pub async fn shipments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShipmentEntry>>, ApiError> {
    let df = read_dataset(&state, STAGED_SHIPMENTS)?;

    if !has_column(&df, "ingredient_name") {
        return Err(ApiError::MissingColumns(STAGED_SHIPMENTS.to_string()));
    }

    let ingredients = column(&df, "ingredient_name").map_err(ApiError::Internal)?;
    let expected = column_if_present(&df, "expected_date")?;
    let arrival = column_if_present(&df, "arrival_date")?;
    let delays = column_if_present(&df, "delay_days")?;
    let quantities = column_if_present(&df, "quantity")?;

    let mut entries = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        entries.push(ShipmentEntry {
            ingredient_name: cell_str(ingredients, idx).unwrap_or_default(),
            expected_date: expected.and_then(|series| cell_str(series, idx)),
            arrival_date: arrival.and_then(|series| cell_str(series, idx)),
            delay_days: delays.and_then(|series| cell_i64(series, idx)),
            quantity: quantities.and_then(|series| cell_f64(series, idx)),
        });
    }
    Ok(Json(entries))
}

fn column_if_present<'a>(
    df: &'a DataFrame,
    name: &str,
) -> Result<Option<&'a polars::prelude::Series>, ApiError> {
    if has_column(df, name) {
        Ok(Some(column(df, name).map_err(ApiError::Internal)?))
    } else {
        Ok(None)
    }
}

/// Simple liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
