// crates/larder-core/src/table.rs
//
// Shared eager-frame utilities. Raw exports arrive with mixed dtypes (CSV
// inference vs. all-string spreadsheets), so cell access here is loosely
// typed and the stagers decide what each value means.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use polars::prelude::*;

use crate::error::Result;

/// Canonical form of a raw column name: trimmed, lower-cased, spaces
/// replaced with underscores.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Normalizes every column name of the frame in place.
pub fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_name(name.as_str()))
        .collect();
    df.set_column_names(names.iter().map(|name| name.as_str()))?;
    Ok(())
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|n| n.as_str() == name)
}

pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    Ok(df.column(name)?.as_materialized_series())
}

/// Cell as a trimmed string. `None` for nulls and whitespace-only values;
/// numeric cells render with their natural formatting.
pub fn cell_str(series: &Series, idx: usize) -> Option<String> {
    match series.get(idx).ok()? {
        AnyValue::Null => None,
        AnyValue::String(v) => non_empty(v),
        AnyValue::StringOwned(v) => non_empty(v.as_str()),
        AnyValue::Boolean(v) => Some(v.to_string()),
        AnyValue::Int8(v) => Some(v.to_string()),
        AnyValue::Int16(v) => Some(v.to_string()),
        AnyValue::Int32(v) => Some(v.to_string()),
        AnyValue::Int64(v) => Some(v.to_string()),
        AnyValue::UInt8(v) => Some(v.to_string()),
        AnyValue::UInt16(v) => Some(v.to_string()),
        AnyValue::UInt32(v) => Some(v.to_string()),
        AnyValue::UInt64(v) => Some(v.to_string()),
        AnyValue::Float32(v) => Some(v.to_string()),
        AnyValue::Float64(v) => Some(v.to_string()),
        AnyValue::Date(days) => epoch()
            .checked_add_signed(Duration::days(days as i64))
            .map(|date| date.to_string()),
        _ => None,
    }
}

/// Cell as a float. `None` for nulls and values that are neither numeric
/// nor a parseable numeric string.
pub fn cell_f64(series: &Series, idx: usize) -> Option<f64> {
    match series.get(idx).ok()? {
        AnyValue::Null => None,
        AnyValue::String(v) => v.trim().parse().ok(),
        AnyValue::StringOwned(v) => v.as_str().trim().parse().ok(),
        AnyValue::Int8(v) => Some(v as f64),
        AnyValue::Int16(v) => Some(v as f64),
        AnyValue::Int32(v) => Some(v as f64),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(v as f64),
        AnyValue::UInt16(v) => Some(v as f64),
        AnyValue::UInt32(v) => Some(v as f64),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(v as f64),
        AnyValue::Float64(v) => Some(v),
        _ => None,
    }
}

pub fn cell_i64(series: &Series, idx: usize) -> Option<i64> {
    match series.get(idx).ok()? {
        AnyValue::Null => None,
        AnyValue::String(v) => v.trim().parse().ok(),
        AnyValue::StringOwned(v) => v.as_str().trim().parse().ok(),
        AnyValue::Int8(v) => Some(v as i64),
        AnyValue::Int16(v) => Some(v as i64),
        AnyValue::Int32(v) => Some(v as i64),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(v as i64),
        AnyValue::UInt16(v) => Some(v as i64),
        AnyValue::UInt32(v) => Some(v as i64),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => Some(v as i64),
        AnyValue::Float64(v) => Some(v as i64),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

/// Replaces the named column with a nullable Float64 coercion of itself.
/// Values that are neither numeric nor parseable numeric strings become
/// null.
pub fn coerce_float_column(df: &mut DataFrame, name: &str) -> Result<()> {
    let values: Vec<Option<f64>> = {
        let series = column(df, name)?;
        (0..series.len()).map(|idx| cell_f64(series, idx)).collect()
    };
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Stacks the frames top to bottom, preserving input order.
pub fn concat_frames(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut iter = frames.into_iter();
    let Some(mut combined) = iter.next() else {
        return Ok(DataFrame::default());
    };
    for df in iter {
        combined.vstack_mut(&df)?;
    }
    Ok(combined)
}

/// Writes the frame as CSV, creating parent directories and overwriting any
/// prior output at the path.
pub fn write_staged(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;
    Ok(())
}
