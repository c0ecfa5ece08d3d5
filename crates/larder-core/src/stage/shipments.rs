// crates/larder-core/src/stage/shipments.rs

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::paths::DataPaths;
use crate::reader::read_table;
use crate::schema::SHIPMENT_SCHEMA;
use crate::table::{
    cell_str, coerce_float_column, column, epoch, has_column, normalize_column_names, write_staged,
};

/// Date layouts seen in the raw shipment exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Stages the shipment log into `staged/shipments_staged.csv`, deriving the
/// per-row delivery delay where the export carries both date columns.
pub fn stage_shipments(paths: &DataPaths) -> Result<DataFrame> {
    let raw = read_table(&paths.raw_shipments())?;
    let mut staged = transform_shipments(raw)?;

    SHIPMENT_SCHEMA.validate(&staged)?;

    let output = paths.staged_shipments();
    write_staged(&mut staged, &output)?;
    info!(rows = staged.height(), output = %output.display(), "staged shipments");
    Ok(staged)
}

/// Normalizes every column name uniformly, coerces `quantity` to nullable
/// float, and derives `delay_days` = arrival − expected in whole days.
/// Unparseable dates become null; a row missing either date gets a null
/// delay. Exports without the date columns pass through without a
/// `delay_days` column.
pub fn transform_shipments(mut df: DataFrame) -> Result<DataFrame> {
    normalize_column_names(&mut df)?;

    if has_column(&df, "quantity") {
        coerce_float_column(&mut df, "quantity")?;
    }

    if has_column(&df, "expected_date") && has_column(&df, "arrival_date") {
        let expected = parse_date_column(column(&df, "expected_date")?);
        let arrival = parse_date_column(column(&df, "arrival_date")?);

        let delay_days: Vec<Option<i64>> = expected
            .iter()
            .zip(arrival.iter())
            .map(|(expected, arrival)| match (expected, arrival) {
                (Some(expected), Some(arrival)) => Some((*arrival - *expected).num_days()),
                _ => None,
            })
            .collect();

        df.with_column(date_series("expected_date", &expected)?)?;
        df.with_column(date_series("arrival_date", &arrival)?)?;
        df.with_column(Series::new("delay_days".into(), delay_days))?;
    }

    Ok(df)
}

fn parse_date_column(series: &Series) -> Vec<Option<NaiveDate>> {
    (0..series.len())
        .map(|idx| cell_str(series, idx).and_then(|raw| parse_date(&raw)))
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> Result<Series> {
    let epoch = epoch();
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|date| date.map(|date| (date - epoch).num_days() as i32))
        .collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}
