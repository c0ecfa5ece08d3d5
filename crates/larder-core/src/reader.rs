// crates/larder-core/src/reader.rs
//
// Whole-file tabular loading. Format is picked by extension: comma-delimited
// text goes through the polars CSV reader with schema inference, spreadsheets
// through calamine into an all-string frame (first sheet, first row as the
// header). No streaming; the full table is always materialized.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;

use crate::error::{PipelineError, Result};

pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PipelineError::MissingFile(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => read_csv(path),
        "xlsx" | "xls" => read_spreadsheet(path),
        _ => Err(PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        }),
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn read_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        return Err(PipelineError::Processing(format!(
            "spreadsheet {} has no worksheets",
            path.display()
        )));
    };

    let range = workbook.worksheet_range(&sheet_name)?;
    range_to_frame(&range)
}

/// Converts a worksheet range into a frame of nullable string columns. The
/// stagers own all further typing, so no dtype inference happens here.
fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(DataFrame::default());
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_value));
        }
    }

    let columns: Vec<Column> = headers
        .iter()
        .zip(values.iter())
        .map(|(header, column)| {
            Series::new(
                header.as_str().into(),
                column
                    .iter()
                    .map(|value| value.as_deref())
                    .collect::<Vec<Option<&str>>>(),
            )
            .into()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn cell_value(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => Some(value.as_f64().to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => Some(value.clone()),
    }
}
