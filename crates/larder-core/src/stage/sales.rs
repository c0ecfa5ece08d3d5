// crates/larder-core/src/stage/sales.rs

use std::path::{Path, PathBuf};

use glob::glob;
use polars::prelude::*;
use tracing::{error, info};

use crate::error::{PipelineError, Result};
use crate::paths::{DataPaths, SALES_MARKER};
use crate::reader::read_table;
use crate::schema::SALES_SCHEMA;
use crate::table::{
    coerce_float_column, concat_frames, has_column, normalize_column_names, write_staged,
};

/// Stages every monthly sales extract into one union table at
/// `staged/sales_staged.csv`. A corrupt extract is logged and skipped
/// rather than aborting the stage; the run fails only when no extract
/// matches or none survives.
pub fn stage_sales(paths: &DataPaths) -> Result<DataFrame> {
    let files = discover_sales_extracts(&paths.raw_dir())?;
    if files.is_empty() {
        return Err(PipelineError::Processing(format!(
            "no sales extracts matching *{}*.xlsx under {}",
            SALES_MARKER,
            paths.raw_dir().display()
        )));
    }

    let (frames, failures) = load_monthly_extracts(&files);
    if frames.is_empty() {
        return Err(PipelineError::Processing(format!(
            "all {} matched sales extracts failed to process",
            failures.len()
        )));
    }

    let mut staged = concat_frames(frames)?;
    if has_column(&staged, "quantity") {
        coerce_float_column(&mut staged, "quantity")?;
    }

    SALES_SCHEMA.validate(&staged)?;

    let output = paths.staged_sales();
    write_staged(&mut staged, &output)?;
    info!(
        rows = staged.height(),
        extracts = files.len() - failures.len(),
        skipped = failures.len(),
        output = %output.display(),
        "staged sales"
    );
    Ok(staged)
}

/// Monthly extracts are matched purely by naming convention: the filename
/// contains the marker token and carries the spreadsheet extension.
/// Returned in lexicographic order so reruns concatenate identically.
pub fn discover_sales_extracts(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*{}*.xlsx", raw_dir.display(), SALES_MARKER);
    let mut files: Vec<PathBuf> = glob(&pattern)
        .map_err(|err| PipelineError::Processing(format!("invalid sales glob pattern: {err}")))?
        .filter_map(|entry| entry.ok())
        .collect();
    files.sort();
    Ok(files)
}

/// The reporting month is the filename's leading underscore-separated
/// token, lower-cased.
pub fn month_from_filename(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .split('_')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Partial-failure fold over the discovered extracts: successes accumulate
/// into frames, failures into a diagnostic list. One bad monthly file never
/// aborts the others.
pub fn load_monthly_extracts(
    files: &[PathBuf],
) -> (Vec<DataFrame>, Vec<(PathBuf, PipelineError)>) {
    let mut frames = Vec::new();
    let mut failures = Vec::new();

    for file in files {
        match load_extract(file) {
            Ok(df) => {
                info!(file = %file.display(), rows = df.height(), "processed sales extract");
                frames.push(df);
            }
            Err(err) => {
                error!(file = %file.display(), %err, "skipping sales extract");
                failures.push((file.clone(), err));
            }
        }
    }

    (frames, failures)
}

fn load_extract(path: &Path) -> Result<DataFrame> {
    let mut df = read_table(path)?;
    normalize_column_names(&mut df)?;

    let month = month_from_filename(path);
    let months = vec![month.as_str(); df.height()];
    df.with_column(Series::new("month".into(), months))?;
    Ok(df)
}
