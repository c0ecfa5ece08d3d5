// crates/larder-core/src/pipeline.rs

use tracing::{error, info};

use crate::error::Result;
use crate::paths::DataPaths;
use crate::stage::{stage_forecast, stage_ingredients, stage_sales, stage_shipments};

/// Runs the full staging pipeline in dependency order. Forecast consumes
/// the staged sales and ingredient files, so the order is fixed:
/// ingredients, shipments, sales, then forecast. The first error that
/// escapes a stage aborts the remaining run; outputs already written by
/// earlier stages stay in place.
pub fn run_all(paths: &DataPaths) -> Result<()> {
    info!(root = %paths.root().display(), "starting staging pipeline");

    run_stage("ingredients", || stage_ingredients(paths).map(|_| ()))?;
    run_stage("shipments", || stage_shipments(paths).map(|_| ()))?;
    run_stage("sales", || stage_sales(paths).map(|_| ()))?;
    run_stage("forecast", || stage_forecast(paths).map(|_| ()))?;

    info!("staging pipeline completed successfully");
    Ok(())
}

fn run_stage(name: &str, stage: impl FnOnce() -> Result<()>) -> Result<()> {
    stage().map_err(|err| {
        error!(stage = name, %err, "stage failed");
        err
    })
}
