use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use larder_core::paths::DataPaths;
use larder_core::{pipeline, stage};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Larder staging pipeline CLI", long_about = None)]
struct Cli {
    /// Data directory root (overrides LARDER_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full staging pipeline (ingredients, shipments, sales, forecast)
    Run,
    /// Run a single stage
    Stage {
        #[arg(value_enum)]
        domain: Domain,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Domain {
    Ingredients,
    Shipments,
    Sales,
    Forecast,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let paths = match cli.data_dir {
        Some(root) => DataPaths::new(root),
        None => DataPaths::from_env(),
    };

    match cli.command {
        Command::Run => pipeline::run_all(&paths)?,
        Command::Stage { domain } => match domain {
            Domain::Ingredients => {
                stage::stage_ingredients(&paths)?;
            }
            Domain::Shipments => {
                stage::stage_shipments(&paths)?;
            }
            Domain::Sales => {
                stage::stage_sales(&paths)?;
            }
            Domain::Forecast => {
                stage::stage_forecast(&paths)?;
            }
        },
    }

    Ok(())
}
