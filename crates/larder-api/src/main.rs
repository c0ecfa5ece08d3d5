use std::sync::Arc;

use anyhow::Result;
use larder_api::{app, AppState};
use larder_core::paths::DataPaths;
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();
    let paths = DataPaths::from_env();
    let state = Arc::new(AppState { paths });

    let router = app(state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::UNSPECIFIED, 8000)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
