use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use market_data_gateway::{GatewayConfig, providers::polygon_rest::PolygonProvider};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Paginated stock bars over HTTP")]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:8787")]
    bind: SocketAddr,
    /// Gateway settings; environment variables override the file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    shared_utils::logging::init_tracing("info,tower_http=debug");

    let cli = Cli::parse();
    let config = GatewayConfig::load(cli.config.as_deref())?;
    let provider = PolygonProvider::new(config)?;
    let app = stock_data_server::app(Arc::new(provider));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("bind {}", cli.bind))?;
    info!(addr = %cli.bind, "stock-data server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
