use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chart_sync::{
    ChartView, Session, Snapshot, Status,
    command::{Command, HELP},
    text_surface::{TextCandles, TextPane},
};
use clap::Parser;
use market_data_gateway::{
    BarGateway, GatewayConfig, Symbol,
    providers::{polygon_rest::PolygonProvider, proxy::ProxyProvider},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Terminal candlestick viewer with paginated history")]
struct Cli {
    /// Symbol shown at startup.
    #[arg(long, default_value = "AAPL")]
    symbol: String,
    /// Fetch through a `/stock-data` proxy at this origin instead of going upstream.
    #[arg(long, value_name = "URL")]
    proxy_url: Option<String>,
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 100)]
    width: u32,
    #[arg(long, default_value_t = 20)]
    height: usize,
}

fn build_gateway(cli: &Cli) -> Result<Arc<dyn BarGateway>> {
    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    match &cli.proxy_url {
        Some(url) => {
            config.base_url = url.clone();
            info!(origin = config.origin(), "using stock-data proxy");
            Ok(Arc::new(ProxyProvider::new(&config)?))
        }
        None => {
            info!(origin = config.origin(), "using upstream aggregates API");
            Ok(Arc::new(PolygonProvider::new(config)?))
        }
    }
}

fn draw(view: &ChartView<TextCandles>, snapshot: &Snapshot<'_>) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if let Some(surface) = view.surface() {
        writeln!(out, "{}", surface.frame())?;
    }
    let mut status = format!(
        "{} | {} | page {} | {} bars",
        snapshot.symbol,
        snapshot.status,
        snapshot.page,
        snapshot.bars.len()
    );
    if !snapshot.has_more {
        status.push_str(" | end of history");
    }
    if snapshot.status == Status::Error {
        if let Some(message) = snapshot.error_message {
            status.push_str(&format!(" | {message} (type `retry`)"));
        }
    }
    writeln!(out, "{status}")?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    shared_utils::logging::init_tracing("info");

    let cli = Cli::parse();
    let symbol = Symbol::parse(&cli.symbol).context("invalid --symbol")?;
    let gateway = build_gateway(&cli)?;

    let mut session = Session::new(gateway, symbol);
    let mut view: ChartView<TextCandles> = ChartView::new(TextPane::new(cli.height), cli.width);
    session.refresh();
    draw(&view, &session.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(_) = session.next_completion(), if session.outstanding() > 0 => {}
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::More) => {
                        session.load_more();
                    }
                    Ok(Command::Symbol(raw)) => {
                        session.set_symbol(&raw);
                    }
                    Ok(Command::Refresh) => {
                        session.refresh();
                    }
                    Ok(Command::Retry) => {
                        session.retry();
                    }
                    Ok(Command::Width(width)) => view.on_container_resize(width),
                    Err(message) => {
                        println!("{message}\n{HELP}");
                        continue;
                    }
                }
            }
        }
        let snapshot = session.snapshot();
        view.sync(&snapshot)?;
        draw(&view, &snapshot)?;
    }

    // Dropping the view releases the surface.
    drop(view);
    Ok(())
}
