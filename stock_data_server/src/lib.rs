//! HTTP front for a [`BarGateway`].
//!
//! `GET /stock-data?symbol=&page=` answers with a
//! [`StockDataEnvelope`]: 200 and the page on success, 500 with the gateway's
//! message when the fetch fails, 400 when the query itself is unusable. The
//! upstream API key never leaves the process.

use std::{num::NonZeroU32, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use market_data_gateway::{
    BarGateway, Symbol, models::envelope::StockDataEnvelope,
    providers::proxy::provider::STOCK_DATA_PATH,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub const DEFAULT_SYMBOL: &str = "AAPL";

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<dyn BarGateway>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StockDataParams {
    symbol: Option<String>,
    page: Option<String>,
}

type Reply = (StatusCode, Json<StockDataEnvelope>);

pub fn app(gateway: Arc<dyn BarGateway>) -> Router {
    Router::new()
        .route(STOCK_DATA_PATH, get(stock_data_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { gateway })
}

fn bad_request(message: String) -> Reply {
    (StatusCode::BAD_REQUEST, Json(StockDataEnvelope::error(message)))
}

fn parse_page(raw: Option<&str>) -> Result<NonZeroU32, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(NonZeroU32::MIN),
        Some(s) => s
            .parse::<NonZeroU32>()
            .map_err(|_| format!("page must be a positive integer, got {s:?}")),
    }
}

async fn stock_data_handler(
    State(state): State<AppState>,
    Query(params): Query<StockDataParams>,
) -> Reply {
    // Only an absent parameter falls back; an explicit blank one is rejected.
    let raw_symbol = params.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL);
    let symbol = match Symbol::parse(raw_symbol) {
        Ok(symbol) => symbol,
        Err(err) => return bad_request(err.to_string()),
    };
    let page = match parse_page(params.page.as_deref()) {
        Ok(page) => page,
        Err(message) => return bad_request(message),
    };

    match state.gateway.fetch(&symbol, page).await {
        Ok(batch) => {
            info!(%symbol, page = page.get(), bars = batch.len(), has_more = batch.has_more, "served page");
            (
                StatusCode::OK,
                Json(StockDataEnvelope::Success {
                    data: batch.bars,
                    page: batch.page.get(),
                    has_more: batch.has_more,
                }),
            )
        }
        Err(err) => {
            warn!(%symbol, page = page.get(), error = %err, "fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StockDataEnvelope::error(err.message)),
            )
        }
    }
}
