mod common;

use std::collections::HashMap;

use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
use common::{DAY_MS, FIRST_BAR_MS, spawn_server};
use market_data_gateway::{
    BarGateway, GatewayConfig, Symbol, models::envelope::StockDataEnvelope,
    providers::proxy::ProxyProvider,
};
use nonzero_ext::nonzero;
use serde_json::{Value, json};

fn bar_json(i: i64) -> Value {
    json!({
        "timestamp": FIRST_BAR_MS + i * DAY_MS,
        "open": 10.0, "high": 11.0, "low": 9.0, "close": 10.5, "volume": 500.0
    })
}

async fn stock_data(Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let symbol = q.get("symbol").cloned().unwrap_or_default();
    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    match symbol.as_str() {
        "AAPL" => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": [bar_json(0), bar_json(1)],
                "page": page,
                "hasMore": page < 3,
            })),
        ),
        "LIES" => (
            StatusCode::OK,
            Json(json!({"status": "success", "data": [], "page": page + 1, "hasMore": false})),
        ),
        "HTML" => (StatusCode::OK, Json(json!("<html>not json</html>"))),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::to_value(StockDataEnvelope::error("Unknown ticker")).unwrap()),
        ),
    }
}

async fn proxy() -> ProxyProvider {
    let base = spawn_server(Router::new().route("/stock-data", get(stock_data))).await;
    let config = GatewayConfig {
        base_url: base,
        ..GatewayConfig::default()
    };
    ProxyProvider::new(&config).unwrap()
}

#[tokio::test]
async fn success_envelope_maps_to_a_page() {
    let provider = proxy().await;

    let page = provider
        .fetch(&Symbol::parse("aapl").unwrap(), nonzero!(2u32))
        .await
        .unwrap();
    assert_eq!(page.page.get(), 2);
    assert_eq!(page.len(), 2);
    assert!(page.has_more);
    assert_eq!(page.bars[1].timestamp.timestamp_millis(), FIRST_BAR_MS + DAY_MS);

    let last = provider
        .fetch(&Symbol::parse("AAPL").unwrap(), nonzero!(3u32))
        .await
        .unwrap();
    assert!(!last.has_more);
}

#[tokio::test]
async fn error_envelope_message_is_surfaced() {
    let err = proxy()
        .await
        .fetch(&Symbol::parse("ZZZZ").unwrap(), nonzero!(1u32))
        .await
        .unwrap_err();
    assert_eq!(
        err.message,
        "Upstream rejected the request (HTTP 500): Unknown ticker"
    );
}

#[tokio::test]
async fn mismatched_page_is_malformed() {
    let err = proxy()
        .await
        .fetch(&Symbol::parse("LIES").unwrap(), nonzero!(1u32))
        .await
        .unwrap_err();
    assert!(err.message.contains("served page 2"), "{}", err.message);
}

#[tokio::test]
async fn non_envelope_body_is_malformed() {
    let err = proxy()
        .await
        .fetch(&Symbol::parse("HTML").unwrap(), nonzero!(1u32))
        .await
        .unwrap_err();
    assert!(err.message.starts_with("Malformed response"), "{}", err.message);
}
