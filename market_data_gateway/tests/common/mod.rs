#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use serde_json::{Value, json};

pub const DAY_MS: i64 = 86_400_000;
pub const FIRST_BAR_MS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

/// Serves `router` on an ephemeral local port and returns its origin.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

/// `n` upstream aggregate records, one day apart, starting at `start_index` days
/// after [`FIRST_BAR_MS`].
pub fn aggregate_records(start_index: usize, n: usize) -> Vec<Value> {
    (start_index..start_index + n)
        .map(|i| {
            let px = 100.0 + i as f64;
            json!({
                "t": FIRST_BAR_MS + i as i64 * DAY_MS,
                "o": px,
                "h": px + 2.0,
                "l": px - 1.0,
                "c": px + 1.0,
                "v": 1_000.0 + i as f64,
            })
        })
        .collect()
}

/// Captured request details shared between the mock and the test body.
pub type Captured = Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>;
