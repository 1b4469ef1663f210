#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroU32,
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_data_gateway::{Bar, BarGateway, FetchError, Page, Symbol};
use tokio::sync::oneshot;

pub const DAY_SECS: i64 = 86_400;
pub const PAGE_SIZE: usize = 50;

/// Price level that tells one symbol's bars apart from another's.
pub fn price_base(symbol: &str) -> f64 {
    symbol.bytes().map(f64::from).sum()
}

/// The `index`-th daily bar in a symbol's history.
pub fn bar_for(symbol: &str, index: usize) -> Bar {
    let base = price_base(symbol);
    Bar {
        timestamp: DateTime::<Utc>::from_timestamp(1_704_067_200 + index as i64 * DAY_SECS, 0)
            .unwrap(),
        open: base,
        high: base + 2.0,
        low: base - 1.0,
        close: base + 1.0,
        volume: 1_000.0 + index as f64,
    }
}

pub fn page_of(symbol: &str, page: u32, len: usize, has_more: bool) -> Result<Page, FetchError> {
    let start = (page as usize - 1) * PAGE_SIZE;
    Ok(Page {
        page: NonZeroU32::new(page).unwrap(),
        bars: (start..start + len).map(|i| bar_for(symbol, i)).collect(),
        has_more,
    })
}

/// In-memory gateway serving a fixed-length history per symbol.
///
/// Individual `(symbol, page)` requests can be made to fail, panic once, or
/// be held until released.
#[derive(Default)]
pub struct ScriptedGateway {
    history: HashMap<String, usize>,
    failing: Mutex<HashSet<(String, u32)>>,
    panicking: Mutex<HashSet<(String, u32)>>,
    gates: Mutex<HashMap<(String, u32), oneshot::Receiver<()>>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: &str, bars: usize) -> Self {
        self.history.insert(symbol.to_string(), bars);
        self
    }

    pub fn fail(&self, symbol: &str, page: u32) {
        self.failing.lock().unwrap().insert((symbol.to_string(), page));
    }

    /// Makes the `(symbol, page)` request panic instead of answering.
    pub fn panic_on(&self, symbol: &str, page: u32) {
        self.panicking.lock().unwrap().insert((symbol.to_string(), page));
    }

    pub fn heal(&self, symbol: &str, page: u32) {
        self.failing.lock().unwrap().remove(&(symbol.to_string(), page));
    }

    /// Holds the next `(symbol, page)` request until the returned sender fires.
    pub fn hold(&self, symbol: &str, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((symbol.to_string(), page), rx);
        tx
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BarGateway for ScriptedGateway {
    async fn fetch(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
        let key = (symbol.as_str().to_string(), page.get());
        self.calls.lock().unwrap().push(key.clone());

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let panics = self.panicking.lock().unwrap().remove(&key);
        if panics {
            panic!("gateway blew up on {} page {}", key.0, key.1);
        }
        if self.failing.lock().unwrap().contains(&key) {
            return Err(FetchError::new(format!(
                "Request to {} page {} failed",
                key.0, key.1
            )));
        }

        let total = self.history.get(&key.0).copied().unwrap_or(0);
        let start = (page.get() as usize - 1) * PAGE_SIZE;
        let end = total.min(start + PAGE_SIZE);
        let bars: Vec<Bar> = (start..end.max(start)).map(|i| bar_for(&key.0, i)).collect();
        Ok(Page::from_bars(
            page,
            bars,
            NonZeroU32::new(PAGE_SIZE as u32).unwrap(),
        ))
    }
}
