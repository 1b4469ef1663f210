//! JSON body exchanged between the `/stock-data` endpoint and its clients.

use serde::{Deserialize, Serialize};

use crate::models::bar::Bar;

/// `{"status":"success","data":[..],"page":n,"hasMore":b}` or
/// `{"status":"error","message":".."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StockDataEnvelope {
    Success {
        data: Vec<Bar>,
        page: u32,
        #[serde(rename = "hasMore")]
        has_more: bool,
    },
    Error {
        message: String,
    },
}

impl StockDataEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
