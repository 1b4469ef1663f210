use std::num::NonZeroU32;

use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    config::GatewayConfig,
    errors::FetchError,
    models::{envelope::StockDataEnvelope, page::Page, symbol::Symbol},
    providers::{
        BarGateway, ClientBuildSnafu, MalformedResponseSnafu, ProviderError, ProviderInitError,
        TransportSnafu, UpstreamStatusSnafu, truncate_detail,
    },
};

pub const STOCK_DATA_PATH: &str = "/stock-data";

pub struct ProxyProvider {
    client: Client,
    endpoint: String,
}

impl ProxyProvider {
    /// Creates a provider targeting `{config.base_url}/stock-data`.
    pub fn new(config: &GatewayConfig) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(ClientBuildSnafu)?;
        Ok(Self {
            client,
            endpoint: format!("{}{STOCK_DATA_PATH}", config.origin()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_page(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("symbol", symbol.as_str())])
            .query(&[("page", page.get())])
            .send()
            .await
            .context(TransportSnafu {
                endpoint: self.endpoint.as_str(),
            })?;

        let status = response.status();
        let body = response.bytes().await.context(TransportSnafu {
            endpoint: self.endpoint.as_str(),
        })?;
        let envelope = serde_json::from_slice::<StockDataEnvelope>(&body);

        if !status.is_success() {
            let detail = match envelope {
                Ok(StockDataEnvelope::Error { message }) => message,
                _ => truncate_detail(&String::from_utf8_lossy(&body)),
            };
            return UpstreamStatusSnafu {
                status: format!("HTTP {}", status.as_u16()),
                detail,
            }
            .fail();
        }

        let envelope = envelope.map_err(|e| {
            MalformedResponseSnafu {
                message: e.to_string(),
            }
            .build()
        })?;

        match envelope {
            StockDataEnvelope::Success {
                data,
                page: served,
                has_more,
            } => {
                if served != page.get() {
                    return MalformedResponseSnafu {
                        message: format!("requested page {page} but proxy served page {served}"),
                    }
                    .fail();
                }
                Ok(Page {
                    page,
                    bars: data,
                    has_more,
                })
            }
            StockDataEnvelope::Error { message } => UpstreamStatusSnafu {
                status: "error",
                detail: message,
            }
            .fail(),
        }
    }
}

#[async_trait]
impl BarGateway for ProxyProvider {
    async fn fetch(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
        self.fetch_page(symbol, page)
            .await
            .inspect(|p| debug!(%symbol, page = page.get(), bars = p.len(), "proxy page fetched"))
            .map_err(|err| {
                warn!(%symbol, page = page.get(), error = %err, "proxy request failed");
                err.into()
            })
    }
}
