use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    config::GatewayConfig,
    errors::FetchError,
    models::{
        bar::{Bar, timestamp_from_epoch},
        page::{Page, page_offset},
        symbol::Symbol,
    },
    providers::{
        BarGateway, ClientBuildSnafu, MalformedResponseSnafu, MissingApiKeySnafu, ProviderError,
        ProviderInitError, TransportSnafu, UpstreamStatusSnafu, ValidationSnafu,
        polygon_rest::{
            params::{AggregatesQuery, DateRange, Sort},
            response::{AggregateBar, AggregatesResponse},
        },
        throttle::Throttle,
        truncate_detail,
    },
};

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "POLYGON_API_KEY";

/// Largest `limit` the aggregates endpoint accepts.
pub const MAX_LIMIT: u32 = 50_000;

pub struct PolygonProvider {
    client: Client,
    api_key: SecretString,
    config: GatewayConfig,
    throttle: Throttle,
}

impl PolygonProvider {
    /// Creates a new provider.
    ///
    /// Reads the API key from the `POLYGON_API_KEY` environment variable.
    pub fn new(config: GatewayConfig) -> Result<Self, ProviderInitError> {
        let api_key = get_env_var(API_KEY_ENV).context(MissingApiKeySnafu)?;
        Self::with_api_key(config, SecretString::from(api_key))
    }

    pub fn with_api_key(
        config: GatewayConfig,
        api_key: SecretString,
    ) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            api_key,
            throttle: Throttle::per_minute(config.max_requests_per_minute),
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Aggregates endpoint for `symbol` over the configured trailing window.
    ///
    /// Carries no credentials, so it is safe to log.
    fn endpoint(&self, symbol: &Symbol) -> String {
        let range = DateRange::trailing_years(Utc::now().date_naive(), self.config.history_years);
        format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}",
            self.config.origin(),
            symbol,
            self.config.timeframe.range_segment(),
            range.path_segment()
        )
    }

    async fn fetch_page(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, ProviderError> {
        let page_size = self.config.page_size;
        if page_size.get() > MAX_LIMIT {
            return ValidationSnafu {
                message: format!("page size {page_size} exceeds the upstream limit of {MAX_LIMIT}"),
            }
            .fail();
        }
        let query = AggregatesQuery {
            adjusted: true,
            sort: Sort::Asc,
            limit: page_size.get(),
            offset: page_offset(page, page_size),
        };
        let endpoint = self.endpoint(symbol);

        self.throttle.acquire().await;
        debug!(%symbol, page = page.get(), offset = query.offset, "requesting aggregates");

        let response = self
            .client
            .get(&endpoint)
            .query(&query)
            .query(&[("apiKey", self.api_key.expose_secret())])
            .send()
            .await
            // The request URL carries the key in its query string.
            .map_err(|e| e.without_url())
            .context(TransportSnafu {
                endpoint: endpoint.as_str(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return UpstreamStatusSnafu {
                status: format!("HTTP {}", status.as_u16()),
                detail: truncate_detail(&body),
            }
            .fail();
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| e.without_url())
            .context(TransportSnafu {
                endpoint: endpoint.as_str(),
            })?;
        let parsed: AggregatesResponse =
            serde_json::from_slice(&body).map_err(|e| {
                MalformedResponseSnafu {
                    message: e.to_string(),
                }
                .build()
            })?;

        if !parsed.is_ok() {
            return UpstreamStatusSnafu {
                status: parsed.status.clone(),
                detail: parsed.error_detail(),
            }
            .fail();
        }

        let bars = parsed
            .results
            .into_iter()
            .map(to_bar)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::from_bars(page, bars, page_size))
    }
}

fn to_bar(raw: AggregateBar) -> Result<Bar, ProviderError> {
    let timestamp = timestamp_from_epoch(raw.timestamp).ok_or_else(|| {
        MalformedResponseSnafu {
            message: format!("timestamp {} is out of range", raw.timestamp),
        }
        .build()
    })?;
    Ok(Bar {
        timestamp,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.volume,
    })
}

#[async_trait]
impl BarGateway for PolygonProvider {
    async fn fetch(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
        match self.fetch_page(symbol, page).await {
            Ok(p) => {
                debug!(%symbol, page = page.get(), bars = p.len(), has_more = p.has_more, "page fetched");
                Ok(p)
            }
            Err(err) => {
                warn!(%symbol, page = page.get(), error = %err, "aggregates request failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use snafu::IntoError;

    use super::*;

    #[test]
    fn endpoint_has_no_credentials() {
        let config = GatewayConfig {
            base_url: "http://localhost:1/".into(),
            ..GatewayConfig::default()
        };
        let provider =
            PolygonProvider::with_api_key(config, SecretString::from("sekrit".to_string()))
                .unwrap();
        let endpoint = provider.endpoint(&Symbol::parse("msft").unwrap());

        assert!(endpoint.starts_with("http://localhost:1/v2/aggs/ticker/MSFT/range/1/day/"));
        assert!(!endpoint.contains("sekrit"));
    }

    #[test]
    fn rejects_unrepresentable_timestamps() {
        let raw = AggregateBar {
            timestamp: i64::MAX,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        };
        assert!(matches!(
            to_bar(raw),
            Err(ProviderError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_pages_fail_before_any_request() {
        let config = GatewayConfig {
            base_url: "http://localhost:1".into(),
            page_size: NonZeroU32::new(MAX_LIMIT + 1).unwrap(),
            ..GatewayConfig::default()
        };
        let provider =
            PolygonProvider::with_api_key(config, SecretString::from("k".to_string())).unwrap();
        let err = provider
            .fetch_page(&Symbol::parse("AAPL").unwrap(), NonZeroU32::MIN)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }

    #[test]
    fn missing_key_is_an_init_error() {
        let err = MissingApiKeySnafu
            .into_error(shared_utils::env::EnvError::Missing(API_KEY_ENV.to_string()));
        assert!(matches!(err, ProviderInitError::MissingApiKey { .. }));
    }
}
