//! Provider abstraction for market data sources.
//!
//! This module defines the [`BarGateway`] trait, the single seam through which
//! callers request one page of bars for one symbol. Concrete providers handle the
//! vendor-specific request shape and map the payload into [`Page`].
//!
//! Inside a provider, failures are classified with [`ProviderError`]; at the
//! trait boundary they are flattened into a [`FetchError`] so that callers only
//! ever see a displayable message.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//!
//! use async_trait::async_trait;
//! use market_data_gateway::{BarGateway, FetchError, Page, Symbol};
//!
//! struct Empty;
//!
//! #[async_trait]
//! impl BarGateway for Empty {
//!     async fn fetch(&self, _symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
//!         Ok(Page { page, bars: vec![], has_more: false })
//!     }
//! }
//! ```

pub mod polygon_rest;
pub mod proxy;
mod throttle;

use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use shared_utils::env::EnvError;
use snafu::{Backtrace, Snafu};

use crate::{
    errors::FetchError,
    models::{page::Page, symbol::Symbol},
};

/// Fetches one page of bars for one symbol.
///
/// Implementations issue exactly one network call per invocation, never retry,
/// and never mutate shared state, so they are safe to call concurrently.
#[async_trait]
pub trait BarGateway: Send + Sync {
    async fn fetch(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError>;
}

#[async_trait]
impl<G: BarGateway + ?Sized> BarGateway for Arc<G> {
    async fn fetch(&self, symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
        (**self).fetch(symbol, page).await
    }
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing API key: {source}"))]
    MissingApiKey {
        source: EnvError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Failure taxonomy inside a provider, before collapsing into [`FetchError`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Network, DNS, TLS or timeout failure.
    #[snafu(display("Request to {endpoint} failed: {source}"))]
    Transport {
        endpoint: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Upstream answered, but not with success.
    #[snafu(display("Upstream rejected the request ({status}): {detail}"))]
    UpstreamStatus {
        status: String,
        detail: String,
        backtrace: Backtrace,
    },

    /// The payload does not have the expected shape.
    #[snafu(display("Malformed response: {message}"))]
    MalformedResponse {
        message: String,
        backtrace: Backtrace,
    },

    /// The request could not be expressed for this provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        FetchError::new(err.to_string())
    }
}

/// Upper bound on how much of an error body is carried into a message.
const MAX_DETAIL_CHARS: usize = 300;

pub(crate) fn truncate_detail(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "no response body".to_string();
    }
    match body.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use nonzero_ext::nonzero;
    use snafu::IntoError;

    use super::*;
    use crate::models::bar::Bar;

    struct FixedProvider;
    struct FailingProvider;

    #[async_trait]
    impl BarGateway for FixedProvider {
        async fn fetch(&self, _symbol: &Symbol, page: NonZeroU32) -> Result<Page, FetchError> {
            let bar = Bar {
                timestamp: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10.0,
            };
            Ok(Page::from_bars(page, vec![bar], nonzero!(1u32)))
        }
    }

    #[async_trait]
    impl BarGateway for FailingProvider {
        async fn fetch(&self, _symbol: &Symbol, _page: NonZeroU32) -> Result<Page, FetchError> {
            Err(MalformedResponseSnafu {
                message: "missing field `t`",
            }
            .build()
            .into())
        }
    }

    // The caller picks a provider at runtime and only sees the trait.
    fn get_provider(name: &str) -> Arc<dyn BarGateway> {
        if name == "fixed" {
            Arc::new(FixedProvider)
        } else {
            Arc::new(FailingProvider)
        }
    }

    #[tokio::test]
    async fn dynamic_dispatch_through_arc() {
        let symbol = Symbol::parse("aapl").unwrap();

        let page = get_provider("fixed")
            .fetch(&symbol, nonzero!(2u32))
            .await
            .unwrap();
        assert_eq!(page.page.get(), 2);
        assert!(page.has_more);

        let err = get_provider("failing")
            .fetch(&symbol, nonzero!(1u32))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Malformed response: missing field `t`");
    }

    #[test]
    fn every_category_collapses_to_a_message() {
        let status: FetchError = UpstreamStatusSnafu {
            status: "HTTP 503",
            detail: "maintenance",
        }
        .build()
        .into();
        assert_eq!(
            status.message,
            "Upstream rejected the request (HTTP 503): maintenance"
        );

        let init = MissingApiKeySnafu.into_error(EnvError::Missing("POLYGON_API_KEY".into()));
        assert!(init.to_string().contains("POLYGON_API_KEY"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let detail = truncate_detail(&long);
        assert_eq!(detail.chars().count(), MAX_DETAIL_CHARS + 1);
        assert_eq!(truncate_detail("   "), "no response body");
    }
}
