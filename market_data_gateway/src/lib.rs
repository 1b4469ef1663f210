//! Paginated retrieval of historical price bars.
//!
//! The crate exposes a single seam, [`BarGateway`](providers::BarGateway): given a
//! [`Symbol`](models::symbol::Symbol) and a 1-based page index it performs exactly one
//! network call and returns a normalized [`Page`](models::page::Page) of
//! [`Bar`](models::bar::Bar)s, or a [`FetchError`](errors::FetchError) carrying a
//! human-readable message. Two implementations are provided:
//!
//! - [`PolygonProvider`](providers::polygon_rest::PolygonProvider) talks to the upstream
//!   aggregates API directly, holding the API key out of band.
//! - [`ProxyProvider`](providers::proxy::ProxyProvider) talks to a same-origin
//!   `/stock-data` endpoint that already speaks the normalized shape.

pub mod config;
pub mod errors;
pub mod models;
pub mod providers;

pub use config::GatewayConfig;
pub use errors::{ConfigError, FetchError};
pub use models::{bar::Bar, page::Page, symbol::Symbol};
pub use providers::BarGateway;
