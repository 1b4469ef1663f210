//! Access through a same-origin `/stock-data` proxy.
//!
//! The proxy already normalizes upstream records and computes `hasMore`, so this
//! provider only maps the [`StockDataEnvelope`](crate::models::envelope::StockDataEnvelope)
//! onto a [`Page`](crate::models::page::Page).

pub mod provider;

pub use provider::ProxyProvider;
