//! Direct access to the upstream aggregates REST API.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{API_KEY_ENV, PolygonProvider};
