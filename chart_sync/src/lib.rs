//! Incremental bar acquisition and chart synchronization.
//!
//! - [`controller::Controller`] owns the acquisition state machine: symbol,
//!   page, accumulated bars and loading status. Intents return a
//!   [`state::FetchTicket`] describing the fetch to issue; completions come back
//!   through [`controller::Controller::on_fetch_result`], which discards stale
//!   results.
//! - [`session::Session`] pairs a controller with a
//!   [`BarGateway`](market_data_gateway::BarGateway), issuing fetches on tokio
//!   tasks and applying completions on the owner's task.
//! - [`surface::ChartView`] owns a [`surface::ChartSurface`] and drives its
//!   lifecycle from controller snapshots.

pub mod command;
pub mod controller;
pub mod session;
pub mod state;
pub mod surface;
pub mod text_surface;

pub use controller::{Controller, FetchOutcome, StaleReason};
pub use session::Session;
pub use state::{AcquisitionState, FetchTicket, Snapshot, Status};
pub use surface::{ChartSurface, ChartView, SurfaceError};
