//! Acquisition state owned by the [`Controller`](crate::controller::Controller).

use std::{fmt, num::NonZeroU32};

use market_data_gateway::{Bar, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Loaded,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Loaded => "loaded",
            Status::Error => "error",
        })
    }
}

/// Everything the controller knows about the current symbol's history.
///
/// `bars` is ascending by time and only grows while the symbol stays the same;
/// it is cleared, never appended to, when the symbol changes.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionState {
    pub symbol: Symbol,
    pub page: NonZeroU32,
    pub bars: Vec<Bar>,
    pub status: Status,
    pub has_more: bool,
    pub error_message: Option<String>,
}

impl AcquisitionState {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            page: NonZeroU32::MIN,
            bars: Vec::new(),
            status: Status::Idle,
            has_more: true,
            error_message: None,
        }
    }
}

/// Tag recorded for a request when it is issued and handed back with its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub symbol: Symbol,
    pub page: NonZeroU32,
    /// `true` for "load more" (concatenate), `false` for a replace.
    pub append: bool,
    /// Request-stream generation; bumped by every replace request.
    pub epoch: u64,
}

/// Read-only view of the controller handed to the rendering side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    pub symbol: &'a Symbol,
    pub bars: &'a [Bar],
    pub status: Status,
    pub has_more: bool,
    pub error_message: Option<&'a str>,
    pub page: NonZeroU32,
    /// Changes whenever `bars` changes.
    pub revision: u64,
}
