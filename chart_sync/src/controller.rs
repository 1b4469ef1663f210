//! The acquisition state machine.
//!
//! ```text
//! Idle ──► Loading ──► Loaded
//!             │  ▲        │
//!             ▼  └────────┤  (set_symbol / load_more / refresh / retry)
//!           Error ────────┘
//! ```
//!
//! Intent methods never perform I/O. When a fetch is needed they move the state
//! to `Loading`, remember the request as in flight and return its
//! [`FetchTicket`]; the caller runs the fetch and hands the ticket back to
//! [`Controller::on_fetch_result`]. A result is applied only if its ticket is
//! still the one in flight for the current symbol; anything else is stale.

use std::num::NonZeroU32;

use market_data_gateway::{FetchError, Page, Symbol};
use tracing::{debug, info, warn};

use crate::state::{AcquisitionState, FetchTicket, Snapshot, Status};

/// Why a completed fetch was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The symbol changed after the request was issued.
    SymbolChanged,
    /// A later replace request (refresh or symbol round-trip) superseded it.
    Superseded,
    /// An append for a page other than the next one.
    OutOfOrder,
    /// Nothing with this tag is in flight.
    NotInFlight,
}

/// What [`Controller::on_fetch_result`] did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged. `added` is how many bars it contributed.
    Merged { added: usize, total: usize },
    /// The fetch failed and the error was recorded.
    Failed,
    /// The completion was stale and left the state untouched.
    Discarded(StaleReason),
}

#[derive(Debug)]
pub struct Controller {
    state: AcquisitionState,
    epoch: u64,
    revision: u64,
    in_flight: Option<FetchTicket>,
    last_failed: Option<FetchTicket>,
    /// Whether any page of the current symbol has been merged.
    merged_any: bool,
}

impl Controller {
    pub fn new(default_symbol: Symbol) -> Self {
        Self {
            state: AcquisitionState::new(default_symbol),
            epoch: 0,
            revision: 0,
            in_flight: None,
            last_failed: None,
            merged_any: false,
        }
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            symbol: &self.state.symbol,
            bars: &self.state.bars,
            status: self.state.status,
            has_more: self.state.has_more,
            error_message: self.state.error_message.as_deref(),
            page: self.state.page,
            revision: self.revision,
        }
    }

    /// Switches to `raw` (trimmed, uppercased) and requests its first page.
    ///
    /// No-op when the normalized symbol is invalid or already current.
    pub fn set_symbol(&mut self, raw: &str) -> Option<FetchTicket> {
        let symbol = match Symbol::parse(raw) {
            Ok(s) => s,
            Err(err) => {
                warn!(input = raw, error = %err, "ignoring symbol change");
                return None;
            }
        };
        if symbol == self.state.symbol {
            debug!(%symbol, "symbol unchanged");
            return None;
        }

        info!(from = %self.state.symbol, to = %symbol, "switching symbol");
        self.state.symbol = symbol;
        self.state.bars.clear();
        self.state.page = NonZeroU32::MIN;
        self.state.has_more = true;
        self.state.error_message = None;
        self.last_failed = None;
        self.merged_any = false;
        self.revision += 1;

        Some(self.issue(NonZeroU32::MIN, false))
    }

    /// Requests the page after the last merged one, to be appended.
    ///
    /// Until a first page has been merged this loads page 1 instead, so the
    /// history never starts past its beginning. No-op while a request is
    /// loading or once the last page was seen.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.state.status == Status::Loading {
            debug!("load_more ignored: already loading");
            return None;
        }
        if !self.state.has_more {
            debug!("load_more ignored: no more pages");
            return None;
        }
        if !self.merged_any {
            debug!("load_more before any page merged: loading page 1");
            return Some(self.issue(NonZeroU32::MIN, false));
        }
        let next = self.state.page.checked_add(1)?;
        Some(self.issue(next, true))
    }

    /// Re-requests page 1 of the current symbol, replacing the bars on success.
    ///
    /// Also the initial load from `Idle`. Supersedes anything in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        Some(self.issue(NonZeroU32::MIN, false))
    }

    /// Re-issues the request that failed last. Only valid in `Error`.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state.status != Status::Error {
            return None;
        }
        let failed = self.last_failed.take()?;
        Some(self.issue(failed.page, failed.append))
    }

    /// Applies a completed fetch, unless it is stale.
    pub fn on_fetch_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
    ) -> FetchOutcome {
        if let Some(reason) = self.staleness(&ticket) {
            debug!(
                symbol = %ticket.symbol,
                page = ticket.page.get(),
                ?reason,
                "discarding stale fetch result"
            );
            return FetchOutcome::Discarded(reason);
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                let added = page.bars.len();
                if ticket.append {
                    self.state.bars.extend(page.bars);
                } else {
                    self.state.bars = page.bars;
                }
                self.state.page = ticket.page;
                self.state.has_more = page.has_more;
                self.state.status = Status::Loaded;
                self.state.error_message = None;
                self.last_failed = None;
                self.merged_any = true;
                self.revision += 1;

                let total = self.state.bars.len();
                info!(
                    symbol = %ticket.symbol,
                    page = ticket.page.get(),
                    added,
                    total,
                    has_more = page.has_more,
                    "page merged"
                );
                FetchOutcome::Merged { added, total }
            }
            Err(err) => {
                warn!(
                    symbol = %ticket.symbol,
                    page = ticket.page.get(),
                    error = %err,
                    "fetch failed"
                );
                // Already displayed bars, page and has_more stay as they were.
                self.state.status = Status::Error;
                self.state.error_message = Some(err.message);
                self.last_failed = Some(ticket);
                FetchOutcome::Failed
            }
        }
    }

    fn staleness(&self, ticket: &FetchTicket) -> Option<StaleReason> {
        if ticket.symbol != self.state.symbol {
            return Some(StaleReason::SymbolChanged);
        }
        if ticket.epoch != self.epoch {
            return Some(StaleReason::Superseded);
        }
        if ticket.append && self.state.page.checked_add(1) != Some(ticket.page) {
            return Some(StaleReason::OutOfOrder);
        }
        if self.in_flight.as_ref() != Some(ticket) {
            return Some(StaleReason::NotInFlight);
        }
        None
    }

    fn issue(&mut self, page: NonZeroU32, append: bool) -> FetchTicket {
        if !append {
            self.epoch += 1;
        }
        let ticket = FetchTicket {
            symbol: self.state.symbol.clone(),
            page,
            append,
            epoch: self.epoch,
        };
        self.state.status = Status::Loading;
        self.state.error_message = None;
        self.in_flight = Some(ticket.clone());
        debug!(
            symbol = %ticket.symbol,
            page = page.get(),
            append,
            epoch = ticket.epoch,
            "fetch issued"
        );
        ticket
    }
}
