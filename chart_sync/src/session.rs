//! Async driver pairing a [`Controller`] with a [`BarGateway`].
//!
//! Intents run synchronously against the controller. Any resulting fetch runs on
//! its own tokio task in a [`JoinSet`]; [`Session::next_completion`] applies
//! completions one at a time on the caller's task, so the controller has a
//! single writer. In-flight calls are never cancelled: a superseded call still
//! completes and is discarded as stale. A task that dies without answering is
//! applied as a failed fetch for its ticket.

use std::{collections::HashMap, sync::Arc};

use market_data_gateway::{BarGateway, FetchError, Page, Symbol};
use tokio::task::{self, JoinSet};
use tracing::{trace, warn};

use crate::{
    controller::{Controller, FetchOutcome},
    state::{FetchTicket, Snapshot},
};

type Completion = (FetchTicket, Result<Page, FetchError>);

pub struct Session<G: BarGateway + ?Sized + 'static> {
    controller: Controller,
    gateway: Arc<G>,
    tasks: JoinSet<Completion>,
    tickets: HashMap<task::Id, FetchTicket>,
}

impl<G: BarGateway + ?Sized + 'static> Session<G> {
    pub fn new(gateway: Arc<G>, default_symbol: Symbol) -> Self {
        Self {
            controller: Controller::new(default_symbol),
            gateway,
            tasks: JoinSet::new(),
            tickets: HashMap::new(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.controller.snapshot()
    }

    /// Fetch tasks spawned whose completion has not been applied yet.
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if a fetch was issued.
    pub fn set_symbol(&mut self, raw: &str) -> bool {
        let ticket = self.controller.set_symbol(raw);
        self.dispatch(ticket)
    }

    pub fn load_more(&mut self) -> bool {
        let ticket = self.controller.load_more();
        self.dispatch(ticket)
    }

    pub fn refresh(&mut self) -> bool {
        let ticket = self.controller.refresh();
        self.dispatch(ticket)
    }

    pub fn retry(&mut self) -> bool {
        let ticket = self.controller.retry();
        self.dispatch(ticket)
    }

    /// Waits for the next fetch to finish and applies it.
    ///
    /// Returns `None` immediately when nothing is outstanding. Cancel-safe.
    pub async fn next_completion(&mut self) -> Option<FetchOutcome> {
        loop {
            let (ticket, result) = match self.tasks.join_next_with_id().await? {
                Ok((id, completion)) => {
                    self.tickets.remove(&id);
                    completion
                }
                Err(err) => {
                    let Some(ticket) = self.tickets.remove(&err.id()) else {
                        continue;
                    };
                    warn!(symbol = %ticket.symbol, page = ticket.page.get(), error = %err, "fetch task died");
                    (ticket, Err(FetchError::new(format!("fetch task failed: {err}"))))
                }
            };
            return Some(self.controller.on_fetch_result(ticket, result));
        }
    }

    /// Applies completions until none are outstanding.
    pub async fn settle(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        let gateway = Arc::clone(&self.gateway);
        let tagged = ticket.clone();
        let handle = self.tasks.spawn(async move {
            let result = gateway.fetch(&ticket.symbol, ticket.page).await;
            trace!(symbol = %ticket.symbol, page = ticket.page.get(), ok = result.is_ok(), "fetch task done");
            (ticket, result)
        });
        self.tickets.insert(handle.id(), tagged);
        true
    }
}
