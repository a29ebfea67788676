//! Single-owner task that drives a [`Session`] against a [`RateSource`].
//!
//! The coordinator task owns the session and polls at most one fetch future
//! alongside its command channel, so state is only touched from one place.
//! Callers talk to it through a cloneable [`CoordinatorHandle`].

use crate::core::catalog::CurrencyRecord;
use crate::core::rates::{RateFetchError, RateSnapshot, RateSource};
use crate::core::session::{FetchRequest, RefreshOutcome, Session, SessionView};
use anyhow::{Result, anyhow};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

type PendingFetch = BoxFuture<'static, Result<RateSnapshot, RateFetchError>>;

#[derive(Debug)]
enum Command {
    Start,
    SetBase(&'static CurrencyRecord),
    Add(&'static CurrencyRecord),
    Remove(String),
    ToggleFavorite(String),
    Refresh,
    DismissError,
    Candidates(String, oneshot::Sender<Vec<&'static CurrencyRecord>>),
}

struct Envelope {
    command: Command,
    reply: oneshot::Sender<SessionView>,
}

pub struct RefreshCoordinator {
    session: Session,
    source: Arc<dyn RateSource>,
    commands: mpsc::Receiver<Envelope>,
    updates: watch::Sender<SessionView>,
}

impl RefreshCoordinator {
    /// Spawns the coordinator task on the current tokio runtime.
    pub fn spawn(session: Session, source: Arc<dyn RateSource>) -> CoordinatorHandle {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (update_tx, update_rx) = watch::channel(session.view());

        let coordinator = RefreshCoordinator {
            session,
            source,
            commands: command_rx,
            updates: update_tx,
        };
        tokio::spawn(coordinator.run());

        CoordinatorHandle {
            commands: command_tx,
            updates: update_rx,
        }
    }

    async fn run(mut self) {
        let mut in_flight: Option<PendingFetch> = None;

        loop {
            tokio::select! {
                result = next_result(&mut in_flight) => {
                    in_flight = None;
                    let outcome = self.session.complete(result);
                    debug!(?outcome, "Fetch completed");
                    if let RefreshOutcome::Discarded { follow_up: Some(request) } = outcome {
                        in_flight = Some(self.start_fetch(request));
                    }
                    self.publish();
                }
                envelope = self.commands.recv() => {
                    let Some(Envelope { command, reply }) = envelope else {
                        debug!("All coordinator handles dropped, stopping");
                        break;
                    };
                    if let Some(request) = self.apply(command) {
                        in_flight = Some(self.start_fetch(request));
                    }
                    self.publish();
                    let _ = reply.send(self.session.view());
                }
            }
        }
    }

    fn apply(&mut self, command: Command) -> Option<FetchRequest> {
        debug!(?command, "Handling command");
        match command {
            Command::Start => self.session.startup(),
            Command::SetBase(record) => self.session.set_base_currency(record),
            Command::Add(record) => self.session.add_currency(record),
            Command::Remove(code) => {
                self.session.remove_currency(&code);
                None
            }
            Command::ToggleFavorite(code) => {
                self.session.toggle_favorite(&code);
                None
            }
            Command::Refresh => self.session.request_refresh(),
            Command::DismissError => {
                self.session.dismiss_error();
                None
            }
            Command::Candidates(query, tx) => {
                let _ = tx.send(self.session.add_candidates(&query));
                None
            }
        }
    }

    fn start_fetch(&self, request: FetchRequest) -> PendingFetch {
        let source = Arc::clone(&self.source);
        async move { source.fetch_rates(&request.base_code).await }.boxed()
    }

    fn publish(&self) {
        self.updates.send_replace(self.session.view());
    }
}

async fn next_result(in_flight: &mut Option<PendingFetch>) -> Result<RateSnapshot, RateFetchError> {
    match in_flight {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle to a running [`RefreshCoordinator`].
///
/// Each call resolves once the command has been applied and returns the view
/// right after it. A fetch started by the command may still be in flight.
#[derive(Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::Sender<Envelope>,
    updates: watch::Receiver<SessionView>,
}

impl CoordinatorHandle {
    async fn send(&self, command: Command) -> Result<SessionView> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| anyhow!("Refresh coordinator has stopped"))?;
        response
            .await
            .map_err(|_| anyhow!("Refresh coordinator dropped the request"))
    }

    /// Initial gap-fill for the startup list.
    pub async fn start(&self) -> Result<SessionView> {
        self.send(Command::Start).await
    }

    pub async fn set_base_currency(&self, record: &'static CurrencyRecord) -> Result<SessionView> {
        self.send(Command::SetBase(record)).await
    }

    pub async fn add_currency(&self, record: &'static CurrencyRecord) -> Result<SessionView> {
        self.send(Command::Add(record)).await
    }

    pub async fn remove_currency(&self, code: &str) -> Result<SessionView> {
        self.send(Command::Remove(code.to_string())).await
    }

    pub async fn toggle_favorite(&self, code: &str) -> Result<SessionView> {
        self.send(Command::ToggleFavorite(code.to_string())).await
    }

    pub async fn refresh(&self) -> Result<SessionView> {
        self.send(Command::Refresh).await
    }

    pub async fn dismiss_error(&self) -> Result<SessionView> {
        self.send(Command::DismissError).await
    }

    pub async fn add_candidates(&self, query: &str) -> Result<Vec<&'static CurrencyRecord>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Candidates(query.to_string(), tx)).await?;
        rx.await
            .map_err(|_| anyhow!("Refresh coordinator dropped the request"))
    }

    /// Latest published view.
    pub fn view(&self) -> SessionView {
        self.updates.borrow().clone()
    }

    /// Waits until no fetch is in flight and returns that view.
    pub async fn settled(&self) -> Result<SessionView> {
        let mut updates = self.updates.clone();
        let view = updates
            .wait_for(|view| !view.is_loading)
            .await
            .map_err(|_| anyhow!("Refresh coordinator has stopped"))?;
        Ok(view.clone())
    }
}
