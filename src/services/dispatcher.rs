use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::fetch_service::{FetchOutcome, FetchRequest, FetchService};

/// Runs fetches off the event loop and funnels their outcomes back to it.
///
/// Spawned tasks only do I/O; the owner of the navigator receives each outcome from the
/// channel and applies it. Superseded fetches are not cancelled, their outcomes are
/// dropped when applied.
pub struct FetchDispatcher {
    service: FetchService,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
}

impl FetchDispatcher {
    pub fn new(service: FetchService) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                outcomes: tx,
            },
            rx,
        )
    }

    pub fn dispatch(&self, request: FetchRequest) -> JoinHandle<()> {
        let service = self.service.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let outcome = service.execute(request).await;
            if outcomes.send(outcome).is_err() {
                // Receiver gone: the session is shutting down.
                debug!("Dropping outcome for {:?}, event loop closed", request.target);
            }
        })
    }

    /// Dispatches when a transition asked for a fetch.
    pub fn dispatch_opt(&self, request: Option<FetchRequest>) -> Option<JoinHandle<()>> {
        request.map(|r| self.dispatch(r))
    }
}
