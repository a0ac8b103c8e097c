//! Constraint fetcher with request generations
//!
//! Each fetch gets a monotonically increasing generation. Starting a new
//! fetch aborts the previous task, and the service only commits a completion
//! whose generation is still the latest, so a slow response for an old
//! context can never overwrite newer state.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::events::AppEvent;
use super::view::CONSTRAINTS_ENTITY;
use crate::api::PolicyApi;

pub struct ConstraintFetcher {
    api: Arc<dyn PolicyApi>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    latest: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ConstraintFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintFetcher")
            .field("latest", &self.latest)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}

impl ConstraintFetcher {
    pub fn new(api: Arc<dyn PolicyApi>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            api,
            event_tx,
            latest: 0,
            in_flight: None,
        }
    }

    /// Start fetching constraints for `context`, superseding any fetch in flight.
    ///
    /// Returns the generation of the new request.
    pub fn fetch(&mut self, context: &str) -> u64 {
        self.cancel();
        self.latest += 1;
        let generation = self.latest;
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        let context = context.to_string();

        tracing::debug!(
            "Fetching constraints for context '{}' (generation {})",
            context,
            generation
        );
        self.in_flight = Some(tokio::spawn(async move {
            let result = api.list_constraints(&context).await.map_err(|e| {
                tracing::warn!("Failed to fetch constraints for '{}': {}", context, e);
                e.to_backend_error(CONSTRAINTS_ENTITY)
            });
            let _ = tx.send(AppEvent::ConstraintsFetched {
                generation,
                context,
                result,
            });
        }));
        generation
    }

    /// Abort the fetch in flight, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Whether a completion with `generation` may be committed
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

impl Drop for ConstraintFetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
