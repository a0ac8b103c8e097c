//! Application Events
//!
//! Async events sent from background tasks to the controller loop.

use crate::api::{BackendError, ConstraintRecord};

/// Events emitted by background tasks
///
/// Sent over an mpsc channel and applied to state by the controller loop,
/// which is the only writer of view state.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A constraints fetch finished; `generation` identifies the request
    ConstraintsFetched {
        generation: u64,
        context: String,
        result: Result<Vec<ConstraintRecord>, BackendError>,
    },

    /// The list of available cluster contexts arrived
    ContextsFetched(Result<Vec<String>, BackendError>),

    /// The logout request completed (successfully or not)
    LoggedOut { ok: bool },

    /// Re-initialise the dashboard as if freshly started
    ReloadRequested,
}
