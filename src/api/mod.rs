//! Gatekeeper Policy Manager REST API
//!
//! - **types**: wire types for constraints and backend errors
//! - **client**: reqwest client and the [`PolicyApi`] seam
//! - **error**: typed failures and their normalisation to [`BackendError`]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, PolicyApi};
pub use error::ApiError;
pub use types::{
    BackendError, ConstraintRecord, ConstraintSpec, ConstraintStatus, EnforcementMode,
    ObjectMeta, PodStatus, Violation, ViolationState,
};
