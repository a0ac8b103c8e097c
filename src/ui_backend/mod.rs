//! UI Backend - Backend-for-Frontend (BFF) Layer
//!
//! Separates dashboard logic from terminal rendering.
//!
//! ## Architecture
//!
//! - **AppService**: applies commands and events to state
//! - **AppEvent**: results of background work (fetches, logout)
//! - **UiRenderer**: trait that frontends implement
//! - **SharedState**: thread-safe application state
//! - **Command**: user actions mapped from keybindings/mouse
//! - **ViewState**: constraints, sidebar tree and scroll tracking

mod commands;
mod events;
mod fetcher;
pub mod nav;
pub mod scroll_sync;
mod service;
mod state;
mod traits;
mod types;
pub mod view;

pub use commands::Command;
pub use events::AppEvent;
pub use fetcher::ConstraintFetcher;
pub use nav::{panel_keys, project, BadgeTone, NavEntry, NavGroup, NavTree};
pub use scroll_sync::{DeepLink, PanelRegistry, ScrollSyncTracker, VisibilityPolicy};
pub use service::{AppService, ServiceOptions, DEFAULT_LOGOUT_RELOAD_DELAY};
pub use state::SharedState;
pub use traits::UiRenderer;
pub use types::{FocusedComponent, ModalType, Route, ThemePreset};
pub use view::{FetchFailure, PanelFolds, PanelSection, ViewState, CONSTRAINTS_ENTITY};
