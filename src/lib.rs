//! gpm-tui: terminal dashboard for Gatekeeper Policy Manager
//!
//! This library provides:
//! - A typed client for the policy manager REST API
//! - A backend-for-frontend layer: navigation tree, scroll-synchronised
//!   selection, deep links and stale-response-safe fetching
//! - A ratatui frontend that renders constraints as detail panels
//! - One-shot CLI commands (list, report, logout, contexts)

pub mod api;
pub mod config;
pub mod transport;
pub mod tui;
pub mod ui_backend;

pub use config::Config;
