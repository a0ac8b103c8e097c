//! Application Service - Business Logic
//!
//! Applies user `Command`s and background `AppEvent`s to `SharedState`.
//! Network work (constraint fetches, context discovery, logout) runs in
//! spawned tasks that report back through the event channel.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::commands::Command;
use super::events::AppEvent;
use super::fetcher::ConstraintFetcher;
use super::scroll_sync::VisibilityPolicy;
use super::state::SharedState;
use super::types::{ModalType, Route};
use super::view::{ViewState, CONSTRAINTS_ENTITY};
use crate::api::PolicyApi;

/// Default delay between a logout request and the dashboard reload
pub const DEFAULT_LOGOUT_RELOAD_DELAY: Duration = Duration::from_secs(2);

/// Behavioural knobs of the service
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub visibility_policy: VisibilityPolicy,
    /// Panel to scroll to once all panels are mounted
    pub anchor: Option<String>,
    pub logout_reload_delay: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            visibility_policy: VisibilityPolicy::default(),
            anchor: None,
            logout_reload_delay: DEFAULT_LOGOUT_RELOAD_DELAY,
        }
    }
}

/// Application Service - Business Logic Layer
pub struct AppService {
    state: SharedState,
    api: Arc<dyn PolicyApi>,
    fetcher: ConstraintFetcher,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    options: ServiceOptions,
}

impl std::fmt::Debug for AppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService")
            .field("state", &self.state)
            .field("fetcher", &self.fetcher)
            .field("options", &self.options)
            .finish()
    }
}

impl AppService {
    /// Create a new application service
    pub fn new(
        api: Arc<dyn PolicyApi>,
        state: SharedState,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        options: ServiceOptions,
    ) -> Self {
        state.reset_view(Self::fresh_view(&options));
        Self {
            fetcher: ConstraintFetcher::new(api.clone(), event_tx.clone()),
            state,
            api,
            event_tx,
            options,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    fn fresh_view(options: &ServiceOptions) -> ViewState {
        ViewState::new(options.visibility_policy, options.anchor.as_deref())
    }

    /// Kick off the initial loads
    pub fn start(&mut self) {
        self.refresh_contexts();
        self.fetch_constraints();
    }

    /// Fetch constraints for the current context
    pub fn fetch_constraints(&mut self) -> u64 {
        self.state.update_view(|v| v.begin_loading());
        let context = self.state.current_context();
        self.fetcher.fetch(&context)
    }

    /// Discover the available cluster contexts in the background
    pub fn refresh_contexts(&self) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api
                .list_contexts()
                .await
                .map_err(|e| e.to_backend_error("contexts"));
            let _ = tx.send(AppEvent::ContextsFetched(result));
        });
    }

    /// Handle a user command
    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        tracing::trace!("Command: {:?}", command);
        match command {
            Command::Quit => self.state.set_should_quit(true),
            Command::ToggleHelp => {
                let modal = match self.state.active_modal() {
                    Some(ModalType::Help) => None,
                    _ => Some(ModalType::Help),
                };
                self.state.set_active_modal(modal);
            }
            Command::Reload => self.reload(),
            Command::Logout => self.logout(),
            Command::Navigate(route) => self.state.set_route(route),
            Command::FocusNext => {
                let next = self.state.focused_component().next();
                self.state.set_focused_component(next);
            }
            Command::ActivateNavEntry(index) => {
                self.state.set_route(Route::Constraints);
                self.state.update_view(|v| {
                    let target = v
                        .nav()
                        .entries()
                        .get(index)
                        .map(|e| e.scroll_target().to_string());
                    if let Some(target) = target {
                        v.scroll_to_panel(&target);
                    }
                });
            }
            Command::SelectPrevious => {
                self.state.update_view(|v| v.step_selection(-1));
            }
            Command::SelectNext => {
                self.state.update_view(|v| v.step_selection(1));
            }
            Command::ScrollUp => self.state.update_view(|v| v.scroll_by(-1)),
            Command::ScrollDown => self.state.update_view(|v| v.scroll_by(1)),
            Command::PageUp => self.state.update_view(|v| {
                let page = v.viewport_height().saturating_sub(1).max(1) as isize;
                v.scroll_by(-page)
            }),
            Command::PageDown => self.state.update_view(|v| {
                let page = v.viewport_height().saturating_sub(1).max(1) as isize;
                v.scroll_by(page)
            }),
            Command::ScrollToTop => self.state.update_view(|v| v.scroll_to_top()),
            Command::ScrollToBottom => self.state.update_view(|v| v.scroll_to_bottom()),
            Command::ToggleSection(section) => {
                self.state.update_view(|v| {
                    if let Some(panel) = v.active_panel().map(str::to_string) {
                        v.folds.toggle(&panel, section);
                    }
                });
            }
            Command::OpenContextPicker => {
                let contexts = self.state.contexts();
                if contexts.is_empty() {
                    self.state
                        .set_status_message(Some("No cluster contexts available".to_string()));
                } else {
                    let current = self.state.current_context();
                    let selected = contexts.iter().position(|c| *c == current).unwrap_or(0);
                    self.state.set_context_picker_selected(selected);
                    self.state.set_active_modal(Some(ModalType::ContextPicker));
                }
            }
            Command::SelectContext(context) => self.switch_context(context),
            Command::ModalUp => {
                let selected = self.state.context_picker_selected();
                self.state
                    .set_context_picker_selected(selected.saturating_sub(1));
            }
            Command::ModalDown => {
                let selected = self.state.context_picker_selected();
                let last = self.state.contexts().len().saturating_sub(1);
                self.state
                    .set_context_picker_selected((selected + 1).min(last));
            }
            Command::ConfirmModal => {
                let modal = self.state.active_modal();
                self.state.set_active_modal(None);
                if modal == Some(ModalType::ContextPicker) {
                    let selected = self.state.context_picker_selected();
                    if let Some(context) = self.state.contexts().get(selected).cloned() {
                        self.switch_context(context);
                    }
                }
            }
            Command::CloseModal => self.state.set_active_modal(None),
        }
        Ok(())
    }

    /// Apply an event from a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ConstraintsFetched {
                generation,
                context,
                result,
            } => {
                if !self.fetcher.is_current(generation) {
                    tracing::debug!(
                        "Discarding stale constraints for '{}' (generation {}, latest {})",
                        context,
                        generation,
                        self.fetcher.latest()
                    );
                    return;
                }
                match result {
                    Ok(records) => {
                        tracing::info!(
                            "Loaded {} constraints for context '{}'",
                            records.len(),
                            context
                        );
                        self.state.update_view(|v| v.apply_records(records));
                        if self.state.route() == Route::Error {
                            self.state.set_route(Route::Constraints);
                        }
                    }
                    Err(error) => {
                        self.state
                            .update_view(|v| v.apply_error(error, CONSTRAINTS_ENTITY));
                        self.state.set_route(Route::Error);
                    }
                }
            }
            AppEvent::ContextsFetched(Ok(contexts)) => {
                if contexts.is_empty() {
                    return;
                }
                tracing::debug!("Available contexts: {:?}", contexts);
                let first = contexts[0].clone();
                self.state.set_contexts(contexts);
                if self.state.current_context().is_empty() {
                    self.switch_context(first);
                }
            }
            AppEvent::ContextsFetched(Err(error)) => {
                tracing::warn!(
                    "Could not list contexts, using configured ones: {}",
                    error.description
                );
            }
            AppEvent::LoggedOut { ok } => {
                let message = if ok {
                    "Logged out, reloading..."
                } else {
                    "Logout request failed, reloading..."
                };
                self.state.set_status_message(Some(message.to_string()));
            }
            AppEvent::ReloadRequested => self.reload(),
        }
    }

    fn switch_context(&mut self, context: String) {
        if context == self.state.current_context() {
            return;
        }
        tracing::info!("Switching context to '{}'", context);
        self.state.set_current_context(context);
        self.fetch_constraints();
    }

    /// Re-initialise view state and reload, like a page refresh
    fn reload(&mut self) {
        tracing::info!("Reloading dashboard");
        self.fetcher.cancel();
        self.state.reset_view(Self::fresh_view(&self.options));
        self.state.set_logging_out(false);
        self.state.set_status_message(None);
        self.start();
    }

    /// POST the logout request; reload after the configured delay regardless of outcome
    fn logout(&mut self) {
        if !self.state.auth_enabled() || self.state.logging_out() {
            return;
        }
        self.state.set_logging_out(true);
        self.state
            .set_status_message(Some("Logging out...".to_string()));

        let api = self.api.clone();
        let tx = self.event_tx.clone();
        let delay = self.options.logout_reload_delay;
        tokio::spawn(async move {
            let ok = match api.logout().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Logout failed: {}", e);
                    false
                }
            };
            let _ = tx.send(AppEvent::LoggedOut { ok });
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::ReloadRequested);
        });
    }
}
