//! Shared Application State
//!
//! Thread-safe state shared between the controller loop, the renderer and
//! background tasks. Background tasks never write view state directly; they
//! send `AppEvent`s that the loop applies through `AppService`.

use std::sync::{Arc, RwLock};

use super::types::{FocusedComponent, ModalType, Route, ThemePreset};
use super::view::ViewState;

#[derive(Debug)]
struct StateInner {
    should_quit: bool,
    route: Route,
    focused_component: FocusedComponent,
    active_modal: Option<ModalType>,
    context_picker_selected: usize,
    contexts: Vec<String>,
    current_context: String,
    auth_enabled: bool,
    logging_out: bool,
    api_base: String,
    report_url: Option<String>,
    theme: ThemePreset,
    status_message: Option<String>,
    view: ViewState,
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<RwLock<StateInner>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Create a new shared state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StateInner {
                should_quit: false,
                route: Route::Constraints,
                focused_component: FocusedComponent::Content,
                active_modal: None,
                context_picker_selected: 0,
                contexts: Vec::new(),
                current_context: String::new(),
                auth_enabled: false,
                logging_out: false,
                api_base: String::new(),
                report_url: None,
                theme: ThemePreset::default(),
                status_message: None,
                view: ViewState::default(),
            })),
        }
    }

    // ========== Private Helpers ==========

    /// Get a read lock on the inner state, recovering from poison
    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState read lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Get a write lock on the inner state, recovering from poison
    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("SharedState write lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    // ========== Getters ==========

    pub fn should_quit(&self) -> bool {
        self.read_inner().should_quit
    }

    pub fn route(&self) -> Route {
        self.read_inner().route
    }

    pub fn focused_component(&self) -> FocusedComponent {
        self.read_inner().focused_component
    }

    pub fn active_modal(&self) -> Option<ModalType> {
        self.read_inner().active_modal
    }

    pub fn context_picker_selected(&self) -> usize {
        self.read_inner().context_picker_selected
    }

    pub fn contexts(&self) -> Vec<String> {
        self.read_inner().contexts.clone()
    }

    pub fn current_context(&self) -> String {
        self.read_inner().current_context.clone()
    }

    pub fn auth_enabled(&self) -> bool {
        self.read_inner().auth_enabled
    }

    pub fn logging_out(&self) -> bool {
        self.read_inner().logging_out
    }

    pub fn api_base(&self) -> String {
        self.read_inner().api_base.clone()
    }

    pub fn report_url(&self) -> Option<String> {
        self.read_inner().report_url.clone()
    }

    pub fn theme(&self) -> ThemePreset {
        self.read_inner().theme
    }

    pub fn status_message(&self) -> Option<String> {
        self.read_inner().status_message.clone()
    }

    /// Snapshot of the constraints view
    pub fn view(&self) -> ViewState {
        self.read_inner().view.clone()
    }

    /// Read the constraints view without cloning it
    pub fn read_view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ViewState) -> R,
    {
        f(&self.read_inner().view)
    }

    pub fn is_loading(&self) -> bool {
        self.read_inner().view.loading
    }

    // ========== Setters ==========

    pub fn set_should_quit(&self, quit: bool) {
        self.write_inner().should_quit = quit;
    }

    pub fn set_route(&self, route: Route) {
        self.write_inner().route = route;
    }

    pub fn set_focused_component(&self, component: FocusedComponent) {
        self.write_inner().focused_component = component;
    }

    pub fn set_active_modal(&self, modal: Option<ModalType>) {
        let mut inner = self.write_inner();
        inner.active_modal = modal;
        inner.focused_component = if modal.is_some() {
            FocusedComponent::Modal
        } else {
            FocusedComponent::Content
        };
    }

    pub fn set_context_picker_selected(&self, index: usize) {
        self.write_inner().context_picker_selected = index;
    }

    /// Replace the available contexts, keeping the current one listed
    pub fn set_contexts(&self, contexts: Vec<String>) {
        let mut inner = self.write_inner();
        inner.contexts = contexts;
        if !inner.current_context.is_empty() && !inner.contexts.contains(&inner.current_context)
        {
            let current = inner.current_context.clone();
            inner.contexts.insert(0, current);
        }
    }

    pub fn set_current_context(&self, context: String) {
        self.write_inner().current_context = context;
    }

    pub fn set_auth_enabled(&self, enabled: bool) {
        self.write_inner().auth_enabled = enabled;
    }

    pub fn set_logging_out(&self, logging_out: bool) {
        self.write_inner().logging_out = logging_out;
    }

    pub fn set_api_base(&self, base: String) {
        self.write_inner().api_base = base;
    }

    pub fn set_report_url(&self, url: Option<String>) {
        self.write_inner().report_url = url;
    }

    pub fn set_theme(&self, theme: ThemePreset) {
        self.write_inner().theme = theme;
    }

    pub fn set_status_message(&self, message: Option<String>) {
        self.write_inner().status_message = message;
    }

    /// Mutate the constraints view under the write lock
    pub fn update_view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ViewState) -> R,
    {
        f(&mut self.write_inner().view)
    }

    /// Replace the constraints view wholesale
    pub fn reset_view(&self, view: ViewState) {
        self.write_inner().view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_takes_focus() {
        let state = SharedState::new();
        state.set_active_modal(Some(ModalType::Help));
        assert_eq!(state.focused_component(), FocusedComponent::Modal);
        state.set_active_modal(None);
        assert_eq!(state.focused_component(), FocusedComponent::Content);
    }

    #[test]
    fn test_current_context_stays_listed() {
        let state = SharedState::new();
        state.set_current_context("kind-dev".to_string());
        state.set_contexts(vec!["kind-prod".to_string()]);
        assert_eq!(state.contexts(), ["kind-dev", "kind-prod"]);
    }

    #[test]
    fn test_view_updates_are_visible_to_clones() {
        let state = SharedState::new();
        let other = state.clone();
        state.update_view(|v| v.apply_records(Vec::new()));
        assert!(!other.is_loading());
    }
}
