//! Constraints view state
//!
//! Owns the fetched records and everything derived from them: the sidebar
//! tree, the panel registry, the in-view tracker and the scroll position.
//! All mutation goes through methods here so the sidebar selection always
//! follows `current_in_view`.

use std::collections::HashSet;

use super::nav::{self, NavTree};
use super::scroll_sync::{DeepLink, PanelRegistry, ScrollSyncTracker, VisibilityPolicy};
use crate::api::{BackendError, ConstraintRecord};

/// Entity tag attached to constraint fetch failures
pub const CONSTRAINTS_ENTITY: &str = "constraints";

/// Independently collapsible sections of a constraint panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelSection {
    Violations,
    Match,
    Parameters,
}

/// Collapsed sections, keyed by panel id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelFolds {
    collapsed: HashSet<(String, PanelSection)>,
}

impl PanelFolds {
    pub fn is_collapsed(&self, panel: &str, section: PanelSection) -> bool {
        self.collapsed.contains(&(panel.to_string(), section))
    }

    /// Flip a section; returns whether it is now collapsed
    pub fn toggle(&mut self, panel: &str, section: PanelSection) -> bool {
        let key = (panel.to_string(), section);
        if self.collapsed.remove(&key) {
            false
        } else {
            self.collapsed.insert(key);
            true
        }
    }

    pub fn clear(&mut self) {
        self.collapsed.clear();
    }
}

/// A failed load, tagged with the entity that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub error: BackendError,
    pub entity: String,
}

/// View state of the constraints page
#[derive(Debug, Clone)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<FetchFailure>,
    records: Vec<ConstraintRecord>,
    nav: NavTree,
    registry: PanelRegistry,
    tracker: ScrollSyncTracker,
    deep_link: DeepLink,
    scroll_offset: usize,
    viewport_height: usize,
    pub folds: PanelFolds,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(VisibilityPolicy::default(), None)
    }
}

impl ViewState {
    pub fn new(policy: VisibilityPolicy, anchor: Option<&str>) -> Self {
        Self {
            loading: true,
            error: None,
            records: Vec::new(),
            nav: nav::project(&[]),
            registry: PanelRegistry::default(),
            tracker: ScrollSyncTracker::new(policy),
            deep_link: DeepLink::from_anchor(anchor),
            scroll_offset: 0,
            viewport_height: 0,
            folds: PanelFolds::default(),
        }
    }

    pub fn records(&self) -> &[ConstraintRecord] {
        &self.records
    }

    pub fn nav(&self) -> &NavTree {
        &self.nav
    }

    /// Records paired with their panel keys, in document order
    pub fn panels(&self) -> impl Iterator<Item = (&str, &ConstraintRecord)> {
        self.nav
            .entries()
            .iter()
            .map(|e| e.key.as_str())
            .zip(&self.records)
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn current_in_view(&self) -> Option<&str> {
        self.tracker.current_in_view()
    }

    pub fn deep_link(&self) -> &DeepLink {
        &self.deep_link
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Panel the keyboard section toggles act on
    pub fn active_panel(&self) -> Option<&str> {
        self.current_in_view()
            .or_else(|| self.nav.selected_entry().map(|e| e.scroll_target()))
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Replace the record list and rebuild everything derived from it
    pub fn apply_records(&mut self, records: Vec<ConstraintRecord>) {
        self.nav = nav::project(&records);
        let keys = self.nav.entries().iter().map(|e| e.key.clone());
        self.registry = PanelRegistry::expecting(keys);
        if records.is_empty() {
            self.deep_link.settle();
        }
        self.tracker.reset();
        self.scroll_offset = 0;
        self.folds.clear();
        self.records = records;
        self.loading = false;
        self.error = None;
    }

    pub fn apply_error(&mut self, error: BackendError, entity: &str) {
        self.deep_link.settle();
        self.loading = false;
        self.error = Some(FetchFailure {
            error,
            entity: entity.to_string(),
        });
    }

    /// Register measured panel heights and the content viewport height.
    ///
    /// Runs the deep-link check and a visibility pass afterwards.
    pub fn update_layout<'a, I>(&mut self, panels: I, viewport_height: usize)
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        for (id, height) in panels {
            self.registry.register(id, height);
        }
        self.viewport_height = viewport_height;
        if let Some(target) = self.deep_link.resolve(&self.registry) {
            tracing::debug!("Deep link scroll to row {}", target);
            self.scroll_offset = target;
        }
        self.clamp_scroll();
        self.sync();
    }

    /// Feed the current visibility into the tracker; returns whether the
    /// sidebar selection changed
    pub fn sync(&mut self) -> bool {
        let visible = self
            .registry
            .visible(self.scroll_offset, self.viewport_height.max(1));
        match self.tracker.observe(&visible) {
            Some(id) => self.nav.select_key(id),
            None => false,
        }
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
        self.sync();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.sync();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.registry.max_scroll();
        self.sync();
    }

    /// Scroll so that panel `id` starts at the top of the viewport
    pub fn scroll_to_panel(&mut self, id: &str) -> bool {
        let Some(slot) = self.registry.slot(id).filter(|s| s.mounted) else {
            return false;
        };
        self.scroll_offset = slot.top;
        self.clamp_scroll();
        self.sync();
        true
    }

    /// Scroll to the entry `steps` away from the selected one
    pub fn step_selection(&mut self, steps: isize) -> bool {
        if self.nav.is_empty() {
            return false;
        }
        let last = self.nav.len() - 1;
        let current = self.nav.selected_index().unwrap_or(0);
        let next = current.saturating_add_signed(steps).min(last);
        let key = self.nav.entries()[next].scroll_target().to_string();
        self.scroll_to_panel(&key)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.registry.max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: &str, name: &str) -> ConstraintRecord {
        serde_json::from_value(json!({"kind": kind, "metadata": {"name": name}})).unwrap()
    }

    fn view_with(names: &[&str]) -> ViewState {
        let mut view = ViewState::new(VisibilityPolicy::Topmost, None);
        view.apply_records(
            names
                .iter()
                .map(|n| {
                    serde_json::from_value(json!({"kind": "K", "metadata": {"name": n}})).unwrap()
                })
                .collect(),
        );
        view
    }

    #[test]
    fn test_apply_records_resets_derived_state() {
        let mut view = view_with(&["a", "b"]);
        view.update_layout([("a", 10), ("b", 10)], 5);
        view.scroll_by(12);
        assert_eq!(view.current_in_view(), Some("b"));

        view.apply_records(Vec::new());
        assert_eq!(view.scroll_offset(), 0);
        assert_eq!(view.current_in_view(), None);
        assert!(view.nav().is_empty());
        assert!(!view.loading);
    }

    #[test]
    fn test_scroll_moves_selection() {
        let mut view = view_with(&["a", "b", "c"]);
        view.update_layout([("a", 10), ("b", 10), ("c", 10)], 6);
        assert!(view.nav().is_selected(0));
        view.scroll_by(15);
        assert!(view.nav().is_selected(1));
        view.scroll_to_bottom();
        assert_eq!(view.scroll_offset(), 20);
        assert!(view.nav().is_selected(2));
        view.scroll_to_top();
        assert!(view.nav().is_selected(0));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = view_with(&["a", "b"]);
        view.update_layout([("a", 10), ("b", 10)], 6);
        view.scroll_by(1000);
        assert_eq!(view.scroll_offset(), 10);
        view.scroll_by(-1000);
        assert_eq!(view.scroll_offset(), 0);
    }

    #[test]
    fn test_step_selection() {
        let mut view = view_with(&["a", "b", "c"]);
        view.update_layout([("a", 4), ("b", 4), ("c", 4)], 3);
        assert!(view.step_selection(1));
        assert_eq!(view.current_in_view(), Some("b"));
        assert!(view.step_selection(5));
        assert_eq!(view.current_in_view(), Some("c"));
        assert!(view.step_selection(-9));
        assert_eq!(view.current_in_view(), Some("a"));
    }

    #[test]
    fn test_deep_link_applies_on_full_mount() {
        let mut view = ViewState::new(VisibilityPolicy::Topmost, Some("#b"));
        view.apply_records(
            ["a", "b"]
                .iter()
                .map(|n| {
                    serde_json::from_value(json!({"kind": "K", "metadata": {"name": n}})).unwrap()
                })
                .collect(),
        );
        view.update_layout([("a", 10)], 5);
        assert_eq!(view.scroll_offset(), 0);
        view.update_layout([("a", 10), ("b", 10)], 5);
        assert_eq!(view.scroll_offset(), 10);
        assert_eq!(view.current_in_view(), Some("b"));
        view.scroll_to_top();
        view.update_layout([("a", 10), ("b", 10)], 5);
        assert_eq!(view.scroll_offset(), 0);
    }

    #[test]
    fn test_error_clears_loading() {
        let mut view = ViewState::default();
        assert!(view.loading);
        view.apply_error(BackendError::default(), CONSTRAINTS_ENTITY);
        assert!(!view.loading);
        assert_eq!(view.error.as_ref().unwrap().entity, "constraints");
    }

    #[test]
    fn test_folds_toggle() {
        let mut folds = PanelFolds::default();
        assert!(folds.toggle("a", PanelSection::Match));
        assert!(folds.is_collapsed("a", PanelSection::Match));
        assert!(!folds.is_collapsed("a", PanelSection::Parameters));
        assert!(!folds.toggle("a", PanelSection::Match));
    }

    #[test]
    fn test_shared_names_each_get_a_panel() {
        let mut view = ViewState::new(VisibilityPolicy::Topmost, Some("#must-have-owner"));
        view.apply_records(vec![
            record("K8sRequiredLabels", "must-have-owner"),
            record("K8sRequiredAnnotations", "must-have-owner"),
            record("K8sAllowedRepos", "repos"),
        ]);
        let keys: Vec<String> = view.panels().map(|(key, _)| key.to_string()).collect();
        assert_eq!(view.registry().expected(), keys.as_slice());
        assert_eq!(keys.len(), 3);

        view.update_layout(keys.iter().map(|k| (k.as_str(), 4)), 3);
        assert!(view.registry().all_mounted());
        assert_eq!(view.scroll_offset(), 0);
        assert_eq!(view.current_in_view(), Some("must-have-owner"));

        for expected in 1..3 {
            assert!(view.step_selection(1));
            assert_eq!(view.nav().selected_index(), Some(expected));
            assert_eq!(view.current_in_view(), Some(keys[expected].as_str()));
        }
        assert_eq!(view.panels().nth(1).unwrap().1.kind, "K8sRequiredAnnotations");
    }

    #[test]
    fn test_anchor_is_dropped_when_load_has_no_panels() {
        let mut empty = ViewState::new(VisibilityPolicy::Topmost, Some("#b"));
        empty.apply_records(Vec::new());
        assert_eq!(empty.deep_link(), &DeepLink::Consumed);

        let mut failed = ViewState::new(VisibilityPolicy::Topmost, Some("#b"));
        failed.apply_error(BackendError::default(), CONSTRAINTS_ENTITY);
        assert_eq!(failed.deep_link(), &DeepLink::Consumed);

        // A later load with the anchored panel does not scroll
        failed.apply_records(vec![record("K", "a"), record("K", "b")]);
        failed.update_layout([("a", 10), ("b", 10)], 5);
        assert_eq!(failed.scroll_offset(), 0);
    }
}
