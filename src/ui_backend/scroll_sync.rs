//! Scroll-synchronised active panel tracking
//!
//! The renderer registers every constraint panel with its measured height.
//! From the registry geometry and the content viewport the tracker decides
//! which panel is "in view"; the view state then moves the sidebar selection
//! to match. A deep-link anchor is scrolled to once, after every expected
//! panel has been registered.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the primary panel is chosen among those intersecting the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityPolicy {
    /// First panel (in document order) with at least one visible row
    #[default]
    Topmost,
    /// Panel with the most visible rows; ties go to the topmost
    MostVisible,
}

/// Registration slot of one panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelSlot {
    pub mounted: bool,
    /// First content row of the panel
    pub top: usize,
    /// Rows occupied, including trailing spacing
    pub height: usize,
}

/// A panel intersecting the viewport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePanel {
    pub id: String,
    pub top: usize,
    pub visible_rows: usize,
}

/// Explicit registry of expected panels and their mount status
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    /// Expected panel ids in document order
    order: Vec<String>,
    slots: HashMap<String, PanelSlot>,
}

impl PanelRegistry {
    /// Registry expecting `ids`, none mounted yet. Ids must be unique; a
    /// repeated id shares the first one's slot.
    pub fn expecting<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for id in ids {
            let id = id.into();
            if !registry.slots.contains_key(&id) {
                registry.slots.insert(id.clone(), PanelSlot::default());
                registry.order.push(id);
            }
        }
        registry
    }

    /// Record the measured height of a panel and mark it mounted.
    ///
    /// Returns `false` for ids the registry does not expect.
    pub fn register(&mut self, id: &str, height: usize) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        slot.mounted = true;
        slot.height = height;
        self.relayout();
        true
    }

    /// Recompute panel tops from document order
    fn relayout(&mut self) {
        let mut top = 0;
        for id in &self.order {
            if let Some(slot) = self.slots.get_mut(id) {
                slot.top = top;
                if slot.mounted {
                    top += slot.height;
                }
            }
        }
    }

    /// True once every expected panel has registered; false when none are expected
    pub fn all_mounted(&self) -> bool {
        !self.order.is_empty() && self.slots.values().all(|s| s.mounted)
    }

    pub fn expected(&self) -> &[String] {
        &self.order
    }

    pub fn slot(&self, id: &str) -> Option<PanelSlot> {
        self.slots.get(id).copied()
    }

    /// Total rows of all mounted panels
    pub fn content_height(&self) -> usize {
        self.slots
            .values()
            .filter(|s| s.mounted)
            .map(|s| s.height)
            .sum()
    }

    /// Largest useful scroll offset: the last panel's top can reach the viewport top
    pub fn max_scroll(&self) -> usize {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.slots.get(id))
            .find(|s| s.mounted)
            .map(|s| s.top)
            .unwrap_or(0)
    }

    /// Mounted panels intersecting rows `[offset, offset + height)`, in document order
    pub fn visible(&self, offset: usize, height: usize) -> Vec<VisiblePanel> {
        let view_end = offset.saturating_add(height);
        self.order
            .iter()
            .filter_map(|id| {
                let slot = self.slots.get(id)?;
                if !slot.mounted || slot.height == 0 {
                    return None;
                }
                let start = slot.top.max(offset);
                let end = (slot.top + slot.height).min(view_end);
                (end > start).then(|| VisiblePanel {
                    id: id.clone(),
                    top: slot.top,
                    visible_rows: end - start,
                })
            })
            .collect()
    }
}

impl VisibilityPolicy {
    /// Pick the primary panel among `visible` (document order)
    pub fn primary<'a>(&self, visible: &'a [VisiblePanel]) -> Option<&'a VisiblePanel> {
        match self {
            Self::Topmost => visible.first(),
            Self::MostVisible => visible.iter().fold(None, |best, p| match best {
                Some(b) if b.visible_rows >= p.visible_rows => Some(b),
                _ => Some(p),
            }),
        }
    }
}

/// Tracks the panel currently considered in view
#[derive(Debug, Clone, Default)]
pub struct ScrollSyncTracker {
    policy: VisibilityPolicy,
    current_in_view: Option<String>,
}

impl ScrollSyncTracker {
    pub fn new(policy: VisibilityPolicy) -> Self {
        Self {
            policy,
            current_in_view: None,
        }
    }

    pub fn current_in_view(&self) -> Option<&str> {
        self.current_in_view.as_deref()
    }

    /// Feed a visibility signal.
    ///
    /// Returns the new primary id when it changed. An empty signal keeps the
    /// current state.
    pub fn observe(&mut self, visible: &[VisiblePanel]) -> Option<&str> {
        let primary = self.policy.primary(visible)?;
        if self.current_in_view.as_deref() == Some(primary.id.as_str()) {
            return None;
        }
        tracing::debug!("Panel in view: {}", primary.id);
        self.current_in_view = Some(primary.id.clone());
        self.current_in_view.as_deref()
    }

    /// Back to the initial empty state
    pub fn reset(&mut self) {
        self.current_in_view = None;
    }
}

/// Deep-link anchor lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeepLink {
    /// No anchor was requested
    #[default]
    None,
    /// Waiting for every panel to mount
    Pending(String),
    /// Already handled for this page load
    Consumed,
}

impl DeepLink {
    pub fn from_anchor(anchor: Option<&str>) -> Self {
        match anchor.map(|a| a.trim_start_matches('#')) {
            Some(a) if !a.is_empty() => Self::Pending(a.to_string()),
            _ => Self::None,
        }
    }

    /// Resolve the anchor against a fully mounted registry.
    ///
    /// Returns the scroll offset of the anchored panel at most once. An
    /// anchor that matches no panel is consumed without scrolling.
    pub fn resolve(&mut self, registry: &PanelRegistry) -> Option<usize> {
        let Self::Pending(anchor) = self else {
            return None;
        };
        if !registry.all_mounted() {
            return None;
        }
        let target = registry.slot(anchor).map(|s| s.top);
        if target.is_none() {
            tracing::debug!("Deep link #{} matches no panel", anchor);
        }
        *self = Self::Consumed;
        target
    }

    /// Drop a pending anchor once a load settled without panels to scroll to
    pub fn settle(&mut self) {
        if let Self::Pending(anchor) = self {
            tracing::debug!("Deep link #{} dropped, nothing was loaded", anchor);
            *self = Self::Consumed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(panels: &[(&str, usize)]) -> PanelRegistry {
        let mut registry = PanelRegistry::expecting(panels.iter().map(|(id, _)| *id));
        for (id, height) in panels {
            registry.register(id, *height);
        }
        registry
    }

    #[test]
    fn test_registry_mount_tracking() {
        let mut registry = PanelRegistry::expecting(["a", "b"]);
        assert!(!registry.all_mounted());
        registry.register("a", 10);
        assert!(!registry.all_mounted());
        assert!(!registry.register("zzz", 3));
        registry.register("b", 5);
        assert!(registry.all_mounted());
        assert_eq!(registry.slot("b").unwrap().top, 10);
        assert_eq!(registry.content_height(), 15);
        assert_eq!(registry.max_scroll(), 10);
    }

    #[test]
    fn test_empty_registry_is_never_fully_mounted() {
        assert!(!PanelRegistry::expecting(Vec::<String>::new()).all_mounted());
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let mut registry = PanelRegistry::expecting(["a", "b", "c"]);
        registry.register("c", 4);
        registry.register("a", 6);
        registry.register("b", 2);
        assert_eq!(registry.slot("a").unwrap().top, 0);
        assert_eq!(registry.slot("b").unwrap().top, 6);
        assert_eq!(registry.slot("c").unwrap().top, 8);
    }

    #[test]
    fn test_visible_panels() {
        let registry = mounted(&[("a", 10), ("b", 10), ("c", 10)]);
        let visible = registry.visible(8, 10);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, "a");
        assert_eq!(visible[0].visible_rows, 2);
        assert_eq!(visible[1].visible_rows, 8);
    }

    #[test]
    fn test_policies() {
        let registry = mounted(&[("a", 10), ("b", 10)]);
        let visible = registry.visible(8, 10);
        assert_eq!(VisibilityPolicy::Topmost.primary(&visible).unwrap().id, "a");
        assert_eq!(
            VisibilityPolicy::MostVisible.primary(&visible).unwrap().id,
            "b"
        );
        let tie = registry.visible(5, 10);
        assert_eq!(VisibilityPolicy::MostVisible.primary(&tie).unwrap().id, "a");
    }

    #[test]
    fn test_tracker_is_idempotent() {
        let registry = mounted(&[("a", 10), ("b", 10)]);
        let mut tracker = ScrollSyncTracker::new(VisibilityPolicy::Topmost);
        assert_eq!(tracker.current_in_view(), None);
        assert_eq!(tracker.observe(&registry.visible(0, 5)), Some("a"));
        assert_eq!(tracker.observe(&registry.visible(3, 5)), None);
        assert_eq!(tracker.observe(&registry.visible(12, 5)), Some("b"));
        assert_eq!(tracker.observe(&[]), None);
        assert_eq!(tracker.current_in_view(), Some("b"));
    }

    #[test]
    fn test_deep_link_waits_for_full_mount() {
        let mut registry = PanelRegistry::expecting(["a", "b"]);
        let mut link = DeepLink::from_anchor(Some("#b"));
        registry.register("a", 10);
        assert_eq!(link.resolve(&registry), None);
        assert!(matches!(link, DeepLink::Pending(_)));
        registry.register("b", 10);
        assert_eq!(link.resolve(&registry), Some(10));
        assert_eq!(link.resolve(&registry), None);
        assert_eq!(link, DeepLink::Consumed);
    }

    #[test]
    fn test_deep_link_without_match_is_consumed() {
        let registry = mounted(&[("a", 10)]);
        let mut link = DeepLink::from_anchor(Some("foo"));
        assert_eq!(link.resolve(&registry), None);
        assert_eq!(link, DeepLink::Consumed);
    }

    #[test]
    fn test_settle_only_drops_pending_anchors() {
        let mut link = DeepLink::from_anchor(Some("#a"));
        link.settle();
        assert_eq!(link, DeepLink::Consumed);
        assert_eq!(link.resolve(&mounted(&[("a", 10)])), None);

        let mut none = DeepLink::None;
        none.settle();
        assert_eq!(none, DeepLink::None);
    }

    #[test]
    fn test_empty_anchor_is_none() {
        assert_eq!(DeepLink::from_anchor(Some("#")), DeepLink::None);
        assert_eq!(DeepLink::from_anchor(None), DeepLink::None);
    }
}
