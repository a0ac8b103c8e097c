//! Sidebar navigation tree
//!
//! Projects the fetched constraint list into a single "Constraints" group of
//! entries. Selection is stored once per group as an index, so "exactly one
//! entry selected" holds by construction instead of by rewriting a flag on
//! every entry.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api::ConstraintRecord;

/// Title of the single top-level navigation group
pub const NAV_GROUP_TITLE: &str = "Constraints";

/// Prefix of generated element ids
const ID_PREFIX: &str = "constraints";

/// Generate a process-wide unique element id (`constraints-N`)
pub fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", ID_PREFIX, id)
}

/// Panel key of every record, in order.
///
/// Constraint names are only unique per kind. The first record with a name
/// is keyed by the bare name, so `#name` anchors land on it; later ones get
/// `kind/name`, plus a `~N` suffix should that repeat too.
pub fn panel_keys(records: &[ConstraintRecord]) -> Vec<String> {
    let mut taken = HashSet::new();
    records
        .iter()
        .map(|record| {
            let mut key = record.name().to_string();
            if taken.contains(&key) {
                let qualified = format!("{}/{}", record.kind, record.name());
                key = qualified.clone();
                let mut n = 2;
                while taken.contains(&key) {
                    key = format!("{}~{}", qualified, n);
                    n += 1;
                }
            }
            taken.insert(key.clone());
            key
        })
        .collect()
}

/// Colour hint for the violation badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Danger,
}

/// One sidebar entry, derived 1:1 from a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Panel id it scrolls to, see [`panel_keys`]
    pub key: String,
    pub name: String,
    /// Generated element id
    pub id: String,
    /// Violation count, 0 when unknown
    pub badge: u64,
}

impl NavEntry {
    /// Panel id activated when the entry is clicked
    pub fn scroll_target(&self) -> &str {
        &self.key
    }

    pub fn badge_tone(&self) -> BadgeTone {
        if self.badge > 0 {
            BadgeTone::Danger
        } else {
            BadgeTone::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub name: String,
    pub id: String,
    pub entries: Vec<NavEntry>,
    selected: Option<usize>,
}

/// Navigation tree shown in the sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTree {
    groups: Vec<NavGroup>,
}

/// Build the navigation tree for `records`, preserving their order.
///
/// The first entry starts selected; an empty list yields a group with no
/// entries and no selection.
pub fn project(records: &[ConstraintRecord]) -> NavTree {
    let entries: Vec<NavEntry> = records
        .iter()
        .zip(panel_keys(records))
        .map(|(record, key)| NavEntry {
            key,
            name: record.name().to_string(),
            id: generate_id(),
            badge: record.badge(),
        })
        .collect();
    let selected = (!entries.is_empty()).then_some(0);

    NavTree {
        groups: vec![NavGroup {
            name: NAV_GROUP_TITLE.to_string(),
            id: generate_id(),
            entries,
            selected,
        }],
    }
}

impl NavTree {
    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    /// Entries of the constraints group
    pub fn entries(&self) -> &[NavEntry] {
        self.groups
            .first()
            .map(|g| g.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.groups.first().and_then(|g| g.selected)
    }

    pub fn selected_entry(&self) -> Option<&NavEntry> {
        self.selected_index().and_then(|i| self.entries().get(i))
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_index() == Some(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries().iter().position(|e| e.key == key)
    }

    /// Select the entry whose key is `key`, deselecting every other one.
    ///
    /// An unknown key leaves nothing selected. Returns whether the selection
    /// changed.
    pub fn select_key(&mut self, key: &str) -> bool {
        let position = self.position(key);
        match self.groups.first_mut() {
            Some(group) if group.selected != position => {
                group.selected = position;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: &str, name: &str) -> ConstraintRecord {
        serde_json::from_value(json!({"kind": kind, "metadata": {"name": name}})).unwrap()
    }

    fn records(specs: &[(&str, Option<u64>)]) -> Vec<ConstraintRecord> {
        specs
            .iter()
            .map(|(name, total)| {
                let mut status = json!({});
                if let Some(t) = total {
                    status = json!({ "totalViolations": t });
                }
                serde_json::from_value(json!({
                    "kind": "K8sRequiredLabels",
                    "metadata": { "name": name },
                    "status": status,
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_project_preserves_order_and_selects_first() {
        let tree = project(&records(&[("a", Some(1)), ("b", None), ("c", Some(0))]));
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(tree.selected_index(), Some(0));
        assert_eq!(tree.groups().len(), 1);
        assert_eq!(tree.groups()[0].name, "Constraints");
    }

    #[test]
    fn test_project_empty_has_no_selection() {
        let tree = project(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.selected_index(), None);
        assert_eq!(tree.groups().len(), 1);
    }

    #[test]
    fn test_badge_folds_unknown_to_zero() {
        let tree = project(&records(&[("a", Some(7)), ("b", None), ("c", Some(0))]));
        let badges: Vec<_> = tree.entries().iter().map(|e| e.badge).collect();
        assert_eq!(badges, [7, 0, 0]);
        assert_eq!(tree.entries()[0].badge_tone(), BadgeTone::Danger);
        assert_eq!(tree.entries()[1].badge_tone(), BadgeTone::Success);
    }

    #[test]
    fn test_ids_are_unique_across_projections() {
        let first = project(&records(&[("a", None), ("b", None)]));
        let second = project(&records(&[("a", None), ("b", None)]));
        let mut ids: Vec<_> = first
            .entries()
            .iter()
            .chain(second.entries())
            .map(|e| e.id.clone())
            .collect();
        ids.push(first.groups()[0].id.clone());
        ids.push(second.groups()[0].id.clone());
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(ids.iter().all(|id| id.starts_with("constraints-")));
    }

    #[test]
    fn test_select_key_moves_selection_once() {
        let mut tree = project(&records(&[("a", None), ("b", None)]));
        assert!(tree.select_key("b"));
        assert!(!tree.select_key("b"));
        assert!(tree.is_selected(1));
        assert!(!tree.is_selected(0));
        assert_eq!(tree.selected_entry().unwrap().scroll_target(), "b");
    }

    #[test]
    fn test_select_unknown_key_clears_selection() {
        let mut tree = project(&records(&[("a", None)]));
        assert!(tree.select_key("missing"));
        assert_eq!(tree.selected_index(), None);
    }

    #[test]
    fn test_shared_names_get_distinct_keys() {
        let tree = project(&[
            record("K8sRequiredLabels", "owner"),
            record("K8sRequiredAnnotations", "owner"),
            record("K8sAllowedRepos", "repos"),
            record("K8sRequiredAnnotations", "owner"),
        ]);
        let keys: Vec<_> = tree.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "owner",
                "K8sRequiredAnnotations/owner",
                "repos",
                "K8sRequiredAnnotations/owner~2"
            ]
        );
        assert_eq!(tree.entries()[1].name, "owner");
    }
}
