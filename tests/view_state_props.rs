//! Property tests for the sidebar projection and scroll-synchronised selection

use proptest::prelude::*;
use serde_json::json;

use gpm_tui::api::ConstraintRecord;
use gpm_tui::ui_backend::{project, BadgeTone, ViewState, VisibilityPolicy};

fn records(totals: &[Option<u64>]) -> Vec<ConstraintRecord> {
    totals
        .iter()
        .enumerate()
        .map(|(i, total)| {
            let mut value = json!({"kind": "K", "metadata": {"name": format!("c-{}", i)}});
            if let Some(total) = total {
                value["status"] = json!({"totalViolations": total});
            }
            serde_json::from_value(value).unwrap()
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Scroll(isize),
    Step(isize),
    Top,
    Bottom,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-30isize..30).prop_map(Op::Scroll),
        (-3isize..4).prop_map(Op::Step),
        Just(Op::Top),
        Just(Op::Bottom),
    ]
}

fn policy() -> impl Strategy<Value = VisibilityPolicy> {
    prop_oneof![
        Just(VisibilityPolicy::Topmost),
        Just(VisibilityPolicy::MostVisible)
    ]
}

proptest! {
    #[test]
    fn projection_preserves_order_and_badges(
        totals in prop::collection::vec(prop::option::of(0u64..50), 0..12)
    ) {
        let records = records(&totals);
        let nav = project(&records);

        prop_assert_eq!(nav.groups().len(), 1);
        prop_assert_eq!(nav.len(), records.len());
        for (entry, (record, total)) in nav.entries().iter().zip(records.iter().zip(&totals)) {
            prop_assert_eq!(&entry.key, &record.metadata.name);
            prop_assert_eq!(entry.badge, total.unwrap_or(0));
            let tone = if entry.badge > 0 { BadgeTone::Danger } else { BadgeTone::Success };
            prop_assert_eq!(entry.badge_tone(), tone);
        }
        let expected = if records.is_empty() { None } else { Some(0) };
        prop_assert_eq!(nav.selected_index(), expected);
    }

    #[test]
    fn selection_follows_panel_in_view(
        heights in prop::collection::vec(1usize..15, 1..10),
        viewport in 1usize..20,
        policy in policy(),
        ops in prop::collection::vec(op(), 0..25),
    ) {
        let totals = vec![Some(1); heights.len()];
        let mut view = ViewState::new(policy, None);
        view.apply_records(records(&totals));
        let names: Vec<String> = view.records().iter().map(|r| r.name().to_string()).collect();
        view.update_layout(names.iter().map(String::as_str).zip(heights.iter().copied()), viewport);

        for op in ops {
            match op {
                Op::Scroll(delta) => view.scroll_by(delta),
                Op::Step(steps) => {
                    view.step_selection(steps);
                }
                Op::Top => view.scroll_to_top(),
                Op::Bottom => view.scroll_to_bottom(),
            }

            let nav = view.nav();
            let selected = (0..nav.len()).filter(|i| nav.is_selected(*i)).count();
            prop_assert!(selected <= 1);

            prop_assert!(view.scroll_offset() <= view.registry().max_scroll());
            let in_view = view.current_in_view();
            prop_assert!(in_view.is_some());
            let key = nav.selected_entry().map(|e| e.key.as_str());
            prop_assert_eq!(key, in_view);
        }
    }

    #[test]
    fn deep_link_lands_on_anchor(
        heights in prop::collection::vec(1usize..15, 1..10),
        viewport in 1usize..20,
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = (0..heights.len()).map(|i| format!("c-{}", i)).collect();
        let anchor = pick.get(&names).clone();
        let mut view = ViewState::new(VisibilityPolicy::Topmost, Some(&anchor));
        view.apply_records(records(&vec![None; heights.len()]));
        view.update_layout(names.iter().map(String::as_str).zip(heights.iter().copied()), viewport);

        let top = view.registry().slot(&anchor).unwrap().top;
        prop_assert_eq!(view.scroll_offset(), top);
        prop_assert_eq!(view.current_in_view(), Some(anchor.as_str()));
    }
}
