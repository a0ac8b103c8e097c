//! TUI Widget Unit Tests
//!
//! Tests individual widgets in isolation
//!
//! Run: cargo test --test tui_widget_tests

use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Terminal;
use serde_json::json;

use gpm_tui::api::{BackendError, ConstraintRecord};
use gpm_tui::tui::theme::Theme;
use gpm_tui::tui::widgets::constraint_panel::{
    NO_SPEC_TEXT, NO_VIOLATIONS_TEXT, TRUNCATED_TITLE,
};
use gpm_tui::tui::widgets::*;
use gpm_tui::ui_backend::{project, FetchFailure, PanelFolds, PanelSection, Route};

/// Helper to render a widget and capture buffer
fn render_widget<W>(widget: W, width: u16, height: u16) -> String
where
    W: ratatui::widgets::Widget,
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();

    terminal
        .draw(|f| {
            let area = Rect {
                x: 0,
                y: 0,
                width,
                height,
            };
            f.render_widget(widget, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer();
    let mut result = String::new();
    for y in 0..height {
        for x in 0..width {
            result.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
        }
        result.push('\n');
    }
    result
}

fn lines_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn record(value: serde_json::Value) -> ConstraintRecord {
    serde_json::from_value(value).unwrap()
}

fn panel_text(record: &ConstraintRecord, folds: &PanelFolds) -> String {
    lines_text(&render_panel(record, record.name(), folds, &Theme::default(), 100))
}

// ============================================================================
// CONSTRAINT PANEL TESTS
// ============================================================================

#[test]
fn test_panel_truncated_violations() {
    let r = record(json!({
        "kind": "K8sRequiredLabels",
        "metadata": {"name": "must-have-owner"},
        "spec": {"enforcementAction": "deny"},
        "status": {
            "totalViolations": 5,
            "violations": [
                {"enforcementAction": "deny", "kind": "Namespace", "name": "ns-a", "message": "you must provide labels: {\"owner\"}"},
                {"enforcementAction": "deny", "kind": "Namespace", "name": "ns-b", "message": "missing owner"},
                {"enforcementAction": "deny", "kind": "Namespace", "name": "ns-c", "message": "missing owner"}
            ]
        }
    }));
    let text = panel_text(&r, &PanelFolds::default());

    assert!(text.contains("must-have-owner"));
    assert!(text.contains("MODE DENY"));
    assert!(text.contains("TEMPLATE: K8sRequiredLabels"));
    assert!(text.contains("ns-b"));
    assert!(text.contains(TRUNCATED_TITLE));
    assert!(text.contains("limiting the audit violations per constraint to 3 (5 in total)"));
}

#[test]
fn test_panel_without_violations_has_no_table() {
    let r = record(json!({
        "kind": "K8sAllowedRepos",
        "metadata": {"name": "repos"},
        "spec": {},
        "status": {"totalViolations": 0}
    }));
    let text = panel_text(&r, &PanelFolds::default());

    assert!(text.contains(NO_VIOLATIONS_TEXT));
    assert!(!text.contains("Namespace"));
    assert!(!text.contains(TRUNCATED_TITLE));
}

#[test]
fn test_panel_unknown_violations_shows_advisory() {
    let r = record(json!({"kind": "K", "metadata": {"name": "fresh"}}));
    let text = panel_text(&r, &PanelFolds::default());

    assert!(text.contains("are unknown"));
    assert!(!text.contains(NO_VIOLATIONS_TEXT));
    assert!(text.contains(NO_SPEC_TEXT));
    assert!(text.contains("MODE ?"));
}

#[test]
fn test_panel_collapsed_sections() {
    let r = record(json!({
        "kind": "K",
        "metadata": {"name": "p"},
        "spec": {
            "match": {"kinds": [{"kinds": ["Pod"]}]},
            "parameters": {"repos": ["ghcr.io/acme"]}
        },
        "status": {
            "totalViolations": 1,
            "violations": [{"kind": "Pod", "name": "web-0", "message": "bad repo"}]
        }
    }));
    let open = panel_text(&r, &PanelFolds::default());
    assert!(open.contains("web-0"));
    assert!(open.contains("ghcr.io/acme"));

    let mut folds = PanelFolds::default();
    folds.toggle("p", PanelSection::Violations);
    folds.toggle("p", PanelSection::Parameters);
    let closed = panel_text(&r, &folds);
    assert!(!closed.contains("web-0"));
    assert!(!closed.contains("ghcr.io/acme"));
    assert!(closed.contains("Pod"));
}

#[test]
fn test_panel_pod_badges() {
    let r = record(json!({
        "kind": "K",
        "metadata": {"name": "p", "creationTimestamp": "2024-03-01T10:20:30Z"},
        "spec": {"enforcementAction": "dryrun"},
        "status": {
            "totalViolations": 0,
            "auditTimestamp": "2024-03-02T00:00:00Z",
            "byPod": [
                {"id": "gatekeeper-audit-1", "enforced": true, "observedGeneration": 2},
                {"id": "gatekeeper-controller-1", "enforced": false, "observedGeneration": 2}
            ]
        }
    }));
    let text = panel_text(&r, &PanelFolds::default());

    assert!(text.contains("MODE DRYRUN"));
    assert!(text.contains("gatekeeper-audit-1"));
    assert!(text.contains("NOT ENFORCED"));
    assert!(text.contains("GENERATION 2"));
    assert!(text.contains("CREATED ON 2024-03-01T10:20:30Z"));
}

// ============================================================================
// SIDEBAR TESTS
// ============================================================================

#[test]
fn test_sidebar_lists_entries_with_badges() {
    let theme = Theme::default();
    let records = vec![
        record(json!({"kind": "K", "metadata": {"name": "alpha"}, "status": {"totalViolations": 12}})),
        record(json!({"kind": "K", "metadata": {"name": "beta"}, "status": {"totalViolations": 0}})),
    ];
    let nav = project(&records);
    let output = render_widget(
        Sidebar::new(&nav, &theme).report_url(Some("http://gpm/api/v1/constraints?report=html")),
        40,
        12,
    );

    assert!(output.contains("Constraints"));
    assert!(output.contains("▶ alpha"));
    assert!(output.contains(" 12 "));
    assert!(output.contains("beta"));
    assert!(output.contains("Download violations report"));
}

#[test]
fn test_sidebar_empty() {
    let theme = Theme::default();
    let nav = project(&[]);
    let output = render_widget(Sidebar::new(&nav, &theme), 40, 8);

    assert!(output.contains("No constraints"));
    assert!(!output.contains("Download"));
}

// ============================================================================
// PAGE TESTS
// ============================================================================

#[test]
fn test_error_view_shows_backend_error() {
    let theme = Theme::default();
    let failure = FetchFailure {
        error: BackendError {
            error: "boom".to_string(),
            description: "kube api unreachable".to_string(),
            action: "check RBAC".to_string(),
        },
        entity: "constraints".to_string(),
    };
    let output = render_widget(ErrorView::new(Some(&failure), &theme), 80, 12);

    assert!(output.contains("boom"));
    assert!(output.contains("kube api unreachable"));
    assert!(output.contains("check RBAC"));
}

#[test]
fn test_linked_page_points_at_web_ui() {
    let theme = Theme::default();
    let output = render_widget(
        LinkedPage::new(Route::ConstraintTemplates, "http://gpm.local/", &theme),
        80,
        6,
    );
    assert!(output.contains("http://gpm.local/constrainttemplates"));
}

#[test]
fn test_header_shows_context() {
    let theme = Theme::default();
    let output = render_widget(Header::new(Route::Constraints, "kind-prod", &theme), 200, 1);

    assert!(output.contains(APP_TITLE));
    assert!(output.contains("kind-prod"));
}

#[test]
fn test_status_bar_loading() {
    let theme = Theme::default();
    let output = render_widget(
        StatusBar::new(&theme).loading(true).message(Some("hidden")),
        100,
        1,
    );
    assert!(output.contains("Loading constraints..."));
    assert!(!output.contains("hidden"));
}

#[test]
fn test_loading_view() {
    let theme = Theme::default();
    let output = render_widget(LoadingView::new(&theme), 60, 4);
    assert!(output.contains("Loading constraints..."));
}
