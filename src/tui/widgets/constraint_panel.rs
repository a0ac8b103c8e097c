//! Constraint Panel
//!
//! Renders one constraint as a detail panel: header with mode and template,
//! the violations block, match/parameters trees, per-pod enforcement badges
//! and the creation timestamp. Output depends only on the record, the fold
//! state and the width, so the renderer can measure panels before drawing.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::json_tree::json_tree_lines;
use crate::api::{ConstraintRecord, EnforcementMode, Violation, ViolationState};
use crate::tui::theme::Theme;
use crate::tui::utils::{fit_to_width, wrap_text};
use crate::ui_backend::{PanelFolds, PanelSection};

pub const UNKNOWN_VIOLATIONS_TEXT: &str = "Violations for this Constraint are unknown. This probably means that the Constraint has not been processed by Gatekeeper yet. Please, try refreshing the page.";
pub const NO_VIOLATIONS_TEXT: &str = "There are no violations for this Constraint";
pub const TRUNCATED_TITLE: &str = "Not all violations can be shown";
pub const NO_SPEC_TEXT: &str = "This Constraint has no spec defined";

const INDENT: usize = 2;

/// Render `record` into styled lines `width` columns wide.
///
/// `key` is the panel id its sections are folded under.
pub fn render_panel(
    record: &ConstraintRecord,
    key: &str,
    folds: &PanelFolds,
    theme: &Theme,
    width: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width).max(20);
    let mut lines = Vec::new();

    lines.push(title_line(record, theme, width));
    lines.push(rule(theme, width));

    violations_block(record, key, folds, theme, width, &mut lines);
    lines.push(rule(theme, width));

    match &record.spec {
        None => {
            lines.push(Line::from(vec![
                Span::styled("✗ ", Style::default().fg(theme.red)),
                Span::styled(NO_SPEC_TEXT, theme.heading()),
            ]));
            lines.push(rule(theme, width));
        }
        Some(spec) => {
            if let Some(criteria) = &spec.match_criteria {
                let collapsed = folds.is_collapsed(key, PanelSection::Match);
                lines.push(section_header("Match criteria", "m", collapsed, theme));
                if !collapsed {
                    lines.extend(json_tree_lines(criteria, theme, INDENT));
                }
                lines.push(rule(theme, width));
            }
            if let Some(parameters) = &spec.parameters {
                let collapsed = folds.is_collapsed(key, PanelSection::Parameters);
                lines.push(section_header("Parameters", "p", collapsed, theme));
                if !collapsed {
                    lines.extend(json_tree_lines(parameters, theme, INDENT));
                }
                lines.push(rule(theme, width));
            }
        }
    }

    enforcement_block(record, theme, width, &mut lines);
    lines.push(rule(theme, width));

    let created = record
        .metadata
        .creation_timestamp
        .as_deref()
        .unwrap_or("unknown");
    let footer = format!("CREATED ON {}", created);
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(width.saturating_sub(footer.chars().count()))),
        Span::styled(footer, theme.muted()),
    ]));
    lines.push(Line::default());
    lines
}

fn title_line(record: &ConstraintRecord, theme: &Theme, width: usize) -> Line<'static> {
    let mode = record.enforcement_mode();
    let (mode_text, mode_bg) = match &mode {
        None => ("MODE ?".to_string(), theme.text_muted),
        Some(EnforcementMode::DryRun) => ("MODE DRYRUN".to_string(), theme.blue),
        Some(m) => (format!("MODE {}", m.label().to_uppercase()), theme.yellow),
    };
    let lock = match &mode {
        Some(m) if !m.is_blocking() => "🔓",
        _ => "🔒",
    };
    let template = format!("TEMPLATE: {}", record.kind);
    let left = format!("{}  {} {} ", record.name(), lock, mode_text);
    let gap = width
        .saturating_sub(unicode_width::UnicodeWidthStr::width(left.as_str()))
        .saturating_sub(template.chars().count())
        .max(1);

    Line::from(vec![
        Span::styled(
            record.name().to_string(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("{} {} ", lock, mode_text), theme.badge(mode_bg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(
            template,
            Style::default()
                .fg(theme.cyan)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ])
}

fn rule(theme: &Theme, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(theme.border),
    ))
}

fn section_header(title: &str, key: &str, collapsed: bool, theme: &Theme) -> Line<'static> {
    let arrow = if collapsed { "▸" } else { "▾" };
    Line::from(vec![
        Span::styled(format!("{} ", arrow), Style::default().fg(theme.text_secondary)),
        Span::styled(title.to_string(), theme.heading()),
        Span::styled(format!("  [{}]", key), theme.muted()),
    ])
}

fn violations_block(
    record: &ConstraintRecord,
    key: &str,
    folds: &PanelFolds,
    theme: &Theme,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let state = record.violation_state();
    match state {
        ViolationState::Unknown => {
            let text = wrap_text(UNKNOWN_VIOLATIONS_TEXT, width.saturating_sub(2));
            for (i, row) in text.into_iter().enumerate() {
                let icon = if i == 0 { "⚠ " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(icon, Style::default().fg(theme.yellow)),
                    Span::styled(row, theme.heading()),
                ]));
            }
        }
        ViolationState::None => {
            lines.push(Line::from(vec![
                Span::styled("✓ ", Style::default().fg(theme.green)),
                Span::styled(NO_VIOLATIONS_TEXT, theme.heading()),
            ]));
        }
        ViolationState::Present { total, shown } => {
            let collapsed = folds.is_collapsed(key, PanelSection::Violations);
            let arrow = if collapsed { "▸" } else { "▾" };
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", arrow), Style::default().fg(theme.text_secondary)),
                Span::styled("⚠ ", Style::default().fg(theme.red)),
                Span::styled("Violations ", theme.heading()),
                Span::styled(format!(" {} ", total), theme.badge(theme.red)),
                Span::styled("  [v]", theme.muted()),
            ]));
            if collapsed {
                return;
            }
            violations_table(&record.status.violations, theme, width, lines);
            if state.is_truncated() {
                lines.push(Line::from(vec![
                    Span::styled("⚠ ", Style::default().fg(theme.yellow)),
                    Span::styled(
                        TRUNCATED_TITLE,
                        Style::default()
                            .fg(theme.yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]));
                let notice = truncation_notice(shown, total);
                for row in wrap_text(&notice, width.saturating_sub(INDENT)) {
                    lines.push(Line::from(vec![
                        Span::raw(" ".repeat(INDENT)),
                        Span::styled(row, Style::default().fg(theme.yellow)),
                    ]));
                }
            }
        }
    }
}

/// Explanation shown when the audit returned fewer entries than it counted
pub fn truncation_notice(shown: usize, total: u64) -> String {
    format!(
        "Gatekeeper's configuration is limiting the audit violations per constraint to {} \
         ({} in total). See Gatekeeper's --constraint-violations-limit audit configuration flag.",
        shown, total
    )
}

/// Column widths for Action, Kind, Namespace, Name; Message takes the rest
fn column_widths(width: usize) -> [usize; 5] {
    let avail = width.saturating_sub(INDENT + 4);
    let action = 7;
    let kind = (avail * 12 / 100).max(6);
    let namespace = (avail * 14 / 100).max(6);
    let name = (avail * 18 / 100).max(6);
    let message = avail
        .saturating_sub(action + kind + namespace + name)
        .max(10);
    [action, kind, namespace, name, message]
}

fn violations_table(
    violations: &[Violation],
    theme: &Theme,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let cols = column_widths(width);
    let header = ["Action", "Kind", "Namespace", "Name", "Message"];
    let mut spans = vec![Span::raw(" ".repeat(INDENT))];
    for (i, title) in header.iter().enumerate() {
        spans.push(Span::styled(
            fit_to_width(title, cols[i]),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
        if i < 4 {
            spans.push(Span::raw(" "));
        }
    }
    lines.push(Line::from(spans));

    for violation in violations {
        let action_color = match EnforcementMode::parse(&violation.enforcement_action) {
            EnforcementMode::DryRun => theme.blue,
            EnforcementMode::Warn => theme.yellow,
            _ => theme.red,
        };
        // Message is never truncated; it wraps inside its column
        let message = wrap_text(&violation.message, cols[4]);
        let cells = [
            &violation.enforcement_action,
            &violation.kind,
            &violation.namespace,
            &violation.name,
        ];
        for (row, part) in message.into_iter().enumerate() {
            let mut spans = vec![Span::raw(" ".repeat(INDENT))];
            for (i, cell) in cells.iter().enumerate() {
                let text = if row == 0 { cell.as_str() } else { "" };
                let style = if i == 0 {
                    Style::default().fg(action_color)
                } else {
                    Style::default().fg(theme.text_primary)
                };
                spans.push(Span::styled(fit_to_width(text, cols[i]), style));
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(part, Style::default().fg(theme.text_secondary)));
            lines.push(Line::from(spans));
        }
    }
}

fn enforcement_block(
    record: &ConstraintRecord,
    theme: &Theme,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let audited = record
        .status
        .audit_timestamp
        .as_deref()
        .unwrap_or("unknown");
    lines.push(Line::from(Span::styled(
        format!("Status at {}", audited),
        theme.heading(),
    )));

    // Badges flow left to right and wrap to the next row
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for pod in &record.status.by_pod {
        let (icon, state, bg) = if pod.enforced {
            ("🔒", "ENFORCED", theme.green)
        } else {
            ("🔓", "NOT ENFORCED", theme.red)
        };
        let label = format!(" {} {} {} ", icon, pod.id, state);
        let generation = format!(" GENERATION {} ", pod.observed_generation);
        let badge_width = unicode_width::UnicodeWidthStr::width(label.as_str())
            + generation.chars().count()
            + 1;
        if used > 0 && used + badge_width > width {
            lines.push(Line::from(std::mem::take(&mut row)));
            used = 0;
        }
        row.push(Span::styled(label, theme.badge(bg)));
        row.push(Span::styled(generation, theme.badge(theme.text_muted)));
        row.push(Span::raw(" "));
        used += badge_width;
    }
    if !row.is_empty() {
        lines.push(Line::from(row));
    }
}
