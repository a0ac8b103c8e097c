//! Secondary pages: home summary, loading view and the routes this client
//! only links to.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::api::{ConstraintRecord, EnforcementMode, ViolationState};
use crate::tui::theme::Theme;
use crate::ui_backend::Route;

/// Aggregate numbers shown on the home page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSummary {
    pub constraints: usize,
    pub violating: usize,
    pub unknown: usize,
    pub total_violations: u64,
    pub dry_run: usize,
}

impl ConstraintSummary {
    pub fn from_records(records: &[ConstraintRecord]) -> Self {
        let mut summary = Self {
            constraints: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.violation_state() {
                ViolationState::Unknown => summary.unknown += 1,
                ViolationState::None => {}
                ViolationState::Present { total, .. } => {
                    summary.violating += 1;
                    summary.total_violations += total;
                }
            }
            if record.enforcement_mode() == Some(EnforcementMode::DryRun) {
                summary.dry_run += 1;
            }
        }
        summary
    }
}

fn page_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(format!(" {} ", title), theme.heading()))
}

pub struct HomePage<'a> {
    summary: ConstraintSummary,
    context: &'a str,
    api_base: &'a str,
    theme: &'a Theme,
}

impl<'a> HomePage<'a> {
    pub fn new(
        summary: ConstraintSummary,
        context: &'a str,
        api_base: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            summary,
            context,
            api_base,
            theme,
        }
    }
}

impl Widget for HomePage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let row = |label: &str, value: String, color| {
            Line::from(vec![
                Span::styled(format!("{:24}", label), self.theme.muted()),
                Span::styled(value, Style::default().fg(color)),
            ])
        };
        let s = &self.summary;
        let context = if self.context.is_empty() {
            "in-cluster"
        } else {
            self.context
        };
        let lines = vec![
            Line::from(Span::styled(
                "Gatekeeper Policy Manager",
                self.theme.heading(),
            )),
            Line::from(Span::styled(
                "A read-only view of the Gatekeeper constraints in your cluster.",
                Style::default().fg(self.theme.text_secondary),
            )),
            Line::default(),
            row("Backend", self.api_base.to_string(), self.theme.text_primary),
            row("Context", context.to_string(), self.theme.yellow),
            Line::default(),
            row("Constraints", s.constraints.to_string(), self.theme.text_primary),
            row("With violations", s.violating.to_string(), self.theme.red),
            row("Total violations", s.total_violations.to_string(), self.theme.red),
            row("Not yet audited", s.unknown.to_string(), self.theme.yellow),
            row("In dryrun mode", s.dry_run.to_string(), self.theme.blue),
            Line::default(),
            Line::from(Span::styled(
                "Press 3 to browse constraints.",
                self.theme.muted(),
            )),
        ];
        Paragraph::new(lines)
            .block(page_block(Route::Home.title(), self.theme))
            .render(area, buf);
    }
}

/// Routes served by the web UI that this client does not render
pub struct LinkedPage<'a> {
    route: Route,
    api_base: &'a str,
    theme: &'a Theme,
}

impl<'a> LinkedPage<'a> {
    pub fn new(route: Route, api_base: &'a str, theme: &'a Theme) -> Self {
        Self {
            route,
            api_base,
            theme,
        }
    }
}

impl Widget for LinkedPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let url = format!(
            "{}{}",
            self.api_base.trim_end_matches('/'),
            self.route.path()
        );
        let lines = vec![
            Line::from(Span::styled(
                format!("{} are not shown in the terminal dashboard.", self.route.title()),
                Style::default().fg(self.theme.text_secondary),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("Open ", self.theme.muted()),
                Span::styled(url, Style::default().fg(self.theme.blue)),
            ]),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(page_block(self.route.title(), self.theme))
            .render(area, buf);
    }
}

pub struct LoadingView<'a> {
    theme: &'a Theme,
}

impl<'a> LoadingView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for LoadingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(vec![
            Span::styled("● ", Style::default().fg(self.theme.yellow)),
            Span::styled(
                "Loading constraints...",
                Style::default().fg(self.theme.text_secondary),
            ),
        ]))
        .block(page_block(Route::Constraints.title(), self.theme))
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts() {
        let records: Vec<ConstraintRecord> = vec![
            json!({"kind": "K", "metadata": {"name": "a"}, "spec": {"enforcementAction": "dryrun"}, "status": {"totalViolations": 4}}),
            json!({"kind": "K", "metadata": {"name": "b"}, "spec": {}, "status": {"totalViolations": 0}}),
            json!({"kind": "K", "metadata": {"name": "c"}}),
            json!({"kind": "K", "metadata": {"name": "d"}, "status": {"totalViolations": 2}}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

        let summary = ConstraintSummary::from_records(&records);
        assert_eq!(
            summary,
            ConstraintSummary {
                constraints: 4,
                violating: 2,
                unknown: 1,
                total_violations: 6,
                dry_run: 1,
            }
        );
    }
}
