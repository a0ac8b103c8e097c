//! Error View
//!
//! Full-page presentation of a failed load: summary, description and the
//! suggested action, plus the retry hint.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;
use crate::ui_backend::FetchFailure;

pub struct ErrorView<'a> {
    failure: Option<&'a FetchFailure>,
    theme: &'a Theme,
}

impl<'a> ErrorView<'a> {
    pub fn new(failure: Option<&'a FetchFailure>, theme: &'a Theme) -> Self {
        Self { failure, theme }
    }
}

impl Widget for ErrorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.red))
            .title(Span::styled(
                " Error ",
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            ));

        let mut lines = Vec::new();
        match self.failure {
            Some(failure) => {
                lines.push(Line::from(vec![
                    Span::styled("✗ ", Style::default().fg(self.theme.red)),
                    Span::styled(failure.error.error.clone(), self.theme.heading()),
                ]));
                lines.push(Line::default());
                if !failure.error.description.is_empty() {
                    lines.push(Line::from(Span::styled(
                        failure.error.description.clone(),
                        Style::default().fg(self.theme.text_secondary),
                    )));
                    lines.push(Line::default());
                }
                if !failure.error.action.is_empty() {
                    lines.push(Line::from(vec![
                        Span::styled("→ ", Style::default().fg(self.theme.yellow)),
                        Span::styled(
                            failure.error.action.clone(),
                            Style::default().fg(self.theme.yellow),
                        ),
                    ]));
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(
                    format!("Failed to load {}.", failure.entity),
                    self.theme.muted(),
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "Nothing went wrong.",
                self.theme.muted(),
            ))),
        }
        lines.push(Line::from(Span::styled(
            "r: retry   c: switch context",
            self.theme.muted(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
