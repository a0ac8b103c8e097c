//! Status Bar Widget
//!
//! Shows loading/status messages on the left and key hints on the right.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Status bar widget
pub struct StatusBar<'a> {
    message: Option<&'a str>,
    loading: bool,
    /// "current/total" position of the panel in view
    position: Option<(usize, usize)>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            message: None,
            loading: false,
            position: None,
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn position(mut self, position: Option<(usize, usize)>) -> Self {
        self.position = position;
        self
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Min(20),    // Status
            Constraint::Length(10), // Position
            Constraint::Length(40), // Hints
        ])
        .split(area);

        let status = if self.loading {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(self.theme.yellow)),
                Span::styled(
                    "Loading constraints...",
                    Style::default().fg(self.theme.text_secondary),
                ),
            ])
        } else if let Some(message) = self.message {
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(self.theme.text_secondary),
            ))
        } else {
            Line::default()
        };
        Paragraph::new(status).render(chunks[0], buf);

        if let Some((current, total)) = self.position {
            Paragraph::new(Line::from(Span::styled(
                format!("{}/{}", current, total),
                self.theme.muted(),
            )))
            .render(chunks[1], buf);
        }

        let hints = Line::from(Span::styled(
            "c context  r reload  ? help  q quit",
            self.theme.muted(),
        ))
        .right_aligned();
        Paragraph::new(hints).render(chunks[2], buf);
    }
}
