//! Header Widget
//!
//! Displays the app name and version, the route tabs and the selected
//! cluster context. The logout hint only appears when auth is enabled.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::ui_backend::Route;

pub const APP_TITLE: &str = "Gatekeeper Policy Manager";

/// Version string shown in the header
pub fn version_label() -> String {
    format!(
        "v{}{}",
        env!("CARGO_PKG_VERSION"),
        env!("GPM_VERSION_SUFFIX")
    )
}

/// Header widget showing title, tabs and context
pub struct Header<'a> {
    route: Route,
    context: &'a str,
    auth_enabled: bool,
    logging_out: bool,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(route: Route, context: &'a str, theme: &'a Theme) -> Self {
        Self {
            route,
            context,
            auth_enabled: false,
            logging_out: false,
            theme,
        }
    }

    pub fn auth(mut self, enabled: bool, logging_out: bool) -> Self {
        self.auth_enabled = enabled;
        self.logging_out = logging_out;
        self
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let mut spans = vec![
            Span::styled("⛨ ", Style::default().fg(self.theme.cyan)),
            Span::styled(APP_TITLE, self.theme.heading()),
            Span::styled(format!(" {}  ", version_label()), self.theme.muted()),
        ];

        for (i, route) in Route::NAVIGABLE.iter().enumerate() {
            let style = if *route == self.route {
                Style::default()
                    .fg(self.theme.bg_main)
                    .bg(self.theme.blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text_secondary)
            };
            spans.push(Span::styled(
                format!(" {} {} ", i + 1, route.title()),
                style,
            ));
            spans.push(Span::raw(" "));
        }

        let context = if self.context.is_empty() {
            "in-cluster"
        } else {
            self.context
        };
        spans.push(Span::styled("  ctx: ", self.theme.muted()));
        spans.push(Span::styled(
            context.to_string(),
            Style::default().fg(self.theme.yellow),
        ));

        if self.auth_enabled {
            let label = if self.logging_out {
                "  logging out…"
            } else {
                "  L logout"
            };
            spans.push(Span::styled(label, Style::default().fg(self.theme.red)));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.bg_dark))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(header: Header<'_>, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| f.render_widget(header, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..width)
            .map(|x| buffer.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_header_renders_title_and_tabs() {
        let theme = Theme::default();
        let content = render(Header::new(Route::Constraints, "kind-dev", &theme), 200);
        assert!(content.contains(APP_TITLE));
        assert!(content.contains("3 Constraints"));
        assert!(content.contains("kind-dev"));
        assert!(!content.contains("logout"));
    }

    #[test]
    fn test_header_shows_logout_when_auth_enabled() {
        let theme = Theme::default();
        let content = render(
            Header::new(Route::Home, "", &theme).auth(true, false),
            200,
        );
        assert!(content.contains("in-cluster"));
        assert!(content.contains("L logout"));
    }
}
