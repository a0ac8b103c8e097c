//! Overlay dialogs: keyboard help and the cluster context picker

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Draw a bordered dialog centred in `area`.
///
/// The dialog is `width_percent` of the screen wide and as tall as `rows`
/// plus borders, capped at the screen. When the rows do not fit, they are
/// scrolled so `focus` stays inside the dialog.
fn draw_dialog(
    title: &str,
    rows: Vec<Line<'_>>,
    focus: Option<usize>,
    width_percent: u16,
    theme: &Theme,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = u32::from(area.width) * u32::from(width_percent) / 100;
    let width = u16::try_from(width).unwrap_or(area.width).max(24).min(area.width);
    let wanted = u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(2);
    let height = wanted.min(area.height);
    let dialog = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let inner_rows = usize::from(height.saturating_sub(2)).max(1);
    let scroll = focus
        .map(|row| row.saturating_sub(inner_rows - 1))
        .and_then(|offset| u16::try_from(offset).ok())
        .unwrap_or(0);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_dark));

    Clear.render(dialog, buf);
    Paragraph::new(rows)
        .style(Style::default().fg(theme.text_primary))
        .scroll((scroll, 0))
        .block(block)
        .render(dialog, buf);
}

/// Help modal showing keyboard shortcuts
pub struct HelpModal<'a> {
    theme: &'a Theme,
    auth_enabled: bool,
}

impl<'a> HelpModal<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            auth_enabled: false,
        }
    }

    pub fn auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    fn shortcuts(&self) -> Vec<(&'static str, &'static str)> {
        let mut shortcuts = vec![
            ("q / Ctrl+C", "Quit application"),
            ("?", "Toggle this help"),
            ("Tab", "Switch focus sidebar/content"),
            ("1-4", "Home / Templates / Constraints / Configurations"),
            ("↑↓ / j k", "Scroll (content) or select (sidebar)"),
            ("PgUp / PgDn", "Scroll a page"),
            ("g / G", "Scroll to top / bottom"),
            ("n / N", "Next / previous constraint"),
            ("Enter", "Jump to selected constraint"),
            ("v / m / p", "Fold violations / match / parameters"),
            ("c", "Switch cluster context"),
            ("r", "Reload"),
        ];
        if self.auth_enabled {
            shortcuts.push(("L", "Log out"));
        }
        shortcuts.push(("Esc", "Close modal"));
        shortcuts
    }
}

impl Widget for HelpModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content: Vec<Line> = self
            .shortcuts()
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:14}", key),
                        Style::default()
                            .fg(self.theme.cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(desc, Style::default().fg(self.theme.text_primary)),
                ])
            })
            .collect();

        draw_dialog(
            "Help - Keyboard Shortcuts",
            content,
            None,
            70,
            self.theme,
            area,
            buf,
        );
    }
}

/// Cluster context picker
pub struct ContextPickerModal<'a> {
    theme: &'a Theme,
    contexts: &'a [String],
    current: &'a str,
    selected: usize,
}

impl<'a> ContextPickerModal<'a> {
    pub fn new(theme: &'a Theme, contexts: &'a [String], current: &'a str) -> Self {
        Self {
            theme,
            contexts,
            current,
            selected: 0,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for ContextPickerModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content: Vec<Line> = self
            .contexts
            .iter()
            .enumerate()
            .map(|(i, context)| {
                let prefix = if i == self.selected { "▶ " } else { "  " };
                let style = if i == self.selected {
                    Style::default()
                        .fg(self.theme.cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.text_primary)
                };
                let mut spans = vec![Span::styled(format!("{}{}", prefix, context), style)];
                if context == self.current {
                    spans.push(Span::styled("  (current)", self.theme.muted()));
                }
                Line::from(spans)
            })
            .collect();

        draw_dialog(
            "Select Cluster Context",
            content,
            Some(self.selected),
            50,
            self.theme,
            area,
            buf,
        );
    }
}
