//! Sidebar Widget - Constraint navigation with violation badges
//!
//! One row per constraint under a single group. The selected row follows
//! the panel in view; clicking a row scrolls its panel to the top.

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::theme::Theme;
use crate::tui::utils::truncate_to_width;
use crate::ui_backend::{BadgeTone, NavTree};

/// Rows reserved at the bottom for the report link
const FOOTER_ROWS: u16 = 2;

/// Sidebar widget
pub struct Sidebar<'a> {
    nav: &'a NavTree,
    theme: &'a Theme,
    focused: bool,
    report_url: Option<&'a str>,
}

impl<'a> Sidebar<'a> {
    pub fn new(nav: &'a NavTree, theme: &'a Theme) -> Self {
        Self {
            nav,
            theme,
            focused: false,
            report_url: None,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Report download link shown under the list when there are constraints
    pub fn report_url(mut self, url: Option<&'a str>) -> Self {
        self.report_url = url;
        self
    }

    /// Rows available to entries inside a sidebar of `height` rows
    pub fn list_rows(height: u16) -> u16 {
        height.saturating_sub(2 + FOOTER_ROWS)
    }

    /// First entry drawn so that the selected one stays visible
    pub fn list_offset(nav: &NavTree, rows: u16) -> usize {
        let rows = usize::from(rows.max(1));
        nav.selected_index()
            .map(|i| i.saturating_sub(rows - 1))
            .unwrap_or(0)
    }

    /// Map a row inside a sidebar at `area` to an entry index
    pub fn entry_at(nav: &NavTree, area: Rect, row: u16) -> Option<usize> {
        let rows = Self::list_rows(area.height);
        let top = area.y + 1;
        if row < top || row >= top + rows {
            return None;
        }
        let index = Self::list_offset(nav, rows) + usize::from(row - top);
        (index < nav.len()).then_some(index)
    }

    fn entry_line(&self, index: usize, width: usize) -> Line<'static> {
        let entry = &self.nav.entries()[index];
        let selected = self.nav.is_selected(index);
        let badge = format!(" {} ", entry.badge);
        let badge_bg = match entry.badge_tone() {
            BadgeTone::Success => self.theme.green,
            BadgeTone::Danger => self.theme.red,
        };
        let marker = if selected { "▶ " } else { "  " };
        let name_width = width.saturating_sub(badge.len() + marker.chars().count() + 1);
        let name = truncate_to_width(&entry.name, name_width);
        let gap = width.saturating_sub(
            marker.chars().count()
                + unicode_width::UnicodeWidthStr::width(name.as_str())
                + badge.len(),
        );

        let name_style = if selected {
            Style::default()
                .fg(self.theme.cyan)
                .bg(self.theme.bg_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.text_primary)
        };
        let pad_style = if selected {
            Style::default().bg(self.theme.bg_selected)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(marker, name_style),
            Span::styled(name, name_style),
            Span::styled(" ".repeat(gap), pad_style),
            Span::styled(badge, self.theme.badge(badge_bg)),
        ])
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        let title = self
            .nav
            .groups()
            .first()
            .map(|g| g.name.clone())
            .unwrap_or_default();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(format!(" {} ", title), self.theme.heading()))
            .style(Style::default().bg(self.theme.bg_sidebar));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let rows = Self::list_rows(area.height);
        let width = usize::from(inner.width);
        let offset = Self::list_offset(self.nav, rows);
        let mut lines: Vec<Line> = (offset..self.nav.len())
            .take(usize::from(rows))
            .map(|i| self.entry_line(i, width))
            .collect();
        if self.nav.is_empty() {
            lines.push(Line::from(Span::styled(
                "No constraints",
                self.theme.muted(),
            )));
        }
        let list_area = Rect {
            height: rows.min(inner.height),
            ..inner
        };
        Paragraph::new(lines).render(list_area, buf);

        if let (Some(url), false) = (self.report_url, self.nav.is_empty()) {
            let footer_area = Rect {
                y: inner.y + inner.height.saturating_sub(FOOTER_ROWS),
                height: FOOTER_ROWS.min(inner.height),
                ..inner
            };
            let footer = vec![
                Line::from(Span::styled(
                    "⬇ Download violations report",
                    Style::default().fg(self.theme.blue),
                )),
                Line::from(Span::styled(
                    truncate_to_width(url, width),
                    self.theme.muted(),
                )),
            ];
            Paragraph::new(footer).render(footer_area, buf);
        }
    }
}
