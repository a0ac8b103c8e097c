//! TUI Renderer - Implements UiRenderer trait for terminal display
//!
//! This module provides the rendering implementation for the TUI,
//! separate from business logic which is handled by AppService.
//! Panels are measured at the current content width before each draw and
//! the heights are reported to the view state, which drives scroll sync.

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Terminal;
use std::time::Duration;

use crate::ui_backend::{
    Command, FetchFailure, FocusedComponent, ModalType, NavTree, PanelSection, Route,
    SharedState, UiRenderer, ViewState,
};

use super::theme::Theme;
use super::widgets::{
    render_panel, ConstraintSummary, ContextPickerModal, ErrorView, Header, HelpModal, HomePage,
    LinkedPage, LoadingView, Sidebar, StatusBar,
};

/// Narrowest terminal that still gets a sidebar
const MIN_WIDTH_FOR_SIDEBAR: u16 = 70;

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    header: Rect,
    sidebar: Option<Rect>,
    content: Rect,
    status: Rect,
}

impl ScreenLayout {
    fn compute(area: Rect, route: Route, sidebar_width: u16) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let show_sidebar = route == Route::Constraints && area.width >= MIN_WIDTH_FOR_SIDEBAR;
        let (sidebar, content) = if show_sidebar {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(sidebar_width), Constraint::Min(30)])
                .split(rows[1]);
            (Some(cols[0]), cols[1])
        } else {
            (None, rows[1])
        };

        Self {
            header: rows[0],
            sidebar,
            content,
            status: rows[2],
        }
    }
}

/// Content block shared by measuring and drawing
fn content_block(theme: &Theme, focused: bool) -> Block<'static> {
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

/// Render every panel at `width`, keyed by panel id
fn measure_panels(
    view: &ViewState,
    theme: &Theme,
    width: u16,
) -> Vec<(String, Vec<Line<'static>>)> {
    view.panels()
        .map(|(key, record)| {
            let lines = render_panel(record, key, &view.folds, theme, width);
            (key.to_string(), lines)
        })
        .collect()
}

/// The parts of the view state one frame draws from
struct FrameView {
    nav: NavTree,
    loading: bool,
    empty: bool,
    error: Option<FetchFailure>,
    summary: ConstraintSummary,
}

impl FrameView {
    fn capture(view: &ViewState) -> Self {
        Self {
            nav: view.nav().clone(),
            loading: view.loading,
            empty: view.records().is_empty(),
            error: view.error.clone(),
            summary: ConstraintSummary::from_records(view.records()),
        }
    }
}

/// TUI Renderer implementation
pub struct TuiRenderer<B: Backend> {
    /// Terminal instance
    terminal: Terminal<B>,
    /// Current theme (cached for rendering)
    theme: Theme,
    sidebar_width: u16,
    /// How long `poll_input` waits for an event
    tick_rate: Duration,
    /// Layout of the last frame, for mouse hit testing
    last_layout: Option<ScreenLayout>,
}

impl<B: Backend> TuiRenderer<B> {
    /// Create a new TUI renderer
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            theme: Theme::default(),
            sidebar_width: 34,
            tick_rate: Duration::from_millis(50),
            last_layout: None,
        }
    }

    pub fn with_sidebar_width(mut self, width: u16) -> Self {
        self.sidebar_width = width.max(12);
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Get reference to terminal (for testing)
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Get mutable reference to terminal
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Convert keyboard event to command
    pub fn key_to_command(key: KeyEvent, state: &SharedState) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Some(Command::Quit),
                _ => None,
            };
        }

        match state.active_modal() {
            Some(ModalType::Help) => {
                return match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                        Some(Command::CloseModal)
                    }
                    _ => None,
                };
            }
            Some(ModalType::ContextPicker) => {
                return match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => Some(Command::CloseModal),
                    KeyCode::Up | KeyCode::Char('k') => Some(Command::ModalUp),
                    KeyCode::Down | KeyCode::Char('j') => Some(Command::ModalDown),
                    KeyCode::Enter => Some(Command::ConfirmModal),
                    _ => None,
                };
            }
            None => {}
        }

        let sidebar_focused = state.focused_component() == FocusedComponent::Sidebar;
        match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('?') => Some(Command::ToggleHelp),
            KeyCode::Tab | KeyCode::BackTab => Some(Command::FocusNext),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                Route::NAVIGABLE.get(index).copied().map(Command::Navigate)
            }

            // Sidebar selection vs content scrolling
            KeyCode::Up | KeyCode::Char('k') if sidebar_focused => Some(Command::SelectPrevious),
            KeyCode::Down | KeyCode::Char('j') if sidebar_focused => Some(Command::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::ScrollDown),
            KeyCode::Char('n') => Some(Command::SelectNext),
            KeyCode::Char('N') => Some(Command::SelectPrevious),
            KeyCode::PageUp => Some(Command::PageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Command::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Command::ScrollToTop),
            KeyCode::End | KeyCode::Char('G') => Some(Command::ScrollToBottom),
            KeyCode::Enter => state
                .read_view(|v| v.nav().selected_index())
                .map(Command::ActivateNavEntry),

            KeyCode::Char('v') => Some(Command::ToggleSection(PanelSection::Violations)),
            KeyCode::Char('m') => Some(Command::ToggleSection(PanelSection::Match)),
            KeyCode::Char('p') => Some(Command::ToggleSection(PanelSection::Parameters)),

            KeyCode::Char('c') => Some(Command::OpenContextPicker),
            KeyCode::Char('r') => Some(Command::Reload),
            KeyCode::Char('L') if state.auth_enabled() => Some(Command::Logout),
            _ => None,
        }
    }

    /// Convert mouse event to command
    fn mouse_to_command(&self, mouse: MouseEvent, state: &SharedState) -> Option<Command> {
        let modal_open = state.active_modal().is_some();
        match mouse.kind {
            MouseEventKind::ScrollDown if modal_open => Some(Command::ModalDown),
            MouseEventKind::ScrollUp if modal_open => Some(Command::ModalUp),
            MouseEventKind::ScrollDown => Some(Command::ScrollDown),
            MouseEventKind::ScrollUp => Some(Command::ScrollUp),
            MouseEventKind::Down(MouseButton::Left) if !modal_open => {
                self.handle_mouse_click(mouse.column, mouse.row, state)
            }
            _ => None,
        }
    }

    /// Handle mouse click and determine which component was clicked
    fn handle_mouse_click(&self, col: u16, row: u16, state: &SharedState) -> Option<Command> {
        let layout = self.last_layout?;
        let sidebar = layout.sidebar?;
        if col < sidebar.x || col >= sidebar.x + sidebar.width {
            return None;
        }
        let index = state.read_view(|v| Sidebar::entry_at(v.nav(), sidebar, row))?;
        tracing::debug!("Sidebar click on entry {}", index);
        Some(Command::ActivateNavEntry(index))
    }

    /// Measure panels for the content area, feed their heights into the view
    /// state and return the rows inside the viewport
    fn layout_panels(&self, state: &SharedState, content: Rect) -> Vec<Line<'static>> {
        let inner = content_block(&self.theme, false).inner(content);
        let viewport = usize::from(inner.height);
        let theme = &self.theme;
        let (panels, settled) = state.read_view(|v| {
            let settled = !v.loading && v.error.is_none();
            (measure_panels(v, theme, inner.width), settled)
        });
        let offset = if settled {
            state.update_view(|v| {
                v.update_layout(
                    panels.iter().map(|(id, lines)| (id.as_str(), lines.len())),
                    viewport,
                );
                v.scroll_offset()
            })
        } else {
            state.read_view(|v| v.scroll_offset())
        };
        panels
            .into_iter()
            .flat_map(|(_, lines)| lines)
            .skip(offset)
            .take(viewport)
            .collect()
    }
}

impl<B: Backend> UiRenderer for TuiRenderer<B> {
    fn render(&mut self, state: &SharedState) -> Result<()> {
        // Update theme if changed
        self.theme = Theme::from_preset(state.theme());

        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let route = state.route();
        let layout = ScreenLayout::compute(area, route, self.sidebar_width);
        self.last_layout = Some(layout);

        // Panels in view, sliced to the viewport
        let panel_lines = if route == Route::Constraints {
            self.layout_panels(state, layout.content)
        } else {
            Vec::new()
        };

        let theme = &self.theme;
        let view = state.read_view(FrameView::capture);
        let context = state.current_context();
        let contexts = state.contexts();
        let api_base = state.api_base();
        let report_url = state.report_url();
        let status_message = state.status_message();
        let active_modal = state.active_modal();
        let focused = state.focused_component();
        let auth_enabled = state.auth_enabled();
        let logging_out = state.logging_out();
        let picker_selected = state.context_picker_selected();

        self.terminal.draw(|frame| {
            frame.render_widget(
                Header::new(route, &context, theme).auth(auth_enabled, logging_out),
                layout.header,
            );

            if let Some(sidebar_area) = layout.sidebar {
                let sidebar = Sidebar::new(&view.nav, theme)
                    .focused(focused == FocusedComponent::Sidebar)
                    .report_url(report_url.as_deref());
                frame.render_widget(sidebar, sidebar_area);
            }

            match route {
                Route::Constraints => {
                    if view.loading && view.empty {
                        frame.render_widget(LoadingView::new(theme), layout.content);
                    } else {
                        let mut lines = panel_lines;
                        if view.empty {
                            lines.push(Line::from(Span::styled(
                                "No constraints found in this cluster context.",
                                theme.muted(),
                            )));
                        }
                        let block = content_block(theme, focused == FocusedComponent::Content)
                            .title(Span::styled(" Constraints ", theme.heading()));
                        frame.render_widget(Paragraph::new(lines).block(block), layout.content);
                    }
                }
                Route::Home => {
                    frame.render_widget(
                        HomePage::new(view.summary, &context, &api_base, theme),
                        layout.content,
                    );
                }
                Route::ConstraintTemplates | Route::Configurations => {
                    frame.render_widget(LinkedPage::new(route, &api_base, theme), layout.content);
                }
                Route::Error => {
                    frame.render_widget(ErrorView::new(view.error.as_ref(), theme), layout.content);
                }
            }

            let position = view.nav.selected_index().map(|i| (i + 1, view.nav.len()));
            frame.render_widget(
                StatusBar::new(theme)
                    .loading(view.loading)
                    .message(status_message.as_deref())
                    .position(position),
                layout.status,
            );

            match active_modal {
                Some(ModalType::Help) => {
                    frame.render_widget(HelpModal::new(theme).auth_enabled(auth_enabled), area);
                }
                Some(ModalType::ContextPicker) => {
                    let picker =
                        ContextPickerModal::new(theme, &contexts, &context).selected(picker_selected);
                    frame.render_widget(picker, area);
                }
                None => {}
            }
        })?;

        Ok(())
    }

    fn poll_input(&mut self, state: &SharedState) -> Result<Option<Command>> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) => return Ok(Self::key_to_command(key, state)),
                Event::Mouse(mouse) => return Ok(self.mouse_to_command(mouse, state)),
                // Resize is picked up by the next render
                _ => {}
            }
        }
        Ok(None)
    }

    fn get_size(&self) -> (u16, u16) {
        let size = self.terminal.size().unwrap_or_default();
        (size.width, size.height)
    }
}
