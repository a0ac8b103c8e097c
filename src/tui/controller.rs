//! TUI Controller - Orchestrates AppService and TuiRenderer
//!
//! The controller owns both the business logic (AppService) and the UI (TuiRenderer),
//! coordinating between them via Commands and AppEvents.

use anyhow::Result;
use ratatui::backend::Backend;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::ui_backend::{AppEvent, AppService, Command, SharedState, UiRenderer};

use super::renderer::TuiRenderer;

/// TUI Controller
///
/// Main event loop coordinator that:
/// 1. Renders UI with current state
/// 2. Polls input from renderer
/// 3. Processes commands through AppService
/// 4. Applies async events from background fetches
pub struct TuiController<B: Backend> {
    /// Application service (business logic)
    service: AppService,
    /// UI renderer
    renderer: TuiRenderer<B>,
    /// Event receiver for async AppEvents
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<B: Backend> TuiController<B> {
    /// Create a new TUI controller
    pub fn new(
        service: AppService,
        renderer: TuiRenderer<B>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            service,
            renderer,
            event_rx,
        }
    }

    pub fn state(&self) -> &SharedState {
        self.service.state()
    }

    pub fn renderer(&self) -> &TuiRenderer<B> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TuiRenderer<B> {
        &mut self.renderer
    }

    /// Run the main event loop
    pub async fn run(&mut self) -> Result<()> {
        self.service.start();
        let state = self.service.state().clone();

        loop {
            // 1. Render current state
            self.renderer.render(&state)?;

            // 2. Poll for user input (waits up to one tick)
            if let Some(command) = self.renderer.poll_input(&state)? {
                self.handle_command(command)?;
            }

            // 3. Process async events (non-blocking)
            self.poll_events();

            // 4. Check quit condition
            if self.renderer.should_quit(&state) {
                break;
            }

            // Let spawned fetches make progress between frames
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        tracing::info!("Dashboard loop finished");
        Ok(())
    }

    /// Apply one command, as if typed by the user
    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        self.service.handle_command(command)
    }

    /// Drain pending background events; returns how many were applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.service.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Render one frame without polling input
    pub fn render_once(&mut self) -> Result<()> {
        let state = self.service.state().clone();
        self.renderer.render(&state)
    }
}
