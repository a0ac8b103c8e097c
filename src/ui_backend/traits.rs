//! UI Renderer Trait
//!
//! Defines the interface that all frontends must implement.

use anyhow::Result;

use super::commands::Command;
use super::state::SharedState;

/// Trait that all UI renderers must implement
///
/// This abstracts the UI layer from business logic, so the controller loop
/// can drive a real terminal or a test backend the same way.
pub trait UiRenderer {
    /// Render the current application state
    ///
    /// Called every loop iteration. Renderers also report measured panel
    /// geometry back into the view state here.
    fn render(&mut self, state: &SharedState) -> Result<()>;

    /// Poll for user input and translate it into a command
    fn poll_input(&mut self, state: &SharedState) -> Result<Option<Command>>;

    /// Get the current UI size
    ///
    /// Returns (width, height) in terminal columns/rows.
    fn get_size(&self) -> (u16, u16);

    /// Check if the UI should quit
    fn should_quit(&self, state: &SharedState) -> bool {
        state.should_quit()
    }
}
