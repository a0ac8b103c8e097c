//! Terminal dashboard
//!
//! Frontend for the `ui_backend` layer: `TuiRenderer` draws `SharedState`
//! and maps keys and mouse events to `Command`s, `TuiController` runs the
//! loop that ties the renderer, the service and background events together.
//!
//! ## Layout
//! - Header: title, route tabs, cluster context
//! - Sidebar: constraint list with violation badges (constraints route only)
//! - Content: constraint panels, home summary or error view
//! - Status bar: loading state, messages, key hints

mod controller;
mod renderer;
pub mod terminal;
pub mod theme;
pub(crate) mod utils;
pub mod widgets;

pub use controller::TuiController;
pub use renderer::TuiRenderer;
pub use terminal::{restore_terminal, setup_terminal, CrosstermTerminal};
pub use theme::{Theme, ThemePreset};
