//! User Commands
//!
//! Defines all possible user actions that can be triggered from the UI.

use super::types::Route;
use super::view::PanelSection;

/// User commands that can be executed
///
/// These represent user actions translated from keybindings and mouse
/// clicks. The AppService handles these commands and updates state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ========== Application Control ==========
    /// Quit the application
    Quit,

    /// Toggle help modal
    ToggleHelp,

    /// Re-fetch everything for the current context
    Reload,

    /// Log out of the backend, then reload
    Logout,

    // ========== Navigation ==========
    /// Switch to a route
    Navigate(Route),

    /// Cycle focus between sidebar and content
    FocusNext,

    /// Scroll the sidebar entry at this index into view
    ActivateNavEntry(usize),

    /// Move to the previous/next constraint
    SelectPrevious,
    SelectNext,

    // ========== Content Scrolling ==========
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    /// Collapse or expand a section of the panel in view
    ToggleSection(PanelSection),

    // ========== Context Selection ==========
    /// Open the cluster context picker
    OpenContextPicker,

    /// Switch to a cluster context
    SelectContext(String),

    // ========== Modal Navigation ==========
    ModalUp,
    ModalDown,
    ConfirmModal,
    CloseModal,
}
