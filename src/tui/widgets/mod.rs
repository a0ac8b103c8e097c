//! TUI Widgets - Reusable UI components

pub mod constraint_panel;
mod error_view;
mod header;
pub mod json_tree;
mod modal;
mod pages;
mod sidebar;
mod status_bar;

pub use constraint_panel::render_panel;
pub use error_view::ErrorView;
pub use header::{version_label, Header, APP_TITLE};
pub use json_tree::json_tree_lines;
pub use modal::{ContextPickerModal, HelpModal};
pub use pages::{ConstraintSummary, HomePage, LinkedPage, LoadingView};
pub use sidebar::Sidebar;
pub use status_bar::StatusBar;
