//! Terminal setup and teardown
//!
//! Raw mode, alternate screen and mouse capture are enabled for the
//! dashboard and always restored, including when the loop errors out or
//! a panic unwinds.

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<CrosstermTerminal> {
    if !crossterm::tty::IsTty::is_tty(&stdout()) {
        anyhow::bail!("The dashboard requires a real terminal (TTY).");
    }

    enable_raw_mode().context("Failed to enable terminal raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal backend")?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_raw();
        default_hook(info);
    }));

    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut CrosstermTerminal) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
}

fn restore_raw() {
    disable_raw_mode().ok();
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture).ok();
}
