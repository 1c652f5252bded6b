//! Rename form TUI main loop.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use lazyrename_core::AppState;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{Focus, FormState, StatusMessage};
use super::ui;

/// Runs the rename form until the user quits.
///
/// `status` is shown on the first frame (e.g. a config load failure). Edits
/// made before an event handling error are still written back to `app`.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_form(
    app: &mut AppState,
    status: Option<StatusMessage>,
    config_path: &Path,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = edit_state(app, status, config_path, |state| {
        run_event_loop(&mut terminal, state)
    });

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Lets `edit` work on a form over `app`. The edits are written back to
/// `app` whether or not `edit` fails.
fn edit_state<F>(
    app: &mut AppState,
    status: Option<StatusMessage>,
    config_path: &Path,
    edit: F,
) -> Result<()>
where
    F: FnOnce(&mut FormState) -> Result<()>,
{
    let mut state = FormState::new(std::mem::take(app), config_path.to_path_buf());
    state.status = status;

    let result = edit(&mut state);
    *app = state.into_app_state();
    result
}

/// Main event loop. Returns when the user quits.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut FormState,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && handle_key(state, key.code, key.modifiers)
        {
            return Ok(());
        }
    }
}

/// Applies one key press. Returns `true` to quit.
fn handle_key(state: &mut FormState, key: KeyCode, modifiers: KeyModifiers) -> bool {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('c' | 'q') => return true,
            KeyCode::Char('r') => state.rename(),
            KeyCode::Char('s') => state.save_config(),
            KeyCode::Char('n') => state.add_row(),
            KeyCode::Char('d') => state.remove_focused_row(),
            _ => {}
        }
        return false;
    }

    match key {
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::Down => state.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.focus_prev(),
        KeyCode::Enter | KeyCode::Char(' ') if state.focus == Focus::Mode => state.toggle_mode(),
        KeyCode::Enter => state.focus_next(),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    false
}
