//! Rename form state management.

use std::path::PathBuf;

use lazyrename_core::{AppState, Mode, RenameReport, run_rename};

/// Which form field has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Mode toggle.
    Mode,
    /// Folder row at the given index.
    Row(usize),
    /// Digits-to-trim input.
    Trim,
}

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Plain information.
    Info,
    /// Recoverable problem, nothing changed.
    Warning,
    /// Something failed.
    Error,
}

/// Message shown at the bottom of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity.
    pub kind: StatusKind,
    /// Text to display.
    pub text: String,
}

impl StatusMessage {
    /// Info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    /// Warning message.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    /// Error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// State for the rename form TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FormState {
    /// Editable application state.
    pub app: AppState,
    /// Focused field.
    pub focus: Focus,
    /// Last status message.
    pub status: Option<StatusMessage>,
    /// Where Ctrl+S writes the config.
    config_path: PathBuf,
}

impl FormState {
    /// Creates a form over `app`, focused on the first folder row.
    #[must_use]
    pub const fn new(app: AppState, config_path: PathBuf) -> Self {
        Self {
            app,
            focus: Focus::Row(0),
            status: None,
            config_path,
        }
    }

    /// Consumes the form and returns the edited state.
    #[must_use]
    pub fn into_app_state(self) -> AppState {
        self.app
    }

    /// Label of a folder row for the current mode.
    #[must_use]
    pub const fn row_label(&self, index: usize) -> &'static str {
        match (self.app.mode(), index) {
            (Mode::Subfolders, 0) => "Parent folder",
            (Mode::Subfolders, _) => "Unused",
            (Mode::Manual, _) => "Folder",
        }
    }

    /// Moves focus to the next field (wraps around).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn focus_next(&mut self) {
        let rows = self.app.rows().row_count();
        self.focus = match self.focus {
            Focus::Mode => Focus::Row(0),
            Focus::Row(i) if i + 1 < rows => Focus::Row(i + 1),
            Focus::Row(_) => Focus::Trim,
            Focus::Trim => Focus::Mode,
        };
    }

    /// Moves focus to the previous field (wraps around).
    #[allow(clippy::arithmetic_side_effects)]
    pub fn focus_prev(&mut self) {
        let rows = self.app.rows().row_count();
        self.focus = match self.focus {
            Focus::Mode => Focus::Trim,
            Focus::Row(0) => Focus::Mode,
            Focus::Row(i) => Focus::Row(i - 1),
            Focus::Trim => Focus::Row(rows.saturating_sub(1)),
        };
    }

    /// Types a character into the focused text field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(ch);
        }
    }

    /// Deletes the last character of the focused text field.
    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    /// Toggles between manual and subfolders mode.
    pub fn toggle_mode(&mut self) {
        self.app.toggle_mode();
        self.clamp_focus();
    }

    /// Adds a folder row and focuses it.
    pub fn add_row(&mut self) {
        match self.app.add_row() {
            Ok(index) => self.focus = Focus::Row(index),
            Err(e) => self.status = Some(StatusMessage::warning(e.to_string())),
        }
    }

    /// Removes the focused folder row.
    pub fn remove_focused_row(&mut self) {
        if let Focus::Row(index) = self.focus {
            self.app.remove_row(index);
            self.clamp_focus();
        }
    }

    /// Runs the rename and records the outcome in the status line.
    pub fn rename(&mut self) {
        self.status = Some(match run_rename(&self.app) {
            Ok(report) => summarize(&report),
            Err(e) => StatusMessage::error(e.to_string()),
        });
    }

    /// Writes the current state to the config file.
    pub fn save_config(&mut self) {
        self.status = Some(match self.app.to_config().save(&self.config_path) {
            Ok(()) => StatusMessage::info(format!("Saved {}", self.config_path.display())),
            Err(e) => {
                tracing::error!("Error saving config: {e:#}");
                StatusMessage::error(format!("Could not save config: {e:#}"))
            }
        });
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Mode => None,
            Focus::Row(index) => self.app.rows_mut().entry_mut(index),
            Focus::Trim => Some(self.app.trim_text_mut()),
        }
    }

    fn clamp_focus(&mut self) {
        if let Focus::Row(index) = self.focus {
            let last = self.app.rows().row_count().saturating_sub(1);
            self.focus = Focus::Row(index.min(last));
        }
    }
}

/// Turns a rename report into a status message.
fn summarize(report: &RenameReport) -> StatusMessage {
    let mut problems: Vec<String> = report
        .failures()
        .map(|failure| format!("{failure} (in {})", failure.folder.display()))
        .collect();
    problems.extend(report.folders.iter().filter_map(|outcome| {
        outcome
            .list_error
            .as_ref()
            .map(|e| format!("could not list {}: {e}", outcome.folder.display()))
    }));

    let done = format!("Renamed {} file(s).", report.total_renamed);
    if problems.is_empty() {
        StatusMessage::info(done)
    } else {
        StatusMessage::error(format!("{done} {}", problems.join("; ")))
    }
}
