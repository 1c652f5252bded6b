//! Application state shared by the front end and the rename engine.

use crate::config::AppConfig;
use crate::mode::Mode;

/// Upper bound on folder rows.
pub const MAX_FOLDER_ROWS: usize = 10;

/// Trim text used when nothing else is known.
pub const DEFAULT_TRIM_TEXT: &str = "4";

/// Returned by [`FolderRows::add_row`] when all rows are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimitReached;

impl std::fmt::Display for RowLimitReached {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "maximum number of folder rows ({MAX_FOLDER_ROWS}) reached")
    }
}

impl std::error::Error for RowLimitReached {}

/// Ordered folder entries as typed by the user.
///
/// Always holds between 1 and [`MAX_FOLDER_ROWS`] rows. Entries are kept
/// raw; trimming and existence checks happen at rename time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRows {
    entries: Vec<String>,
}

impl Default for FolderRows {
    fn default() -> Self {
        Self {
            entries: vec![String::new()],
        }
    }
}

impl FolderRows {
    /// Builds rows from saved entries, keeping at most [`MAX_FOLDER_ROWS`].
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let entries: Vec<String> = entries.into_iter().take(MAX_FOLDER_ROWS).collect();
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    /// All rows, in order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no more rows can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_FOLDER_ROWS
    }

    /// Row text at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Mutable row text at `index`.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut String> {
        self.entries.get_mut(index)
    }

    /// Appends an empty row and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`RowLimitReached`] if [`MAX_FOLDER_ROWS`] rows already exist.
    pub fn add_row(&mut self) -> Result<usize, RowLimitReached> {
        if self.is_full() {
            return Err(RowLimitReached);
        }
        self.entries.push(String::new());
        Ok(self.entries.len().saturating_sub(1))
    }

    /// Removes the row at `index`. The last remaining row is cleared instead.
    pub fn remove_row(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        if self.entries.len() == 1 {
            self.entries.iter_mut().for_each(String::clear);
        } else {
            self.entries.remove(index);
        }
    }

    /// Keeps the first `count` rows (never fewer than one).
    pub fn truncate(&mut self, count: usize) {
        self.entries.truncate(count.max(1));
    }
}

/// Everything the user can edit: mode, folder rows and trim text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    mode: Mode,
    rows: FolderRows,
    trim_text: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            rows: FolderRows::default(),
            trim_text: String::from(DEFAULT_TRIM_TEXT),
        }
    }
}

impl AppState {
    /// Restores state from a loaded config.
    ///
    /// The mode is applied first, then the rows are filled from the saved
    /// folder list.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let mut state = Self::default();
        state.set_mode(config.mode);
        state.rows = FolderRows::from_entries(config.folders.iter().cloned());
        state.trim_text.clone_from(&config.digits_to_trim);
        state
    }

    /// Snapshot for persistence. Every current row is saved, in order.
    #[must_use]
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            mode: self.mode,
            folders: self.rows.entries().to_vec(),
            digits_to_trim: self.trim_text.clone(),
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches mode and resets the rows to the count the mode requires.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.rows.truncate(mode.required_visible_rows());
        match mode {
            Mode::Manual => tracing::info!("Switched to manual folder selection mode."),
            Mode::Subfolders => tracing::info!("Switched to subfolders processing mode."),
        }
    }

    /// Switches to the other mode.
    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// Folder rows.
    #[must_use]
    pub const fn rows(&self) -> &FolderRows {
        &self.rows
    }

    /// Mutable folder rows.
    pub const fn rows_mut(&mut self) -> &mut FolderRows {
        &mut self.rows
    }

    /// Adds a folder row.
    ///
    /// # Errors
    ///
    /// Returns [`RowLimitReached`] if all rows are in use.
    pub fn add_row(&mut self) -> Result<usize, RowLimitReached> {
        self.rows.add_row().inspect_err(|_| {
            tracing::warn!("Maximum number of folder rows reached.");
        })
    }

    /// Removes a folder row.
    pub fn remove_row(&mut self, index: usize) {
        self.rows.remove_row(index);
        tracing::debug!("Removed folder row {index}.");
    }

    /// Raw trim text.
    #[must_use]
    pub fn trim_text(&self) -> &str {
        &self.trim_text
    }

    /// Mutable raw trim text.
    pub const fn trim_text_mut(&mut self) -> &mut String {
        &mut self.trim_text
    }
}
