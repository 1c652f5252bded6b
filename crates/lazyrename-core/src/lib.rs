//! Core library for lazyrename.
//!
//! Trims a fixed number of trailing characters from every file's base name
//! and appends a per-folder, zero-padded counter. Also owns the persisted
//! JSON configuration and the application state the front end edits.

/// Persisted configuration (`config.json`).
pub mod config;
/// Rename engine error types.
pub mod error;
/// Folder selection mode.
pub mod mode;
/// Folder resolution and the rename loop.
pub mod rename;
/// Application state (mode, folder rows, trim text).
pub mod state;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, resolve_config_path};
#[allow(clippy::module_name_repetitions)]
pub use error::{RenameError, RenameFailure};
pub use mode::Mode;
pub use rename::{
    FolderOutcome, RenameReport, new_file_name, parse_trim_count, rename_folder,
    rename_in_folders, resolve_folders, run_rename, split_extension,
};
pub use state::{AppState, FolderRows, MAX_FOLDER_ROWS, RowLimitReached};
