//! lazyrename - batch-rename files by trimming trailing characters and
//! appending a per-folder counter.

/// Operational log file.
mod logging;
/// Terminal UI components.
mod tui;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use lazyrename_core::{AppConfig, AppState, resolve_config_path};

use crate::logging::{LOG_FILE_NAME, init_logging};
use crate::tui::run_form;
use crate::tui::state::StatusMessage;

/// Trims a fixed number of trailing characters from every file name in the
/// chosen folders and appends a zero-padded counter (`img1001.jpg` ->
/// `img.0001.jpg`). Settings live in `config.json` and the log in
/// `lazy_rename.log`, both in the working directory.
#[derive(Parser, Debug)]
#[command(name = "lazyrename", about, long_about, version)]
struct Cli {}

/// Loads the saved state. A broken config leaves defaults in place.
fn load_state(config_path: &Path) -> (AppState, Option<StatusMessage>) {
    match AppConfig::load(config_path) {
        Ok(config) => (AppState::from_config(&config), None),
        Err(e) => {
            tracing::error!("Error loading config: {e:#}");
            (
                AppState::default(),
                Some(StatusMessage::error(format!("Could not load config: {e:#}"))),
            )
        }
    }
}

/// Saves the state on shutdown. Failures are reported, never fatal.
#[allow(clippy::print_stderr)] // runs after the TUI has exited
fn save_state(state: &AppState, config_path: &Path) {
    if let Err(e) = state.to_config().save(config_path) {
        tracing::error!("Error saving config: {e:#}");
        eprintln!("Could not save config: {e:#}");
    }
}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    init_logging(Path::new(LOG_FILE_NAME))?;

    let config_path = resolve_config_path(None);
    let (mut state, status) = load_state(&config_path);

    let form_result = run_form(&mut state, status, &config_path);
    shut_down(&state, &config_path, form_result)
}

/// Saves the state, then reports how the form ended.
fn shut_down(state: &AppState, config_path: &Path, form_result: Result<()>) -> Result<()> {
    save_state(state, config_path);
    form_result.inspect_err(|e| tracing::error!("Form exited with an error: {e:#}"))?;
    tracing::info!("Application closed.");
    Ok(())
}
