//! TUI module for the rename form.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod form;
/// Form state types.
pub mod state;
mod ui;

pub use form::run_form;
