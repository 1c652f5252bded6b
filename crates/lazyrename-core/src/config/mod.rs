//! Application configuration module.
//!
//! Persists the mode, folder rows and trim text as a small JSON document
//! next to the working directory.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
