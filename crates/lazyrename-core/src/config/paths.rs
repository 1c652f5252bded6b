//! Config file location.

use std::path::{Path, PathBuf};

/// File name of the persisted configuration.
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.json`.
/// - Otherwise returns `config.json`, relative to the working directory.
#[must_use]
pub fn resolve_config_path(dir: Option<&Path>) -> PathBuf {
    dir.map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |d| d.join(CONFIG_FILE_NAME),
    )
}
