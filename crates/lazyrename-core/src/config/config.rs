//! `AppConfig` struct and JSON read/write.

use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::mode::Mode;
use crate::state::DEFAULT_TRIM_TEXT;

/// Persisted snapshot of the user's settings.
///
/// Decoding is field by field: a missing or ill-typed field falls back to
/// its default without failing the whole load.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Folder selection mode.
    pub mode: Mode,
    /// Raw folder row entries, in row order.
    pub folders: Vec<String>,
    /// Raw trim count text.
    pub digits_to_trim: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            folders: Vec::new(),
            digits_to_trim: String::from(DEFAULT_TRIM_TEXT),
        }
    }
}

impl AppConfig {
    /// Loads config from a JSON file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or is not a
    /// JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Config file not found. Using default settings.");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let Value::Object(map) = value else {
            bail!("{} does not contain a JSON object", path.display());
        };

        let config = Self::from_map(&map);
        tracing::info!("Config loaded successfully.");
        Ok(config)
    }

    /// Saves config to a JSON file, creating parent directories if needed.
    ///
    /// The whole file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize config to JSON")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Config saved successfully.");
        Ok(())
    }

    /// Decodes each known field independently.
    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            mode: map.get("mode").map_or(defaults.mode, decode_mode),
            folders: map.get("folders").map_or(defaults.folders, decode_folders),
            digits_to_trim: map
                .get("digits_to_trim")
                .map_or(defaults.digits_to_trim, decode_digits),
        }
    }
}

fn decode_mode(value: &Value) -> Mode {
    if let Some(mode) = value.as_str().and_then(Mode::from_identifier) {
        return mode;
    }
    tracing::warn!("Ignoring invalid config field mode: {value}");
    Mode::default()
}

fn decode_folders(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        tracing::warn!("Ignoring invalid config field folders: {value}");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let folder = item.as_str().map(String::from);
            if folder.is_none() {
                tracing::warn!("Ignoring non-string folder entry: {item}");
            }
            folder
        })
        .collect()
}

fn decode_digits(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => {
            tracing::warn!("Ignoring invalid config field digits_to_trim: {other}");
            String::from(DEFAULT_TRIM_TEXT)
        }
    }
}
