//! Folder selection mode.

use serde::Serialize;

/// How the effective folder set is derived from the folder rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every row is a folder to process.
    #[default]
    Manual,
    /// The first row is a parent; its immediate subdirectories are processed.
    Subfolders,
}

impl Mode {
    /// Number of folder rows shown right after switching to this mode.
    #[must_use]
    pub const fn required_visible_rows(self) -> usize {
        match self {
            Self::Manual | Self::Subfolders => 1,
        }
    }

    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Subfolders,
            Self::Subfolders => Self::Manual,
        }
    }

    /// Persisted identifier (`"manual"` / `"subfolders"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Subfolders => "subfolders",
        }
    }

    /// Parses a persisted identifier. Unknown values yield `None`.
    #[must_use]
    pub fn from_identifier(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(Self::Manual),
            "subfolders" => Some(Self::Subfolders),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_both_modes_show_one_row() {
        // Arrange & Act & Assert
        assert_eq!(Mode::Manual.required_visible_rows(), 1);
        assert_eq!(Mode::Subfolders.required_visible_rows(), 1);
    }

    #[test]
    fn test_toggle_is_reversible() {
        // Arrange
        let mode = Mode::Manual;

        // Act
        let toggled = mode.toggled();

        // Assert
        assert_eq!(toggled, Mode::Subfolders);
        assert_eq!(toggled.toggled(), Mode::Manual);
    }

    #[test]
    fn test_serialized_identifier_matches_display() {
        // Arrange & Act
        let json = serde_json::to_string(&Mode::Subfolders).unwrap();

        // Assert
        assert_eq!(json, format!("\"{}\"", Mode::Subfolders));
        assert_eq!(Mode::Manual.to_string(), "manual");
        assert_eq!(Mode::from_identifier(Mode::Subfolders.as_str()), Some(Mode::Subfolders));
    }

    #[test]
    fn test_from_identifier_unknown() {
        // Arrange & Act & Assert
        assert_eq!(Mode::from_identifier("recursive"), None);
        assert_eq!(Mode::from_identifier("Manual"), None);
        assert_eq!(
            Mode::from_identifier("subfolders"),
            Some(Mode::Subfolders)
        );
    }
}
