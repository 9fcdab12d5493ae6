//! Effective color mode.

use serde::{Deserialize, Serialize};

/// The color mode actually rendered.
///
/// Unlike [`Theme`](super::Theme), this never holds "system": it is what a
/// theme selection resolves to once the OS preference has been consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Maps a "prefers dark" signal to a mode.
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    /// Returns the other mode.
    pub fn flipped(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Returns `true` for [`ColorMode::Dark`].
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
