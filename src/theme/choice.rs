//! Theme selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::mode::ColorMode;

/// A user-facing theme selection.
///
/// This is what gets persisted. [`Theme::System`] defers to the operating
/// system and must be resolved before it can be rendered.
///
/// # Example
///
/// ```rust
/// use themekeeper::{ColorMode, Theme};
///
/// let theme: Theme = "system".parse().unwrap();
/// assert_eq!(theme.resolve(|| ColorMode::Dark), ColorMode::Dark);
/// assert_eq!(Theme::Light.resolve(|| ColorMode::Dark), ColorMode::Light);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the OS preference.
    System,
}

impl Theme {
    /// Resolves to a concrete mode.
    ///
    /// Fixed themes map directly. For [`Theme::System`], `system` is called
    /// to read the OS preference; it is not called otherwise.
    pub fn resolve(self, system: impl FnOnce() -> ColorMode) -> ColorMode {
        match self {
            Theme::Light => ColorMode::Light,
            Theme::Dark => ColorMode::Dark,
            Theme::System => system(),
        }
    }

    /// Returns `true` if this selection follows the OS.
    pub fn is_system(self) -> bool {
        self == Theme::System
    }

    /// Returns the persisted spelling of this theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl From<ColorMode> for Theme {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Theme::Light,
            ColorMode::Dark => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of `light`, `dark` or `system`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}', expected one of: light, dark, system")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("system".parse::<Theme>(), Ok(Theme::System));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" dark\n".parse::<Theme>(), Ok(Theme::Dark));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Dark".parse::<Theme>().unwrap_err();
        assert_eq!(err, ParseThemeError("Dark".to_string()));
        assert!(err.to_string().contains("light, dark, system"));
    }

    #[test]
    fn test_display_matches_parse() {
        for theme in [Theme::Light, Theme::Dark, Theme::System] {
            assert_eq!(theme.to_string().parse::<Theme>(), Ok(theme));
        }
    }

    #[test]
    fn test_resolve_fixed_does_not_query_system() {
        let resolved = Theme::Dark.resolve(|| panic!("system queried"));
        assert_eq!(resolved, ColorMode::Dark);
    }

    #[test]
    fn test_resolve_system_uses_signal() {
        assert_eq!(Theme::System.resolve(|| ColorMode::Light), ColorMode::Light);
        assert_eq!(Theme::System.resolve(|| ColorMode::Dark), ColorMode::Dark);
    }

    #[test]
    fn test_from_color_mode() {
        assert_eq!(Theme::from(ColorMode::Dark), Theme::Dark);
        assert_eq!(Theme::from(ColorMode::Light), Theme::Light);
    }
}
