//! Manager configuration.
//!
//! Every name the manager shares with the outside world (storage key,
//! control id, marker attribute, event name, labels, icon classes) and the
//! transition suppression window live in [`ThemeConfig`]. All fields have
//! defaults, so a config file only needs to list what it changes:
//!
//! ```yaml
//! storage_key: my-site-theme
//! labels:
//!   to_light: Use light theme
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::theme::ColorMode;

/// Error returned when a configuration file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid theme config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Icon classes shown on the toggle control.
///
/// Each icon hints at the mode the control switches *to*: a sun while dark
/// is active, a moon while light is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlIcons {
    /// Shown while light is active.
    pub light: String,
    /// Shown while dark is active.
    pub dark: String,
}

impl Default for ControlIcons {
    fn default() -> Self {
        Self {
            light: "bi bi-moon-stars-fill".into(),
            dark: "bi bi-sun-fill".into(),
        }
    }
}

/// Accessible labels describing the next available action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlLabels {
    pub to_light: String,
    pub to_dark: String,
}

impl Default for ControlLabels {
    fn default() -> Self {
        Self {
            to_light: "Switch to light mode".into(),
            to_dark: "Switch to dark mode".into(),
        }
    }
}

/// Configuration for a [`ThemeManager`](crate::ThemeManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key of the persisted preference. The default matches the key pages
    /// already store their choice under, so existing choices carry over.
    pub storage_key: String,
    /// Id of the toggle control element.
    pub control_id: String,
    /// Attribute set on the root element while dark is active.
    pub marker_attribute: String,
    /// Value written to the marker attribute.
    pub marker_value: String,
    /// Name of the broadcast "theme changed" event.
    pub event_name: String,
    /// How long transitions stay disabled after a toggle, in milliseconds.
    pub transition_suppression_ms: u64,
    /// How often native hosts poll the OS setting, in milliseconds. Zero
    /// disables live tracking.
    pub system_poll_interval_ms: u64,
    pub icons: ControlIcons,
    pub labels: ControlLabels,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "saferoute-theme".into(),
            control_id: "theme-toggle".into(),
            marker_attribute: "data-theme".into(),
            marker_value: "dark".into(),
            event_name: "themechange".into(),
            transition_suppression_ms: 50,
            system_poll_interval_ms: 2000,
            icons: ControlIcons::default(),
            labels: ControlLabels::default(),
        }
    }
}

impl ThemeConfig {
    /// Parses a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn transition_suppression(&self) -> Duration {
        Duration::from_millis(self.transition_suppression_ms)
    }

    pub fn system_poll_interval(&self) -> Duration {
        Duration::from_millis(self.system_poll_interval_ms)
    }

    /// Label describing what activating the control does while `current`
    /// is rendered.
    pub fn label_for(&self, current: ColorMode) -> &str {
        match current {
            ColorMode::Dark => &self.labels.to_light,
            ColorMode::Light => &self.labels.to_dark,
        }
    }

    /// Icon class shown while `current` is rendered.
    pub fn icon_for(&self, current: ColorMode) -> &str {
        match current {
            ColorMode::Dark => &self.icons.dark,
            ColorMode::Light => &self.icons.light,
        }
    }
}
