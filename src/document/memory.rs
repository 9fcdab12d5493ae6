//! In-memory document model.

use std::collections::{BTreeMap, HashMap};

use super::{ControlAppearance, Document, ReadyState};

/// Observable state of a toggle control in a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Class of the nested icon element, `None` if the control has no icon.
    pub icon_class: Option<String>,
    pub aria_label: Option<String>,
    pub title: Option<String>,
    has_icon: bool,
}

impl ControlState {
    /// Returns `true` if the control carries a nested icon element.
    pub fn has_icon(&self) -> bool {
        self.has_icon
    }
}

/// A document held entirely in memory.
///
/// Stands in for a DOM in headless hosts (the CLI) and in tests. Starts
/// fully loaded, with no root attributes, no controls and transitions on.
///
/// # Example
///
/// ```rust
/// use themekeeper::{Document, MemoryDocument};
///
/// let mut doc = MemoryDocument::new().with_control("theme-toggle");
/// doc.set_root_attribute("data-theme", "dark");
/// assert_eq!(doc.root_attribute("data-theme"), Some("dark"));
/// assert!(doc.control("theme-toggle").unwrap().has_icon());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    ready_state: ReadyState,
    root_attributes: BTreeMap<String, String>,
    controls: HashMap<String, ControlState>,
    transitions_enabled: bool,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            ready_state: ReadyState::Complete,
            root_attributes: BTreeMap::new(),
            controls: HashMap::new(),
            transitions_enabled: true,
        }
    }

    /// Marks the document as still loading.
    pub fn loading(mut self) -> Self {
        self.ready_state = ReadyState::Loading;
        self
    }

    /// Adds a toggle control with a nested icon element.
    pub fn with_control(mut self, id: impl Into<String>) -> Self {
        self.controls.insert(
            id.into(),
            ControlState {
                has_icon: true,
                ..ControlState::default()
            },
        );
        self
    }

    /// Adds a toggle control without an icon element.
    pub fn with_bare_control(mut self, id: impl Into<String>) -> Self {
        self.controls.insert(id.into(), ControlState::default());
        self
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn control(&self, id: &str) -> Option<&ControlState> {
        self.controls.get(id)
    }

    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_root_attribute(&mut self, name: &str) {
        self.root_attributes.remove(name);
    }

    fn has_root_attribute(&self, name: &str) -> bool {
        self.root_attributes.contains_key(name)
    }

    fn update_control(&mut self, id: &str, appearance: &ControlAppearance) -> bool {
        let Some(control) = self.controls.get_mut(id) else {
            return false;
        };
        if control.has_icon {
            control.icon_class = Some(appearance.icon_class.clone());
        }
        control.aria_label = Some(appearance.label.clone());
        control.title = Some(appearance.label.clone());
        true
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        self.transitions_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appearance() -> ControlAppearance {
        ControlAppearance {
            icon_class: "bi bi-sun-fill".into(),
            label: "Switch to light mode".into(),
        }
    }

    #[test]
    fn test_defaults() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert!(doc.transitions_enabled());
        assert!(!doc.has_root_attribute("data-theme"));
    }

    #[test]
    fn test_root_attribute_set_and_remove() {
        let mut doc = MemoryDocument::new();
        doc.set_root_attribute("data-theme", "dark");
        assert!(doc.has_root_attribute("data-theme"));

        doc.remove_root_attribute("data-theme");
        assert!(!doc.has_root_attribute("data-theme"));

        // Removing again is harmless.
        doc.remove_root_attribute("data-theme");
        assert_eq!(doc.root_attribute("data-theme"), None);
    }

    #[test]
    fn test_update_missing_control() {
        let mut doc = MemoryDocument::new();
        assert!(!doc.update_control("theme-toggle", &appearance()));
    }

    #[test]
    fn test_update_control_sets_icon_and_labels() {
        let mut doc = MemoryDocument::new().with_control("theme-toggle");
        assert!(doc.update_control("theme-toggle", &appearance()));

        let control = doc.control("theme-toggle").unwrap();
        assert_eq!(control.icon_class.as_deref(), Some("bi bi-sun-fill"));
        assert_eq!(control.aria_label.as_deref(), Some("Switch to light mode"));
        assert_eq!(control.title.as_deref(), Some("Switch to light mode"));
    }

    #[test]
    fn test_bare_control_gets_labels_only() {
        let mut doc = MemoryDocument::new().with_bare_control("theme-toggle");
        assert!(doc.update_control("theme-toggle", &appearance()));

        let control = doc.control("theme-toggle").unwrap();
        assert!(!control.has_icon());
        assert_eq!(control.icon_class, None);
        assert_eq!(control.aria_label.as_deref(), Some("Switch to light mode"));
    }

    #[test]
    fn test_loading_state() {
        let mut doc = MemoryDocument::new().loading();
        assert_eq!(doc.ready_state(), ReadyState::Loading);
        doc.set_ready_state(ReadyState::Interactive);
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
    }
}
