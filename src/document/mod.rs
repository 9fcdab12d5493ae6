//! Document handle.
//!
//! The [`Document`] trait is the slice of a DOM the theme manager touches:
//!
//! - a marker attribute on the root element (present ⇒ dark)
//! - an optional toggle control, found by id, whose icon and accessible
//!   label describe the next available action
//! - a switch for CSS transitions, suppressed briefly while flipping
//! - the loading state, so initialization can wait for content
//!
//! [`MemoryDocument`] models all of this in memory; the browser
//! implementation lives in `crate::web` (wasm32 only).

mod memory;

pub use memory::{ControlState, MemoryDocument};

/// Loading phase of a document, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Structural content is not available yet.
    Loading,
    /// Content is parsed; subresources may still be loading.
    Interactive,
    /// Fully loaded.
    Complete,
}

/// What the toggle control should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlAppearance {
    /// Class list for the nested icon element.
    pub icon_class: String,
    /// Accessible label, also used as the tooltip.
    pub label: String,
}

/// The document-level state the theme manager reads and writes.
pub trait Document {
    fn ready_state(&self) -> ReadyState;

    /// Sets `name="value"` on the root element.
    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Removes `name` from the root element. Missing attributes are ignored.
    fn remove_root_attribute(&mut self, name: &str);

    fn has_root_attribute(&self, name: &str) -> bool;

    /// Restyles the control with the given id.
    ///
    /// Returns `false` when no such control exists. A control without a
    /// nested icon element still gets its label updated.
    fn update_control(&mut self, id: &str, appearance: &ControlAppearance) -> bool;

    /// Enables or disables CSS transitions on the page body.
    fn set_transitions_enabled(&mut self, enabled: bool);
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn ready_state(&self) -> ReadyState {
        (**self).ready_state()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        (**self).set_root_attribute(name, value)
    }

    fn remove_root_attribute(&mut self, name: &str) {
        (**self).remove_root_attribute(name)
    }

    fn has_root_attribute(&self, name: &str) -> bool {
        (**self).has_root_attribute(name)
    }

    fn update_control(&mut self, id: &str, appearance: &ControlAppearance) -> bool {
        (**self).update_control(id, appearance)
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        (**self).set_transitions_enabled(enabled)
    }
}
