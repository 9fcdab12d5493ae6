//! Browser implementations of the manager's seams.

use std::sync::mpsc::{self, Receiver};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MediaQueryList, MediaQueryListEvent};

use crate::appearance::SystemAppearance;
use crate::document::{ControlAppearance, Document, ReadyState};
use crate::storage::{PreferenceStore, StorageError};
use crate::theme::ColorMode;

pub(crate) const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

fn rejected(value: JsValue) -> StorageError {
    StorageError::Rejected(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

/// `window.localStorage`.
///
/// Accessing `localStorage` throws in some privacy modes and sandboxed
/// frames; those cases surface as [`StorageError::Unavailable`] or
/// [`StorageError::Rejected`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(rejected)?
            .ok_or(StorageError::Unavailable)
    }
}

impl PreferenceStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(rejected)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(rejected)
    }
}

/// The page's `document`.
///
/// The marker goes on `<html>`, the control is looked up by id on every
/// update (so it may be added late), its icon is the first nested `<i>`,
/// and transitions are toggled through `body.style.transition`.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    /// Returns `None` outside a window context (workers).
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }
}

impl Document for BrowserDocument {
    fn ready_state(&self) -> ReadyState {
        match self.document.ready_state().as_str() {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = self.document.document_element() {
            if let Err(err) = root.set_attribute(name, value) {
                log::warn!("could not set {} on <html>: {:?}", name, err);
            }
        }
    }

    fn remove_root_attribute(&mut self, name: &str) {
        if let Some(root) = self.document.document_element() {
            if let Err(err) = root.remove_attribute(name) {
                log::warn!("could not remove {} from <html>: {:?}", name, err);
            }
        }
    }

    fn has_root_attribute(&self, name: &str) -> bool {
        self.document
            .document_element()
            .map_or(false, |root| root.has_attribute(name))
    }

    fn update_control(&mut self, id: &str, appearance: &ControlAppearance) -> bool {
        let Some(control) = self.document.get_element_by_id(id) else {
            return false;
        };
        if let Ok(Some(icon)) = control.query_selector("i") {
            icon.set_class_name(&appearance.icon_class);
        }
        for attribute in ["aria-label", "title"] {
            if let Err(err) = control.set_attribute(attribute, &appearance.label) {
                log::warn!("could not set {} on #{}: {:?}", attribute, id, err);
            }
        }
        true
    }

    fn set_transitions_enabled(&mut self, enabled: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if enabled {
            style.remove_property("transition").map(|_| ())
        } else {
            style.set_property("transition", "none")
        };
        if let Err(err) = result {
            log::warn!("could not toggle body transitions: {:?}", err);
        }
    }
}

/// The `(prefers-color-scheme: dark)` media query.
///
/// Changes are observed with a `change` listener, or the legacy
/// `addListener` on browsers without `EventTarget` media queries. The
/// listener lives as long as this value.
pub struct MediaQueryAppearance {
    query: Option<MediaQueryList>,
    listener: Option<Closure<dyn FnMut(MediaQueryListEvent)>>,
    waker: Option<Box<dyn Fn()>>,
}

impl MediaQueryAppearance {
    pub fn new() -> Self {
        let query = web_sys::window()
            .and_then(|window| window.match_media(DARK_SCHEME_QUERY).ok().flatten());
        Self {
            query,
            listener: None,
            waker: None,
        }
    }

    /// Registers a callback run after each change has been queued, so the
    /// host can drain it. Must be set before watching starts.
    pub fn set_waker(&mut self, waker: impl Fn() + 'static) {
        self.waker = Some(Box::new(waker));
    }
}

impl Default for MediaQueryAppearance {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemAppearance for MediaQueryAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        self.query.as_ref().map(MediaQueryList::matches)
    }

    #[allow(deprecated)]
    fn watch(&mut self) -> Option<Receiver<ColorMode>> {
        let query = self.query.as_ref()?;
        let (tx, rx) = mpsc::channel();
        let waker = self.waker.take();
        let listener = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
            move |event: MediaQueryListEvent| {
                if tx.send(ColorMode::from_prefers_dark(event.matches())).is_ok() {
                    if let Some(wake) = &waker {
                        wake();
                    }
                }
            },
        );

        let callback = listener.as_ref().unchecked_ref();
        if query
            .add_event_listener_with_callback("change", callback)
            .is_err()
        {
            query.add_listener_with_opt_callback(Some(callback)).ok()?;
        }
        self.listener = Some(listener);
        Some(rx)
    }
}

impl std::fmt::Debug for MediaQueryAppearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaQueryAppearance")
            .field("supported", &self.query.is_some())
            .field("watching", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
