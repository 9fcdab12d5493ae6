//! Browser host (wasm32 only).
//!
//! [`mount`] builds a [`ThemeManager`] over `localStorage`, the page
//! document and the `prefers-color-scheme` media query, then wires it into
//! the page:
//!
//! - initializes now, or on `DOMContentLoaded` if the page is still loading
//! - toggles on clicks of the configured control
//! - re-enables transitions once the suppression window has passed
//! - follows OS changes while no explicit choice is stored
//! - re-broadcasts every change as a `CustomEvent` on `window` whose
//!   `detail.theme` is the effective theme
//!
//! Events are dispatched after the manager has been released, so page
//! listeners may call back into the handle.
//!
//! ```js
//! import init, { mountThemeToggle } from "./themekeeper.js";
//!
//! await init();
//! const theme = mountThemeToggle();
//! window.addEventListener("themechange", (e) => console.log(e.detail.theme, theme.currentTheme()));
//! ```

mod backends;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Window};

use crate::config::ThemeConfig;
use crate::events::{ChangeQueue, ThemeChange};
use crate::manager::{Initialization, ThemeManager};
use crate::theme::{ColorMode, Theme};

pub use backends::{BrowserDocument, LocalStorageStore, MediaQueryAppearance};

/// The manager type wired by [`mount`].
pub type BrowserThemeManager =
    ThemeManager<LocalStorageStore, MediaQueryAppearance, BrowserDocument>;

/// A mounted manager plus the changes waiting to be broadcast.
struct Host {
    manager: RefCell<BrowserThemeManager>,
    changes: ChangeQueue,
    window: Window,
    event_name: String,
}

impl Host {
    /// Runs `f` on the manager, then broadcasts what it changed.
    fn with_manager<R>(
        &self,
        f: impl FnOnce(&mut BrowserThemeManager) -> R,
    ) -> Result<R, JsValue> {
        let result = {
            let mut manager = self
                .manager
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("theme manager is busy"))?;
            f(&mut manager)
        };
        self.broadcast();
        Ok(result)
    }

    fn broadcast(&self) {
        self.changes
            .deliver(|change| dispatch_change(&self.window, &self.event_name, change));
    }
}

/// Handle to a mounted theme manager, exported to JavaScript.
#[wasm_bindgen]
#[derive(Clone)]
pub struct ThemeHandle {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl ThemeHandle {
    /// Flips between light and dark, as a click on the control would.
    pub fn toggle(&self) -> Result<String, JsValue> {
        toggle(&self.host).map(|mode| mode.as_str().to_string())
    }

    /// Applies a theme (`light`, `dark` or `system`) without persisting it.
    #[wasm_bindgen(js_name = applyTheme)]
    pub fn apply_theme(&self, theme: &str) -> Result<String, JsValue> {
        let theme: Theme = theme
            .parse()
            .map_err(|err: crate::theme::ParseThemeError| JsValue::from_str(&err.to_string()))?;
        self.host
            .with_manager(|manager| manager.apply_theme(theme))
            .map(|mode| mode.as_str().to_string())
    }

    /// The effective theme, read from the document.
    #[wasm_bindgen(js_name = currentTheme)]
    pub fn current_theme(&self) -> Result<String, JsValue> {
        let manager = self
            .host
            .manager
            .try_borrow()
            .map_err(|_| JsValue::from_str("theme manager is busy"))?;
        Ok(manager.current_effective_theme().as_str().to_string())
    }
}

impl ThemeHandle {
    /// Runs `f` on the manager from Rust. Changes it makes are broadcast
    /// once `f` returns.
    pub fn with_manager<R>(
        &self,
        f: impl FnOnce(&mut BrowserThemeManager) -> R,
    ) -> Result<R, JsValue> {
        self.host.with_manager(f)
    }
}

/// Mounts a manager with the default configuration.
#[wasm_bindgen(js_name = mountThemeToggle)]
pub fn mount_default() -> Result<ThemeHandle, JsValue> {
    mount(ThemeConfig::default())
}

/// Mounts a manager on the current page.
pub fn mount(config: ThemeConfig) -> Result<ThemeHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = BrowserDocument::new().ok_or_else(|| JsValue::from_str("no document"))?;
    let event_name = config.event_name.clone();
    let changes = ChangeQueue::new();

    let mut manager = ThemeManager::new(
        config,
        LocalStorageStore,
        MediaQueryAppearance::new(),
        document,
    );
    manager.subscribe(changes.listener());

    let host = Rc::new(Host {
        manager: RefCell::new(manager),
        changes,
        window: window.clone(),
        event_name,
    });
    let weak = Rc::downgrade(&host);
    host.with_manager(|manager| {
        manager
            .appearance_mut()
            .set_waker(move || drain_system_changes(&weak))
    })?;

    match host.with_manager(|manager| manager.initialize())? {
        Initialization::Applied(_) => attach_control(&host)?,
        Initialization::Deferred => {
            let pending = Rc::clone(&host);
            let on_ready = Closure::<dyn FnMut()>::new(move || {
                let loaded = pending.with_manager(|manager| manager.content_loaded());
                if let Err(err) = loaded.and_then(|_| attach_control(&pending)) {
                    log::warn!("could not attach theme toggle: {:?}", err);
                }
            });
            window
                .document()
                .ok_or_else(|| JsValue::from_str("no document"))?
                .add_event_listener_with_callback(
                    "DOMContentLoaded",
                    on_ready.as_ref().unchecked_ref(),
                )?;
            on_ready.forget();
        }
    }

    Ok(ThemeHandle { host })
}

fn attach_control(host: &Rc<Host>) -> Result<(), JsValue> {
    let (document, control_id) = {
        let manager = host.manager.borrow();
        (manager.document().inner().clone(), manager.config().control_id.clone())
    };
    let Some(control) = document.get_element_by_id(&control_id) else {
        return Ok(());
    };

    let target = Rc::clone(host);
    let on_click = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = toggle(&target) {
            log::warn!("theme toggle ignored: {:?}", err);
        }
    });
    control.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn toggle(host: &Rc<Host>) -> Result<ColorMode, JsValue> {
    let toggled = host.with_manager(|manager| manager.toggle_theme())?;
    schedule_restore(host, toggled.restore_after.as_millis());
    Ok(toggled.theme)
}

fn schedule_restore(host: &Rc<Host>, delay_ms: u128) {
    let weak = Rc::downgrade(host);
    let restore = Closure::once_into_js(move || {
        if let Some(host) = weak.upgrade() {
            restore_transitions(&host);
        }
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(err) = host
        .window
        .set_timeout_with_callback_and_timeout_and_arguments_0(restore.unchecked_ref(), delay)
    {
        log::warn!("could not schedule transition restore: {:?}", err);
        restore_transitions(host);
    }
}

fn restore_transitions(host: &Host) {
    if let Err(err) = host.with_manager(|manager| manager.restore_transitions()) {
        log::warn!("could not restore transitions: {:?}", err);
    }
}

fn drain_system_changes(host: &Weak<Host>) {
    let Some(host) = host.upgrade() else {
        return;
    };
    // A change can fire while the manager is busy; the value stays queued
    // and is picked up by the next drain.
    let _ = host.with_manager(|manager| manager.process_system_changes());
}

fn dispatch_change(window: &Window, event_name: &str, change: &ThemeChange) {
    let detail = js_sys::Object::new();
    let theme = JsValue::from_str(change.theme.as_str());
    if js_sys::Reflect::set(&detail, &JsValue::from_str("theme"), &theme).is_err() {
        return;
    }

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(event_name, &init) {
        Ok(event) => {
            if let Err(err) = window.dispatch_event(&event) {
                log::warn!("could not dispatch {}: {:?}", event_name, err);
            }
        }
        Err(err) => log::warn!("could not create {}: {:?}", event_name, err),
    }
}
