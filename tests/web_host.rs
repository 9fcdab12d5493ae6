//! Browser host behavior against a real page.
//!
//! Run with `wasm-pack test --headless --firefox`. Every test mounts its
//! own manager with its own storage key, control id, marker attribute and
//! event name, so tests sharing the page do not see each other's state.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use themekeeper::web::{self, LocalStorageStore, MediaQueryAppearance, ThemeHandle};
use themekeeper::{PreferenceStore, SystemAppearance, ThemeConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{CustomEvent, Element, HtmlElement, Storage, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn local_storage() -> Storage {
    window().local_storage().unwrap().unwrap()
}

fn config(tag: &str) -> ThemeConfig {
    ThemeConfig {
        storage_key: format!("themekeeper-{tag}"),
        control_id: format!("toggle-{tag}"),
        marker_attribute: format!("data-theme-{tag}"),
        event_name: format!("themechange-{tag}"),
        ..ThemeConfig::default()
    }
}

/// Adds `<button id=..><i></i></button>` to the body and clears any
/// stored choice under the test's key.
fn prepare_page(config: &ThemeConfig, stored: Option<&str>) -> Element {
    let document = window().document().unwrap();
    let body = document.body().unwrap();
    body.insert_adjacent_html(
        "beforeend",
        &format!(r#"<button id="{}"><i></i></button>"#, config.control_id),
    )
    .unwrap();

    let storage = local_storage();
    match stored {
        Some(value) => storage.set_item(&config.storage_key, value).unwrap(),
        None => storage.remove_item(&config.storage_key).unwrap(),
    }
    document.get_element_by_id(&config.control_id).unwrap()
}

fn marker(config: &ThemeConfig) -> Option<String> {
    window()
        .document()
        .unwrap()
        .document_element()
        .unwrap()
        .get_attribute(&config.marker_attribute)
}

/// Collects `detail.theme` of every event named `event_name`, running
/// `react` with the handle inside the listener.
fn record_events(
    event_name: &str,
    handle: &ThemeHandle,
    mut react: impl FnMut(&ThemeHandle) + 'static,
) -> Rc<RefCell<Vec<String>>> {
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let handle = handle.clone();
    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let detail = event.dyn_into::<CustomEvent>().unwrap().detail();
        let theme = Reflect::get(&detail, &JsValue::from_str("theme")).unwrap();
        sink.borrow_mut().push(theme.as_string().unwrap());
        react(&handle);
    });
    window()
        .add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())
        .unwrap();
    listener.forget();
    seen
}

/// Replaces `Storage.prototype.getItem`/`setItem` with functions that
/// throw, as privacy modes do, for the duration of `f`.
fn with_throwing_storage<R>(f: impl FnOnce() -> R) -> R {
    let storage_class = Reflect::get(&js_sys::global(), &JsValue::from_str("Storage")).unwrap();
    let prototype = Reflect::get(&storage_class, &JsValue::from_str("prototype")).unwrap();
    let thrower = js_sys::Function::new_no_args(
        "throw new DOMException('The operation is insecure.', 'SecurityError');",
    );

    let names = ["getItem", "setItem"];
    let originals: Vec<JsValue> = names
        .iter()
        .map(|name| Reflect::get(&prototype, &JsValue::from_str(name)).unwrap())
        .collect();
    for name in names {
        Reflect::set(&prototype, &JsValue::from_str(name), &thrower).unwrap();
    }

    let result = f();

    for (name, original) in names.iter().zip(&originals) {
        Reflect::set(&prototype, &JsValue::from_str(name), original).unwrap();
    }
    result
}

#[wasm_bindgen_test]
fn mount_marks_page_and_labels_control_from_stored_dark() {
    let config = config("stored-dark");
    let control = prepare_page(&config, Some("dark"));

    let handle = web::mount(config.clone()).unwrap();

    assert_eq!(marker(&config).as_deref(), Some("dark"));
    assert_eq!(handle.current_theme().unwrap(), "dark");
    assert_eq!(
        control.get_attribute("aria-label").as_deref(),
        Some("Switch to light mode")
    );
    assert_eq!(control.get_attribute("title").as_deref(), Some("Switch to light mode"));
    let icon = control.query_selector("i").unwrap().unwrap();
    assert_eq!(icon.class_name(), "bi bi-sun-fill");
}

#[wasm_bindgen_test]
fn click_on_control_toggles_and_persists() {
    let config = config("click");
    let control = prepare_page(&config, Some("light"));
    let _handle = web::mount(config.clone()).unwrap();
    assert_eq!(marker(&config), None);

    control.dyn_into::<HtmlElement>().unwrap().click();

    assert_eq!(marker(&config).as_deref(), Some("dark"));
    assert_eq!(
        local_storage().get_item(&config.storage_key).unwrap().as_deref(),
        Some("dark")
    );
    let body_transition = window()
        .document()
        .unwrap()
        .body()
        .unwrap()
        .style()
        .get_property_value("transition")
        .unwrap();
    assert_eq!(body_transition, "none");
}

#[wasm_bindgen_test]
fn dispatched_event_carries_effective_theme() {
    let config = config("event");
    prepare_page(&config, Some("light"));
    let handle = web::mount(config.clone()).unwrap();
    let seen = record_events(&config.event_name, &handle, |_| {});

    let toggled = handle.toggle().unwrap();
    handle.apply_theme("light").unwrap();

    assert_eq!(toggled, "dark");
    assert_eq!(*seen.borrow(), vec!["dark".to_string(), "light".to_string()]);
}

#[wasm_bindgen_test]
fn event_listener_can_read_theme_from_handle() {
    let config = config("reentrant-read");
    prepare_page(&config, Some("light"));
    let handle = web::mount(config.clone()).unwrap();

    let reads: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&reads);
    record_events(&config.event_name, &handle, move |handle| {
        sink.borrow_mut().push(handle.current_theme().unwrap());
    });

    handle.toggle().unwrap();

    assert_eq!(*reads.borrow(), vec!["dark".to_string()]);
}

#[wasm_bindgen_test]
fn event_listener_can_toggle_through_handle() {
    let config = config("reentrant-toggle");
    prepare_page(&config, Some("light"));
    let handle = web::mount(config.clone()).unwrap();

    let toggled_back = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&toggled_back);
    let seen = record_events(&config.event_name, &handle, move |handle| {
        if !flag.replace(true) {
            handle.toggle().unwrap();
        }
    });

    handle.toggle().unwrap();

    assert_eq!(*seen.borrow(), vec!["dark".to_string(), "light".to_string()]);
    assert_eq!(handle.current_theme().unwrap(), "light");
    assert_eq!(marker(&config), None);
}

#[wasm_bindgen_test]
fn throwing_local_storage_still_applies_theme() {
    let config = config("throwing-storage");
    prepare_page(&config, None);

    let (mounted, toggled) = with_throwing_storage(|| {
        let handle = web::mount(config.clone()).unwrap();
        let mounted = handle.current_theme().unwrap();
        (mounted, handle.toggle().unwrap())
    });

    assert_ne!(mounted, toggled);
    let expected = if toggled == "dark" { Some("dark") } else { None };
    assert_eq!(marker(&config).as_deref(), expected);
    assert_eq!(local_storage().get_item(&config.storage_key).unwrap(), None);
}

#[wasm_bindgen_test]
fn local_storage_store_round_trips_through_window_storage() {
    let mut store = LocalStorageStore;
    store.write("themekeeper-store", "system").unwrap();

    assert_eq!(store.read("themekeeper-store").unwrap().as_deref(), Some("system"));
    assert_eq!(
        local_storage().get_item("themekeeper-store").unwrap().as_deref(),
        Some("system")
    );
}

#[wasm_bindgen_test]
fn media_query_reports_a_preference() {
    let mut appearance = MediaQueryAppearance::new();
    let expected = window()
        .match_media("(prefers-color-scheme: dark)")
        .unwrap()
        .unwrap()
        .matches();

    assert_eq!(appearance.prefers_dark(), Some(expected));
    assert!(appearance.watch().is_some());
}
