//! OS color-scheme signal.
//!
//! A [`SystemAppearance`] answers "does the OS prefer dark?" and, where the
//! host supports it, streams changes to that answer. Both halves are
//! optional: a source that cannot answer returns `None` and the manager
//! falls back to light; a source that cannot watch returns `None` from
//! [`SystemAppearance::watch`] and live tracking is simply skipped.
//!
//! Provided sources:
//!
//! - [`OsAppearance`] (native only): the `dark-light` crate, polled on a
//!   background thread for changes
//! - [`ManualAppearance`]: driven by the host through a shared handle
//! - `MediaQueryAppearance` (wasm32 only, in `crate::web`): the
//!   `(prefers-color-scheme: dark)` media query

mod manual;
#[cfg(not(target_arch = "wasm32"))]
mod os;

use std::sync::mpsc::Receiver;

use crate::theme::ColorMode;

pub use manual::ManualAppearance;
#[cfg(not(target_arch = "wasm32"))]
pub use os::{OsAppearance, ThemeDetector, DEFAULT_POLL_INTERVAL};

/// Source of the OS "prefers dark" signal.
pub trait SystemAppearance {
    /// Queries the current signal.
    ///
    /// Returns `None` if the host offers no way to ask.
    fn prefers_dark(&self) -> Option<bool>;

    /// Subscribes to changes of the signal.
    ///
    /// Each value sent on the returned channel is the new effective OS mode.
    /// Returns `None` if the host has no change notification mechanism.
    fn watch(&mut self) -> Option<Receiver<ColorMode>> {
        None
    }
}

impl<A: SystemAppearance + ?Sized> SystemAppearance for Box<A> {
    fn prefers_dark(&self) -> Option<bool> {
        (**self).prefers_dark()
    }

    fn watch(&mut self) -> Option<Receiver<ColorMode>> {
        (**self).watch()
    }
}

/// Resolves the OS signal to a mode, failing safe to light.
pub fn resolve_system_theme<A: SystemAppearance + ?Sized>(appearance: &A) -> ColorMode {
    match appearance.prefers_dark() {
        Some(prefers_dark) => ColorMode::from_prefers_dark(prefers_dark),
        None => {
            log::debug!("OS color scheme query unavailable, assuming light");
            ColorMode::Light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl SystemAppearance for Silent {
        fn prefers_dark(&self) -> Option<bool> {
            None
        }
    }

    #[test]
    fn test_unavailable_query_resolves_light() {
        assert_eq!(resolve_system_theme(&Silent), ColorMode::Light);
    }

    #[test]
    fn test_default_watch_is_unsupported() {
        assert!(Silent.watch().is_none());
    }

    #[test]
    fn test_boxed_source_delegates() {
        let boxed: Box<dyn SystemAppearance> = Box::new(ManualAppearance::new(Some(true)));
        assert_eq!(resolve_system_theme(&boxed), ColorMode::Dark);
    }
}
