//! Host-driven appearance source.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::SystemAppearance;
use crate::theme::ColorMode;

#[derive(Debug)]
struct State {
    prefers_dark: Option<bool>,
    watchable: bool,
    subscribers: Vec<Sender<ColorMode>>,
}

/// An appearance source whose signal is set by the host.
///
/// Clones share state: keep one clone to drive changes after handing the
/// other to a [`ThemeManager`](crate::ThemeManager). This fits hosts that
/// learn about the OS setting through their own callbacks, and tests.
///
/// # Example
///
/// ```rust
/// use themekeeper::{ManualAppearance, SystemAppearance, ColorMode};
///
/// let mut source = ManualAppearance::new(Some(false));
/// let driver = source.clone();
/// let changes = source.watch().unwrap();
///
/// driver.set_prefers_dark(true);
/// assert_eq!(changes.try_recv().unwrap(), ColorMode::Dark);
/// assert_eq!(source.prefers_dark(), Some(true));
/// ```
#[derive(Debug, Clone)]
pub struct ManualAppearance {
    state: Arc<Mutex<State>>,
}

impl ManualAppearance {
    /// Creates a source with an initial signal (`None` = cannot be queried).
    pub fn new(prefers_dark: Option<bool>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                prefers_dark,
                watchable: true,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Makes [`watch`](SystemAppearance::watch) report no change mechanism.
    pub fn without_watch(self) -> Self {
        self.lock().watchable = false;
        self
    }

    /// Updates the signal and notifies watchers if the effective mode moved.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let mut state = self.lock();
        let previous = state.prefers_dark.map(ColorMode::from_prefers_dark);
        state.prefers_dark = Some(prefers_dark);

        let mode = ColorMode::from_prefers_dark(prefers_dark);
        if previous != Some(mode) {
            state.subscribers.retain(|tx| tx.send(mode).is_ok());
        }
    }

    /// Makes the signal unqueryable without notifying watchers.
    pub fn set_unavailable(&self) {
        self.lock().prefers_dark = None;
    }

    /// Returns the number of live watchers.
    pub fn watcher_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SystemAppearance for ManualAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        self.lock().prefers_dark
    }

    fn watch(&mut self) -> Option<Receiver<ColorMode>> {
        let mut state = self.lock();
        if !state.watchable {
            return None;
        }
        let (tx, rx) = mpsc::channel();
        state.subscribers.push(tx);
        Some(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_signal() {
        let source = ManualAppearance::new(None);
        let driver = source.clone();
        assert_eq!(source.prefers_dark(), None);

        driver.set_prefers_dark(true);
        assert_eq!(source.prefers_dark(), Some(true));

        driver.set_unavailable();
        assert_eq!(source.prefers_dark(), None);
    }

    #[test]
    fn test_unchanged_signal_is_not_broadcast() {
        let mut source = ManualAppearance::new(Some(true));
        let rx = source.watch().unwrap();

        source.set_prefers_dark(true);
        assert!(rx.try_recv().is_err());

        source.set_prefers_dark(false);
        assert_eq!(rx.try_recv().unwrap(), ColorMode::Light);
    }

    #[test]
    fn test_without_watch() {
        let mut source = ManualAppearance::new(Some(false)).without_watch();
        assert!(source.watch().is_none());
        assert_eq!(source.watcher_count(), 0);
    }

    #[test]
    fn test_dropped_watchers_are_pruned() {
        let mut source = ManualAppearance::new(Some(false));
        let rx = source.watch().unwrap();
        assert_eq!(source.watcher_count(), 1);

        drop(rx);
        source.set_prefers_dark(true);
        assert_eq!(source.watcher_count(), 0);
    }
}
