//! OS color scheme detection through `dark-light`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::Duration;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use super::SystemAppearance;
use crate::theme::ColorMode;

/// How often the watcher thread re-reads the OS setting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// A function returning the OS color mode.
pub type ThemeDetector = fn() -> ColorMode;

/// Reads the OS light/dark setting.
///
/// Desktop platforms do not expose a portable change notification, so
/// [`watch`](SystemAppearance::watch) spawns a thread that polls the
/// detector and sends a value whenever it differs from the last one. The
/// thread stops when this source is dropped or watches again, and also
/// the first time it cannot deliver a change because the receiver is gone.
///
/// The detector can be overridden, which is useful for testing or when a
/// specific mode should be forced.
#[derive(Debug)]
pub struct OsAppearance {
    detector: ThemeDetector,
    poll_interval: Duration,
    watcher: Option<WatcherGuard>,
}

/// Stops the polling thread when dropped.
#[derive(Debug)]
struct WatcherGuard {
    stop: Arc<AtomicBool>,
    thread: Thread,
}

impl Drop for WatcherGuard {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        self.thread.unpark();
    }
}

impl OsAppearance {
    /// Creates a source backed by the real OS detector.
    pub fn new() -> Self {
        Self {
            detector: os_theme_detector,
            poll_interval: DEFAULT_POLL_INTERVAL,
            watcher: None,
        }
    }

    /// Replaces the detector used to read the OS setting.
    pub fn with_detector(mut self, detector: ThemeDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets the watcher poll interval. A zero interval disables watching.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether a polling thread started by this source is running.
    pub fn is_polling(&self) -> bool {
        self.watcher
            .as_ref()
            .map_or(false, |guard| !guard.stop.load(Ordering::SeqCst))
    }
}

// A clone shares the detector settings but not the running watcher.
impl Clone for OsAppearance {
    fn clone(&self) -> Self {
        Self {
            detector: self.detector,
            poll_interval: self.poll_interval,
            watcher: None,
        }
    }
}

impl Default for OsAppearance {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemAppearance for OsAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        Some((self.detector)().is_dark())
    }

    fn watch(&mut self) -> Option<Receiver<ColorMode>> {
        if self.poll_interval.is_zero() {
            return None;
        }

        // Stop any earlier watcher before starting a new one.
        self.watcher = None;

        let (tx, rx) = mpsc::channel();
        let detector = self.detector;
        let interval = self.poll_interval;
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name("theme-watch".into())
            .spawn(move || {
                let mut last = detector();
                loop {
                    thread::park_timeout(interval);
                    if stopped.load(Ordering::SeqCst) {
                        break;
                    }
                    let current = detector();
                    if current != last {
                        if tx.send(current).is_err() {
                            break;
                        }
                        last = current;
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.watcher = Some(WatcherGuard {
                    stop,
                    thread: handle.thread().clone(),
                });
                Some(rx)
            }
            Err(err) => {
                log::warn!("could not start OS theme watcher: {}", err);
                None
            }
        }
    }
}

fn os_theme_detector() -> ColorMode {
    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        OsThemeMode::Light => ColorMode::Light,
    }
}
