//! Transition suppression window.

use std::time::Duration;

use web_time::Instant;

/// Tracks the short window during which CSS transitions stay disabled
/// after a theme flip.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TransitionGate {
    suppressed_at: Option<Instant>,
}

impl TransitionGate {
    /// Starts (or restarts) a suppression window.
    pub(crate) fn suppress(&mut self, now: Instant) {
        self.suppressed_at = Some(now);
    }

    pub(crate) fn is_suppressed(&self) -> bool {
        self.suppressed_at.is_some()
    }

    /// Ends the window if it has lasted at least `window`.
    ///
    /// Returns `true` if the window ended on this call.
    pub(crate) fn expire(&mut self, now: Instant, window: Duration) -> bool {
        match self.suppressed_at {
            Some(start) if now.saturating_duration_since(start) >= window => {
                self.suppressed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Ends the window unconditionally. Returns `true` if one was open.
    pub(crate) fn clear(&mut self) -> bool {
        self.suppressed_at.take().is_some()
    }
}
