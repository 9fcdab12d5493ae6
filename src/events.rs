//! Theme change notifications.
//!
//! Collaborators that need to react to theme changes (charts, embedded
//! editors, analytics) register a listener with the manager instead of
//! listening on a global event bus. Every application of a theme emits one
//! [`ThemeChange`] to every registered listener, in registration order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Serialize;

use crate::theme::ColorMode;

/// What caused a theme to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeSource {
    /// Initial application during startup.
    Startup,
    /// The user flipped or chose a theme.
    User,
    /// The OS preference changed while no explicit choice was stored.
    SystemPreference,
    /// A direct call to [`ThemeManager::apply_theme`](crate::ThemeManager::apply_theme).
    Applied,
}

/// Payload of the "theme changed" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeChange {
    /// The effective theme now rendered.
    pub theme: ColorMode,
    pub source: ChangeSource,
}

/// Handle returned by [`ThemeListeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A registered listener callback.
pub type ThemeListener = Box<dyn FnMut(&ThemeChange)>;

/// An ordered set of theme change listeners.
#[derive(Default)]
pub struct ThemeListeners {
    next_id: u64,
    entries: Vec<(ListenerId, ThemeListener)>,
}

impl ThemeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ThemeChange) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Delivers `change` to every listener.
    pub fn emit(&mut self, change: &ThemeChange) {
        for (_, listener) in &mut self.entries {
            listener(change);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ThemeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeListeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Changes collected while the manager is busy, delivered once it is free.
///
/// Listeners run while the manager is mutably borrowed, so a listener that
/// calls back into a shared `Rc<RefCell<ThemeManager>>` would find it
/// already borrowed. Subscribing [`listener`](Self::listener) instead only
/// records the change; the host calls [`deliver`](Self::deliver) after
/// releasing its borrow, and callbacks there may use the manager freely.
#[derive(Debug, Clone, Default)]
pub struct ChangeQueue {
    pending: Rc<RefCell<VecDeque<ThemeChange>>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends each change to this queue.
    pub fn listener(&self) -> impl FnMut(&ThemeChange) + 'static {
        let pending = Rc::clone(&self.pending);
        move |change| pending.borrow_mut().push_back(*change)
    }

    /// Removes the oldest pending change.
    pub fn pop(&self) -> Option<ThemeChange> {
        self.pending.borrow_mut().pop_front()
    }

    /// Hands every pending change to `deliver`, oldest first, including
    /// changes queued by `deliver` itself. Returns how many were delivered.
    pub fn deliver(&self, mut deliver: impl FnMut(&ThemeChange)) -> usize {
        let mut delivered = 0;
        while let Some(change) = self.pop() {
            deliver(&change);
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
