//! The theme preference manager.
//!
//! [`ThemeManager`] resolves, applies, persists and keeps in sync the active
//! theme. It owns its collaborators, injected at construction:
//!
//! - a [`PreferenceStore`] for the user's explicit choice
//! - a [`SystemAppearance`] for the OS "prefers dark" signal
//! - a [`Document`] carrying the marker attribute and the toggle control
//!
//! # Resolution
//!
//! An explicit stored choice always wins. Without one, the OS signal decides
//! and live OS changes are followed. A stored `system` value behaves like no
//! choice at all: it resolves against the OS and keeps following it.
//!
//! # Failure handling
//!
//! Nothing here fails outward. Storage errors are logged and the choice is
//! kept in memory for the rest of the session; a missing OS signal means
//! light; a missing toggle control means the control is simply not updated.
//!
//! # Example
//!
//! ```rust
//! use themekeeper::{
//!     ColorMode, ManualAppearance, MemoryDocument, MemoryStore, ThemeConfig, ThemeManager,
//! };
//!
//! let os = ManualAppearance::new(Some(true));
//! let document = MemoryDocument::new().with_control("theme-toggle");
//! let mut manager =
//!     ThemeManager::new(ThemeConfig::default(), MemoryStore::new(), os.clone(), document);
//!
//! manager.initialize();
//! assert_eq!(manager.current_effective_theme(), ColorMode::Dark);
//!
//! manager.toggle_theme();
//! assert_eq!(manager.current_effective_theme(), ColorMode::Light);
//! assert_eq!(manager.store().get("saferoute-theme"), Some("light"));
//! ```

mod transition;

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use web_time::Instant;

use crate::appearance::{self, SystemAppearance};
use crate::config::ThemeConfig;
use crate::document::{ControlAppearance, Document, ReadyState};
use crate::events::{ChangeSource, ListenerId, ThemeChange, ThemeListeners};
use crate::storage::PreferenceStore;
use crate::theme::{ColorMode, Theme};

use transition::TransitionGate;

/// Result of [`ThemeManager::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// The theme was applied.
    Applied(ColorMode),
    /// The document is still loading; call
    /// [`ThemeManager::content_loaded`] once its content is available.
    Deferred,
}

/// Result of a user theme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// The theme now rendered and stored.
    pub theme: ColorMode,
    /// Whether the choice reached the preference store.
    pub persisted: bool,
    /// How long transitions stay suppressed. Hosts with a timer should call
    /// [`ThemeManager::restore_transitions`] after this delay.
    pub restore_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Deferred,
    Ready,
}

/// Owns theme state and keeps the document, the store and listeners in
/// sync with it.
pub struct ThemeManager<S, A, D> {
    config: ThemeConfig,
    store: S,
    appearance: A,
    document: D,
    listeners: ThemeListeners,
    // Explicit choice that could not be persisted; wins over the store.
    unpersisted: Option<Theme>,
    system_changes: Option<Receiver<ColorMode>>,
    transitions: TransitionGate,
    lifecycle: Lifecycle,
}

impl<S, A, D> ThemeManager<S, A, D>
where
    S: PreferenceStore,
    A: SystemAppearance,
    D: Document,
{
    /// Creates a manager. Nothing is read or applied until
    /// [`initialize`](Self::initialize).
    pub fn new(config: ThemeConfig, store: S, appearance: A, document: D) -> Self {
        Self {
            config,
            store,
            appearance,
            document,
            listeners: ThemeListeners::new(),
            unpersisted: None,
            system_changes: None,
            transitions: TransitionGate::default(),
            lifecycle: Lifecycle::Created,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Reads the stored preference (falling back to the OS signal), applies
    /// it, updates the toggle control and starts watching the OS signal.
    ///
    /// If the document is still loading, nothing happens until
    /// [`content_loaded`](Self::content_loaded) is called.
    pub fn initialize(&mut self) -> Initialization {
        if self.document.ready_state() == ReadyState::Loading {
            log::debug!("document still loading, deferring theme initialization");
            self.lifecycle = Lifecycle::Deferred;
            return Initialization::Deferred;
        }
        Initialization::Applied(self.run_initialize())
    }

    /// Runs a deferred initialization.
    ///
    /// Returns the applied theme, or `None` if initialization was not
    /// pending.
    pub fn content_loaded(&mut self) -> Option<ColorMode> {
        if self.lifecycle != Lifecycle::Deferred {
            return None;
        }
        Some(self.run_initialize())
    }

    /// Returns `true` once a theme has been applied at startup.
    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    fn run_initialize(&mut self) -> ColorMode {
        let theme = self
            .stored_preference()
            .unwrap_or_else(|| Theme::from(self.resolve_system_theme()));
        let effective = self.apply(theme, ChangeSource::Startup);
        self.watch_system_preference();
        self.lifecycle = Lifecycle::Ready;
        log::info!("theme initialized: {} (selection: {})", effective, theme);
        effective
    }

    // =========================================================================
    // Resolution and application
    // =========================================================================

    /// Queries the OS signal, failing safe to light.
    pub fn resolve_system_theme(&self) -> ColorMode {
        appearance::resolve_system_theme(&self.appearance)
    }

    /// Applies `theme` to the document and notifies listeners.
    ///
    /// `system` is resolved against the OS signal first. The marker
    /// attribute and the toggle control are updated together before any
    /// listener runs. Nothing is persisted.
    pub fn apply_theme(&mut self, theme: Theme) -> ColorMode {
        self.apply(theme, ChangeSource::Applied)
    }

    fn apply(&mut self, theme: Theme, source: ChangeSource) -> ColorMode {
        let effective = self.resolve(theme);
        self.render(effective);
        self.listeners.emit(&ThemeChange {
            theme: effective,
            source,
        });
        effective
    }

    fn render(&mut self, effective: ColorMode) {
        let marker = self.config.marker_attribute.as_str();
        match effective {
            ColorMode::Dark => self
                .document
                .set_root_attribute(marker, &self.config.marker_value),
            ColorMode::Light => self.document.remove_root_attribute(marker),
        }
        self.refresh_control(effective);
    }

    fn resolve(&self, theme: Theme) -> ColorMode {
        theme.resolve(|| self.resolve_system_theme())
    }

    /// The effective theme, read from the document's marker attribute.
    pub fn current_effective_theme(&self) -> ColorMode {
        ColorMode::from_prefers_dark(
            self.document
                .has_root_attribute(&self.config.marker_attribute),
        )
    }

    // =========================================================================
    // User choice
    // =========================================================================

    /// Flips between light and dark, persists the result and briefly
    /// suppresses transitions.
    ///
    /// The starting point is the explicit light/dark choice. Without one
    /// (nothing stored, or `system`), it is the theme currently shown, which
    /// is light until something marks the document dark. `system` is never
    /// toggled into.
    pub fn toggle_theme(&mut self) -> Toggled {
        let current = match self.stored_preference() {
            Some(Theme::Light) => ColorMode::Light,
            Some(Theme::Dark) => ColorMode::Dark,
            Some(Theme::System) | None => self.current_effective_theme(),
        };
        self.commit_choice(current.flipped())
    }

    /// Makes `mode` the explicit choice, with the same effects as a toggle
    /// landing on it.
    pub fn select_theme(&mut self, mode: ColorMode) -> Toggled {
        self.commit_choice(mode)
    }

    fn commit_choice(&mut self, mode: ColorMode) -> Toggled {
        let theme = Theme::from(mode);
        self.apply(theme, ChangeSource::User);
        let persisted = self.persist(theme);
        self.suppress_transitions(Instant::now());
        Toggled {
            theme: mode,
            persisted,
            restore_after: self.config.transition_suppression(),
        }
    }

    /// Restyles the toggle control to offer the switch away from `theme`.
    ///
    /// Returns `false` if the document has no toggle control.
    pub fn update_toggle_control(&mut self, theme: Theme) -> bool {
        let effective = self.resolve(theme);
        self.refresh_control(effective)
    }

    fn refresh_control(&mut self, effective: ColorMode) -> bool {
        let appearance = ControlAppearance {
            icon_class: self.config.icon_for(effective).to_string(),
            label: self.config.label_for(effective).to_string(),
        };
        let found = self
            .document
            .update_control(&self.config.control_id, &appearance);
        if !found {
            log::trace!("no toggle control '{}' in document", self.config.control_id);
        }
        found
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The explicit theme choice, if any.
    ///
    /// A choice that failed to persist this session takes precedence over
    /// the store. Storage errors and unparseable values read as `None`.
    pub fn stored_preference(&self) -> Option<Theme> {
        if let Some(theme) = self.unpersisted {
            return Some(theme);
        }
        match self.store.read(&self.config.storage_key) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(theme) => Some(theme),
                Err(err) => {
                    log::warn!("ignoring stored theme preference: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("could not read theme preference: {}", err);
                None
            }
        }
    }

    fn persist(&mut self, theme: Theme) -> bool {
        match self.store.write(&self.config.storage_key, theme.as_str()) {
            Ok(()) => {
                self.unpersisted = None;
                true
            }
            Err(err) => {
                log::warn!(
                    "could not save theme preference, keeping it for this session: {}",
                    err
                );
                self.unpersisted = Some(theme);
                false
            }
        }
    }

    fn follows_system(&self) -> bool {
        self.stored_preference().map_or(true, Theme::is_system)
    }

    // =========================================================================
    // OS preference tracking
    // =========================================================================

    /// Subscribes to OS preference changes.
    ///
    /// Returns `false` if the appearance source has no change mechanism,
    /// which is not an error. Subscribing twice keeps the first subscription.
    pub fn watch_system_preference(&mut self) -> bool {
        if self.system_changes.is_some() {
            return true;
        }
        match self.appearance.watch() {
            Some(rx) => {
                self.system_changes = Some(rx);
                true
            }
            None => {
                log::debug!("OS color scheme changes cannot be observed");
                false
            }
        }
    }

    /// Returns `true` while an OS change subscription is live.
    pub fn is_watching_system(&self) -> bool {
        self.system_changes.is_some()
    }

    /// Drains pending OS change notifications and applies the latest one,
    /// unless an explicit choice is stored.
    ///
    /// Returns the applied theme, if any.
    pub fn process_system_changes(&mut self) -> Option<ColorMode> {
        let rx = self.system_changes.as_ref()?;
        let mut latest = None;
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(mode) => latest = Some(mode),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            log::debug!("OS color scheme watcher stopped");
            self.system_changes = None;
        }
        let mode = latest?;
        self.system_preference_changed(mode).then_some(mode)
    }

    /// Handles one OS preference change pushed by the host.
    ///
    /// Returns `true` if the change was applied, `false` if an explicit
    /// choice overrides it.
    pub fn system_preference_changed(&mut self, mode: ColorMode) -> bool {
        if !self.follows_system() {
            log::debug!("OS switched to {}, explicit choice kept", mode);
            return false;
        }
        self.apply(Theme::from(mode), ChangeSource::SystemPreference);
        true
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn suppress_transitions(&mut self, now: Instant) {
        self.document.set_transitions_enabled(false);
        self.transitions.suppress(now);
    }

    /// Returns `true` while transitions are disabled after a flip.
    pub fn transitions_suppressed(&self) -> bool {
        self.transitions.is_suppressed()
    }

    /// Re-enables transitions immediately.
    pub fn restore_transitions(&mut self) {
        if self.transitions.clear() {
            self.document.set_transitions_enabled(true);
        }
    }

    /// Re-enables transitions if the suppression window has elapsed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit clock reading.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let expired = self
            .transitions
            .expire(now, self.config.transition_suppression());
        if expired {
            self.document.set_transitions_enabled(true);
        }
        expired
    }

    // =========================================================================
    // Listeners and accessors
    // =========================================================================

    /// Registers a listener for theme change notifications.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ThemeChange) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn appearance(&self) -> &A {
        &self.appearance
    }

    pub fn appearance_mut(&mut self) -> &mut A {
        &mut self.appearance
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

impl<S, A, D> std::fmt::Debug for ThemeManager<S, A, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("config", &self.config)
            .field("lifecycle", &self.lifecycle)
            .field("unpersisted", &self.unpersisted)
            .field("watching", &self.system_changes.is_some())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
