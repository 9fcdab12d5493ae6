//! # Themekeeper
//!
//! Light/dark theme switching for documents: resolves the theme to show,
//! reflects it on the document, persists the user's explicit choice and
//! follows the operating system's preference while no choice was made.
//!
//! ## Core Concepts
//!
//! - [`Theme`]: what the user selects (`light`, `dark` or `system`)
//! - [`ColorMode`]: what is actually rendered (`light` or `dark`)
//! - [`ThemeManager`]: owns the state and keeps everything in sync
//! - [`PreferenceStore`], [`SystemAppearance`], [`Document`]: the injected
//!   seams for persistence, the OS signal and the DOM
//!
//! ## Quick Start
//!
//! ```rust
//! use themekeeper::{
//!     ColorMode, Initialization, ManualAppearance, MemoryDocument, MemoryStore, ThemeConfig,
//!     ThemeManager,
//! };
//!
//! let mut manager = ThemeManager::new(
//!     ThemeConfig::default(),
//!     MemoryStore::new(),
//!     ManualAppearance::new(Some(false)),
//!     MemoryDocument::new().with_control("theme-toggle"),
//! );
//!
//! manager.subscribe(|change| println!("theme is now {}", change.theme));
//! assert_eq!(manager.initialize(), Initialization::Applied(ColorMode::Light));
//!
//! let toggled = manager.toggle_theme();
//! assert_eq!(toggled.theme, ColorMode::Dark);
//! assert_eq!(
//!     manager.document().root_attribute("data-theme"),
//!     Some("dark"),
//! );
//! ```
//!
//! ## Hosts
//!
//! On native targets, [`OsAppearance`] reads the desktop setting through
//! `dark-light` and [`FileStore`] keeps the choice in a JSON file. On
//! `wasm32`, the `web` module binds `localStorage`, the root `<html>`
//! element and the `prefers-color-scheme` media query, and
//! `web::mount` wires the whole thing into a page.
//!
//! ## Failure Handling
//!
//! Theme switching never fails outward. Storage errors are logged through
//! the `log` facade and the choice lives on in memory for the session; an
//! unqueryable OS signal reads as light; a missing toggle control is
//! skipped. Only [`ThemeConfig::load`] returns an error.

pub mod appearance;
pub mod config;
pub mod document;
pub mod events;
pub mod manager;
pub mod storage;
pub mod theme;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use appearance::{resolve_system_theme, ManualAppearance, SystemAppearance};
#[cfg(not(target_arch = "wasm32"))]
pub use appearance::{OsAppearance, ThemeDetector};
pub use config::{ConfigError, ControlIcons, ControlLabels, ThemeConfig};
pub use document::{ControlAppearance, ControlState, Document, MemoryDocument, ReadyState};
pub use events::{
    ChangeQueue, ChangeSource, ListenerId, ThemeChange, ThemeListener, ThemeListeners,
};
pub use manager::{Initialization, ThemeManager, Toggled};
pub use storage::{FileStore, MemoryStore, PreferenceStore, StorageError};
pub use theme::{ColorMode, ParseThemeError, Theme};
