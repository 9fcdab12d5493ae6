//! Theme values.
//!
//! This module provides:
//!
//! - [`Theme`]: the user-facing selection (`light`, `dark` or `system`)
//! - [`ColorMode`]: the effective, rendered mode (`light` or `dark`)
//! - [`ParseThemeError`]: returned when a stored string is not a theme
//!
//! A [`Theme::System`] selection is never rendered directly; it is resolved
//! to a [`ColorMode`] against the OS signal at the moment of resolution.

mod choice;
mod mode;

pub use choice::{ParseThemeError, Theme};
pub use mode::ColorMode;
