#![forbid(unsafe_code)]

//! vibehub: a terminal gallery of reusable AI prompts.
//!
//! The binary boots through a scripted console sequence, then shows the
//! prompt catalog over an animated gradient background. Prompts can be
//! filtered by category and free-text search, opened in a detail view, and
//! copied to the clipboard over OSC 52.
//!
//! [`app::AppModel`] holds all state and is driven by a [`vibe_core::Clock`],
//! so everything here runs headless under a manual clock in tests.
//! [`runtime::run`] hosts it on a real terminal.

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod error;
pub mod logging;
pub mod modal;
pub mod runtime;
pub mod terminal;
pub mod theme;
pub mod views;

pub use app::{AppConfig, AppModel};
pub use error::AppError;
