//! UI rendering module for the composer TUI.
//!
//! This module provides the main layout, the components, the theme and the
//! event loop that drives them.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
